/*!
Alignment diagnostics for hand-authored annotations.

A gold span is only learnable by a token-based tagger when its boundaries coincide with token
boundaries. This module segments a text into word tokens and derives the BILOU tag of every
token under a set of gold spans. A token touched by a span that cannot be aligned is tagged
`-`, the conventional marker for a misaligned entity. The driver runs this check over the
authored examples before training; it does not reproduce the tag decoding a real NER engine
performs internally.
*/
use crate::entity::{AnnotatedExample, Entity};
use enum_iterator::Sequence;
use std::fmt::Display;

/// Position of a token inside an aligned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum BilouPrefix {
    /// First token of a multi-token entity.
    B,
    /// Token strictly inside a multi-token entity.
    I,
    /// Last token of a multi-token entity.
    L,
    /// Single token covering a whole entity.
    U,
}

impl BilouPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            BilouPrefix::B => "B",
            BilouPrefix::I => "I",
            BilouPrefix::L => "L",
            BilouPrefix::U => "U",
        }
    }
}

impl Display for BilouPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The tag of a single token under a set of gold spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTag<'a> {
    /// Token outside every gold span.
    Out,
    /// Token touched by a span that does not line up with token boundaries.
    Misaligned,
    /// Token inside an aligned span.
    Tagged(BilouPrefix, &'a str),
}

impl Display for TokenTag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenTag::Out => write!(f, "O"),
            TokenTag::Misaligned => write!(f, "-"),
            TokenTag::Tagged(prefix, label) => write!(f, "{}-{}", prefix, label),
        }
    }
}

/// Byte ranges of the word tokens of `text`: maximal non-whitespace runs, with leading and
/// trailing punctuation split off as single-character tokens.
pub fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut words: Vec<(usize, usize)> = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                words.push((s, i));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push((s, text.len()));
    }
    let mut spans = Vec::with_capacity(words.len());
    for (word_start, word_end) in words {
        split_punctuation(text, word_start, word_end, &mut spans);
    }
    spans
}

/// Peels leading and trailing non-alphanumeric characters off a word, each becoming its own
/// token. Inner punctuation (as in `it's`) stays part of the word.
fn split_punctuation(
    text: &str,
    mut start: usize,
    mut end: usize,
    spans: &mut Vec<(usize, usize)>,
) {
    let mut trailing: Vec<(usize, usize)> = Vec::new();
    while start < end {
        let ch = text[start..end].chars().next().unwrap();
        if ch.is_alphanumeric() {
            break;
        }
        spans.push((start, start + ch.len_utf8()));
        start += ch.len_utf8();
    }
    while end > start {
        let ch = text[start..end].chars().next_back().unwrap();
        if ch.is_alphanumeric() {
            break;
        }
        trailing.push((end - ch.len_utf8(), end));
        end -= ch.len_utf8();
    }
    if start < end {
        spans.push((start, end));
    }
    spans.extend(trailing.into_iter().rev());
}

fn span_is_aligned(spans: &[(usize, usize)], overlapping: &[usize], entity: &Entity<'_>) -> bool {
    match (overlapping.first(), overlapping.last()) {
        (Some(&first), Some(&last)) => {
            spans[first].0 == entity.start && spans[last].1 == entity.end
        }
        _ => false,
    }
}

/// The BILOU tags of the tokens of `example`. Aligned entities produce a `B-`/`I-`/`L-` run or
/// a single `U-` tag, tokens outside every entity produce `O`, and every token touched by a
/// span that does not match token boundaries produces `-`.
pub fn alignment_tags<'e>(example: &'e AnnotatedExample<'_>) -> Vec<TokenTag<'e>> {
    let spans = token_spans(example.text());
    let mut tags = vec![TokenTag::Out; spans.len()];
    for entity in example.entities() {
        let overlapping: Vec<usize> = spans
            .iter()
            .enumerate()
            .filter(|(_, &(s, e))| s < entity.end && e > entity.start)
            .map(|(i, _)| i)
            .collect();
        if span_is_aligned(&spans, &overlapping, entity) {
            let label = entity.label.as_ref();
            match overlapping.as_slice() {
                [] => {}
                [only] => tags[*only] = TokenTag::Tagged(BilouPrefix::U, label),
                [first, inner @ .., last] => {
                    tags[*first] = TokenTag::Tagged(BilouPrefix::B, label);
                    for i in inner {
                        tags[*i] = TokenTag::Tagged(BilouPrefix::I, label);
                    }
                    tags[*last] = TokenTag::Tagged(BilouPrefix::L, label);
                }
            }
        } else {
            for i in overlapping {
                tags[i] = TokenTag::Misaligned;
            }
        }
    }
    tags
}
