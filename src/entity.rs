/*!
Core data model: character-offset entity spans and the annotated examples they belong to.
*/
use ahash::AHashSet;
use std::borrow::Cow;
use std::fmt::Display;

/// Label of the single entity class this repository cares about.
pub const SIN_LABEL: &str = "SIN";

/// An entity represents a named object found in a text. It is identified by the half-open range
/// of byte offsets `[start, end)` it occupies in that text and by its label (here, usually
/// `SIN`). Offsets are assumed to be well formed (`0 <= start < end <= text.len()`); nothing in
/// this crate validates them on behalf of the caller.
#[derive(Debug, Hash, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Entity<'a> {
    pub start: usize,
    pub end: usize,
    pub label: Cow<'a, str>,
}

impl<'a> Entity<'a> {
    pub fn new(start: usize, end: usize, label: impl Into<Cow<'a, str>>) -> Self {
        Entity {
            start,
            end,
            label: label.into(),
        }
    }

    /// The slice of `text` covered by this entity, or `None` when the offsets do not fall on
    /// character boundaries of `text`.
    pub fn text_slice<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.start..self.end)
    }
}

impl Display for Entity<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.label, self.start, self.end)
    }
}

/// A text paired with its ground-truth entities. The gold spans of a single example must not
/// overlap; this is an invariant of the authored data, not something enforced here. Examples
/// are authored once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedExample<'a> {
    text: Cow<'a, str>,
    entities: Vec<Entity<'a>>,
}

impl<'a> AnnotatedExample<'a> {
    pub fn new(text: impl Into<Cow<'a, str>>, entities: Vec<Entity<'a>>) -> Self {
        AnnotatedExample {
            text: text.into(),
            entities,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn entities(&self) -> &[Entity<'a>] {
        &self.entities
    }

    /// The gold spans as a set of `(start, end, label)` triples. Collecting into a set
    /// deduplicates identical spans within the example.
    pub fn gold_triples(&self) -> AHashSet<(usize, usize, &str)> {
        self.entities
            .iter()
            .map(|e| (e.start, e.end, e.label.as_ref()))
            .collect()
    }
}

/// The set of spans a model produced for one text. Produced fresh on every call to a predictor
/// and discarded once the metrics are computed.
pub type PredictionSet<'a> = AHashSet<Entity<'a>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let entity = Entity::new(17, 26, SIN_LABEL);
        assert_eq!(entity.to_string(), "(SIN, 17, 26)");
    }

    #[test]
    fn test_text_slice() {
        let example = AnnotatedExample::new(
            "My SIN number is 345123890.",
            vec![Entity::new(17, 26, SIN_LABEL)],
        );
        let actual = example.entities()[0].text_slice(example.text());
        assert_eq!(actual, Some("345123890"));
    }

    #[test]
    fn test_text_slice_out_of_bounds() {
        let entity = Entity::new(3, 100, SIN_LABEL);
        assert_eq!(entity.text_slice("too short"), None);
    }

    #[test]
    fn test_gold_triples_deduplicate() {
        let example = AnnotatedExample::new(
            "345123890 and again 345123890",
            vec![
                Entity::new(0, 9, SIN_LABEL),
                Entity::new(0, 9, SIN_LABEL),
                Entity::new(20, 29, SIN_LABEL),
            ],
        );
        let triples = example.gold_triples();
        assert_eq!(triples.len(), 2);
        assert!(triples.contains(&(0, 9, SIN_LABEL)));
        assert!(triples.contains(&(20, 29, SIN_LABEL)));
    }

    #[test]
    fn test_owned_and_borrowed_labels_compare_equal() {
        let borrowed = Entity::new(0, 9, SIN_LABEL);
        let owned = Entity::new(0, 9, String::from(SIN_LABEL));
        assert_eq!(borrowed, owned);
        let mut set: PredictionSet = PredictionSet::default();
        set.insert(borrowed);
        assert!(set.contains(&owned));
    }
}
