/*!
The boundary between this crate and the NER engine, plus the baseline engine the repository
ships with.

Sequence tagging belongs to an external collaborator; it is reduced here to two seams. A trainer
turns annotated examples into an explicit model handle, and the [`Predictor`] trait is all the
evaluator ever sees of that handle. Keeping the model as a value returned by `train` (instead of
mutable state inside the trainer) means an untrained model simply cannot be asked for
predictions.

The baseline [`ShapeModel`] learns the digit shapes of the gold entity texts (`"#########"`,
`"### ### ###"`) and tags every leftmost-longest occurrence of a learned shape at inference
time. It is deterministic and side-effect free, which is exactly what the evaluator assumes of
a predictor.
*/
use crate::config::TrainerConfig;
use crate::entity::{AnnotatedExample, Entity, PredictionSet};
use ahash::AHashSet;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// Anything able to produce the entity spans of a raw text. Inference must be deterministic and
/// free of side effects for a fixed model.
pub trait Predictor {
    fn predict(&self, text: &str) -> PredictionSet<'_>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enum error encompassing the ways turning annotated examples into a shape model can fail.
pub enum TrainingError {
    /// The training collection contained no example at all.
    EmptyTrainingSet,
    /// A gold span does not fall on character boundaries of its text.
    SpanOutOfBounds {
        start: usize,
        end: usize,
        text: String,
    },
    /// A learned shape carries fewer digit slots than the configured minimum.
    ShapeTooShort { shape: String, min_digits: usize },
    /// The same shape is annotated with two different labels in the training data.
    AmbiguousShape {
        shape: String,
        first: String,
        second: String,
    },
}

impl Display for TrainingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTrainingSet => write!(f, "The training set contains no example"),
            Self::SpanOutOfBounds { start, end, text } => write!(
                f,
                "The gold span [{}, {}) does not fit the text {:?}",
                start, end, text
            ),
            Self::ShapeTooShort { shape, min_digits } => write!(
                f,
                "The shape {:?} carries fewer than {} digit slots",
                shape, min_digits
            ),
            Self::AmbiguousShape {
                shape,
                first,
                second,
            } => write!(
                f,
                "The shape {:?} is annotated with both the {} and the {} labels",
                shape, first, second
            ),
        }
    }
}

impl Error for TrainingError {}

/// Builds a [`ShapeModel`] from annotated examples. The trainer owns no model state: training
/// returns the handle, and the handle alone is used for inference afterwards.
#[derive(Debug, Clone, Default)]
pub struct ShapeTrainer {
    config: TrainerConfig,
}

impl ShapeTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        ShapeTrainer { config }
    }

    pub fn train(
        &self,
        examples: &[AnnotatedExample<'_>],
    ) -> Result<ShapeModel, TrainingError> {
        if examples.is_empty() {
            return Err(TrainingError::EmptyTrainingSet);
        }
        let mut shapes: BTreeMap<String, String> = BTreeMap::new();
        for example in examples {
            for entity in example.entities() {
                let slice = entity.text_slice(example.text()).ok_or_else(|| {
                    TrainingError::SpanOutOfBounds {
                        start: entity.start,
                        end: entity.end,
                        text: example.text().to_string(),
                    }
                })?;
                let shape = digit_shape(slice);
                let digits = shape.chars().filter(|c| *c == '#').count();
                if digits < self.config.min_digits() {
                    return Err(TrainingError::ShapeTooShort {
                        shape,
                        min_digits: self.config.min_digits(),
                    });
                }
                match shapes.get(&shape) {
                    Some(label) if label != entity.label.as_ref() => {
                        return Err(TrainingError::AmbiguousShape {
                            shape,
                            first: label.clone(),
                            second: entity.label.to_string(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        shapes.insert(shape, entity.label.to_string());
                    }
                }
            }
        }
        // Longest shapes first, so that inference prefers the widest match at any position.
        let mut ordered: Vec<(String, String)> = shapes.into_iter().collect();
        ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Ok(ShapeModel {
            shapes: ordered,
            digit_boundary_guard: self.config.digit_boundary_guard(),
        })
    }
}

/// Replaces every ASCII digit with `#` and keeps all other characters as they are.
fn digit_shape(slice: &str) -> String {
    slice
        .chars()
        .map(|c| if c.is_ascii_digit() { '#' } else { c })
        .collect()
}

/// A trained shape dictionary: each entry pairs an entity text with its digits blanked out to
/// `#` with the label it was annotated with. Entries are ordered longest shape first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeModel {
    shapes: Vec<(String, String)>,
    digit_boundary_guard: bool,
}

impl ShapeModel {
    /// Number of distinct shapes learned during training.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn matches_at(&self, text: &str, at: usize, shape: &str) -> bool {
        let Some(window) = text.get(at..at + shape.len()) else {
            return false;
        };
        for (expected, found) in shape.chars().zip(window.chars()) {
            let matched = if expected == '#' {
                found.is_ascii_digit()
            } else {
                expected == found
            };
            if !matched {
                return false;
            }
        }
        if self.digit_boundary_guard {
            let preceded = text[..at].chars().next_back().is_some_and(|c| c.is_ascii_digit());
            let followed = text[at + shape.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit());
            if preceded || followed {
                return false;
            }
        }
        true
    }
}

impl Predictor for ShapeModel {
    fn predict(&self, text: &str) -> PredictionSet<'_> {
        let mut found: PredictionSet<'_> = AHashSet::default();
        let mut resume = 0;
        for (at, _) in text.char_indices() {
            if at < resume {
                continue;
            }
            for (shape, label) in &self.shapes {
                if self.matches_at(text, at, shape) {
                    found.insert(Entity::new(at, at + shape.len(), label.as_str()));
                    resume = at + shape.len();
                    break;
                }
            }
        }
        found
    }
}
