/*!
This library trains and evaluates a small named-entity-recognition model that detects Social
Insurance Number (SIN) mentions in free text. The heavy lifting of sequence tagging belongs to
an external NER engine, reduced here to the [`Predictor`] trait; what this crate owns is the
hand-authored example store, a baseline shape-matching engine and, above all, the span-level
evaluator.

# Evaluation semantics
* A predicted span is a true positive only when its `(start, end, label)` triple occurs among
  the gold annotations of the same example. Anything less than an exact match counts as one
  false positive and one false negative.
* True positives, false positives and false negatives are pooled over the whole collection
  before any ratio is taken (micro averaging), instead of averaging per-example scores.
* `precision = tp / (tp + fp)`, `recall = tp / (tp + fn)` and `f1 = 2pr / (p + r)` each
  default to 0 when their denominator is 0. The evaluator never fails and never returns a NaN.

# Terminology
* A *gold span* is a ground-truth entity annotation `(start, end, label)` for a given text.
* A *predicted span* is an annotation produced by a model at inference time.
* A *micro-averaged* metric is computed from pooled counts across all examples, not averaged
  per example.
* Offsets are half-open byte offsets into the text; the authored data is plain ASCII, so they
  coincide with character positions.

# Example
```rust
use sinev::{evaluate, evaluation_examples, training_examples, ShapeTrainer, TrainerConfig};

let trainer = ShapeTrainer::new(TrainerConfig::default());
let model = trainer.train(&training_examples()).unwrap();
let metrics = evaluate(&evaluation_examples(), &model);
assert_eq!((metrics.precision, metrics.recall, metrics.f1), (1.0, 1.0, 1.0));
```
*/

mod alignment;
mod config;
mod dataset;
mod engine;
mod entity;
mod metrics;
mod reporter;

// The public api starts here
pub use alignment::{alignment_tags, token_spans, BilouPrefix, TokenTag};

pub use config::{TrainerConfig, TrainerConfigBuilder};

pub use dataset::{evaluation_examples, training_examples};

pub use engine::{Predictor, ShapeModel, ShapeTrainer, TrainingError};

pub use entity::{AnnotatedExample, Entity, PredictionSet, SIN_LABEL};

pub use metrics::{
    evaluate, evaluation_report, precision_recall_fscore, Evaluation, NegativeBetaError,
    PrecisionRecallFscoreSupport,
};

pub use reporter::{Average, ClassMetrics, Reporter};
