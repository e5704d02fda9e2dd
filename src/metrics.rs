/*!
This module computes the span-level metrics (precision, recall, f-score, support) of a model
against a collection of annotated examples.

Matching is exact: a predicted span is a true positive only when its `(start, end, label)`
triple occurs among the gold annotations of the same example. A partial overlap, a shifted
boundary or a different label counts as one false positive and one false negative, never as
partial credit. Counts are pooled over the whole collection before any ratio is taken (micro
averaging), and a zero denominator yields 0 rather than an error or a NaN.
*/
use crate::engine::Predictor;
use crate::entity::AnnotatedExample;
use crate::reporter::{Average, ClassMetricsInner, Reporter};
use ahash::AHashSet;
use itertools::multizip;
use ndarray::prelude::*;
use ndarray::Zip;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;

/// Micro-averaged metrics of a model over a collection of examples. Every field lies in
/// `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Precision: {}\nRecall: {}\nF1 Score: {}",
            self.precision, self.recall, self.f1
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Error returned when the `beta` parameter of the f-score is negative.
pub struct NegativeBetaError;

impl Display for NegativeBetaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Beta value must not be negative")
    }
}

impl Error for NegativeBetaError {}

#[derive(Debug, Clone, Copy, Default)]
struct LabelCounts {
    predicted: usize,
    true_positive: usize,
    gold: usize,
}

/// Pooled per-label counts over a whole collection, ordered by label name.
#[derive(Debug, Clone)]
struct PooledCounts {
    labels: Vec<String>,
    predicted: Array1<usize>,
    true_positive: Array1<usize>,
    gold: Array1<usize>,
}

/// Runs the predictor once per example and pools the per-label counts over the collection.
/// Both span sets are compared as sets of `(start, end, label)` triples, so duplicate spans
/// within one example collapse before counting.
fn pooled_counts<P: Predictor>(
    examples: &[AnnotatedExample<'_>],
    predictor: &P,
) -> PooledCounts {
    let mut per_label: BTreeMap<String, LabelCounts> = BTreeMap::new();
    for example in examples {
        let prediction = predictor.predict(example.text());
        let predicted: AHashSet<(usize, usize, &str)> = prediction
            .iter()
            .map(|e| (e.start, e.end, e.label.as_ref()))
            .collect();
        let gold = example.gold_triples();
        for triple in &predicted {
            let counts = per_label.entry(triple.2.to_string()).or_default();
            counts.predicted += 1;
            if gold.contains(triple) {
                counts.true_positive += 1;
            }
        }
        for triple in &gold {
            per_label.entry(triple.2.to_string()).or_default().gold += 1;
        }
    }
    let labels = per_label.keys().cloned().collect();
    let predicted = Array::from_iter(per_label.values().map(|c| c.predicted));
    let true_positive = Array::from_iter(per_label.values().map(|c| c.true_positive));
    let gold = Array::from_iter(per_label.values().map(|c| c.gold));
    PooledCounts {
        labels,
        predicted,
        true_positive,
        gold,
    }
}

/// Elementwise `numerator / denominator` where a zero denominator yields 0 instead of an error
/// or a NaN.
fn prf_divide(numerator: &Array1<f32>, denominator: &Array1<f32>) -> Array1<f32> {
    Zip::from(numerator)
        .and(denominator)
        .map_collect(|n, d| if *d == 0.0 { 0.0 } else { n / d })
}

/// Type alias for the output of [`precision_recall_fscore`]. The arrays hold the precision,
/// recall, f-score and support of each label, ordered by label name, or a single entry when
/// the counts were micro-averaged first.
pub type PrecisionRecallFscoreSupport = (Array1<f32>, Array1<f32>, Array1<f32>, Array1<usize>);

fn metrics_from_counts(
    counts: &PooledCounts,
    beta: f32,
    average: Average,
) -> PrecisionRecallFscoreSupport {
    let (pred_sum, tp_sum, true_sum) = match average {
        Average::Micro => (
            array![counts.predicted.sum()],
            array![counts.true_positive.sum()],
            array![counts.gold.sum()],
        ),
        Average::None => (
            counts.predicted.clone(),
            counts.true_positive.clone(),
            counts.gold.clone(),
        ),
    };
    let tp = tp_sum.mapv(|x| x as f32);
    let precision = prf_divide(&tp, &pred_sum.mapv(|x| x as f32));
    let recall = prf_divide(&tp, &true_sum.mapv(|x| x as f32));
    let beta2 = beta.powi(2);
    let fscore = if beta2.is_infinite() && beta2.is_sign_positive() {
        recall.clone()
    } else {
        let numerator = (1.0 + beta2) * &precision * &recall;
        let denominator = beta2 * &precision + &recall;
        prf_divide(&numerator, &denominator)
    };
    (precision, recall, fscore, true_sum)
}

/// Computes the per-label (or micro-averaged, depending on `average`) precision, recall,
/// f-score and support of `predictor` over `examples`. `beta=1` yields the F1 score, `beta=0.5`
/// the F0.5 score.
pub fn precision_recall_fscore<P: Predictor>(
    examples: &[AnnotatedExample<'_>],
    predictor: &P,
    beta: f32,
    average: Average,
) -> Result<PrecisionRecallFscoreSupport, NegativeBetaError> {
    if beta.is_sign_negative() {
        return Err(NegativeBetaError);
    }
    let counts = pooled_counts(examples, predictor);
    Ok(metrics_from_counts(&counts, beta, average))
}

/// Evaluates `predictor` on `examples` and returns the micro-averaged precision, recall and F1
/// score.
///
/// The three ratios default to 0 whenever their denominator is 0, so the function is total: an
/// empty collection, an empty gold set or an entirely silent model all yield zeros rather than
/// an error or a NaN.
pub fn evaluate<P: Predictor>(examples: &[AnnotatedExample<'_>], predictor: &P) -> Evaluation {
    let counts = pooled_counts(examples, predictor);
    let true_positives = counts.true_positive.sum() as f32;
    let predicted = counts.predicted.sum() as f32;
    let gold = counts.gold.sum() as f32;
    let precision = if predicted == 0.0 {
        0.0
    } else {
        true_positives / predicted
    };
    let recall = if gold == 0.0 { 0.0 } else { true_positives / gold };
    let denominator = precision + recall;
    let f1 = if denominator == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / denominator
    };
    Evaluation {
        precision,
        recall,
        f1,
    }
}

/// Main entrypoint of the library. Evaluates `predictor` on `examples` and returns a
/// [`Reporter`] holding one row per label and the overall micro average. The returned structure
/// can be used to prettyprint the results or be converted into a `HashSet` of metrics. The
/// predictor runs exactly once per example.
pub fn evaluation_report<P: Predictor>(
    examples: &[AnnotatedExample<'_>],
    predictor: &P,
) -> Reporter {
    let counts = pooled_counts(examples, predictor);
    let mut reporter = Reporter::default();
    let (p, r, f1, s) = metrics_from_counts(&counts, 1.0, Average::None);
    for (label, precision, recall, fscore, support) in
        multizip((counts.labels.iter(), p, r, f1, s))
    {
        reporter.insert(ClassMetricsInner {
            label: label.clone(),
            average: Average::None,
            precision,
            recall,
            fscore,
            support,
        });
    }
    let (p, r, f1, s) = metrics_from_counts(&counts, 1.0, Average::Micro);
    reporter.insert(ClassMetricsInner::new_overall(p[0], r[0], f1[0], s[0]));
    reporter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Entity, PredictionSet, SIN_LABEL};
    use ahash::AHashMap;
    use quickcheck::QuickCheck;

    /// Deterministic stand-in for the NER engine: a fixed prediction set per text.
    #[derive(Default)]
    struct ByText(AHashMap<&'static str, Vec<Entity<'static>>>);

    impl ByText {
        fn with(mut self, text: &'static str, entities: Vec<Entity<'static>>) -> Self {
            self.0.insert(text, entities);
            self
        }
    }

    impl Predictor for ByText {
        fn predict(&self, text: &str) -> PredictionSet<'_> {
            self.0
                .get(text)
                .map(|entities| entities.iter().cloned().collect())
                .unwrap_or_default()
        }
    }

    /// Ignores the text entirely and always answers with the same spans.
    struct Always(Vec<Entity<'static>>);

    impl Predictor for Always {
        fn predict(&self, _text: &str) -> PredictionSet<'_> {
            self.0.iter().cloned().collect()
        }
    }

    fn close(left: f32, right: f32) -> bool {
        f32::abs(left - right) < 1e-6
    }

    #[test]
    fn test_exact_match_is_a_true_positive() {
        let examples = vec![AnnotatedExample::new(
            "My SIN number is 345123890.",
            vec![Entity::new(17, 26, SIN_LABEL)],
        )];
        let predictor = ByText::default().with(
            "My SIN number is 345123890.",
            vec![Entity::new(17, 26, SIN_LABEL)],
        );
        let actual = evaluate(&examples, &predictor);
        assert_eq!(
            actual,
            Evaluation {
                precision: 1.0,
                recall: 1.0,
                f1: 1.0
            }
        );
    }

    #[test]
    fn test_missed_gold_span_yields_zeros() {
        let examples = vec![AnnotatedExample::new(
            "My SIN number is 345123890.",
            vec![Entity::new(17, 26, SIN_LABEL)],
        )];
        let predictor = ByText::default();
        let actual = evaluate(&examples, &predictor);
        assert_eq!(
            actual,
            Evaluation {
                precision: 0.0,
                recall: 0.0,
                f1: 0.0
            }
        );
    }

    #[test]
    fn test_no_gold_and_no_predictions_yield_zeros_not_nan() {
        let examples = vec![
            AnnotatedExample::new("nothing here", vec![]),
            AnnotatedExample::new("nor here", vec![]),
        ];
        let actual = evaluate(&examples, &ByText::default());
        assert_eq!(
            actual,
            Evaluation {
                precision: 0.0,
                recall: 0.0,
                f1: 0.0
            }
        );
    }

    #[test]
    fn test_counts_are_pooled_across_examples() {
        let examples = vec![
            AnnotatedExample::new("123456789", vec![Entity::new(0, 9, SIN_LABEL)]),
            AnnotatedExample::new("no sin in this one", vec![]),
        ];
        let predictor = ByText::default()
            .with("123456789", vec![Entity::new(0, 9, SIN_LABEL)])
            .with("no sin in this one", vec![Entity::new(5, 14, SIN_LABEL)]);
        let actual = evaluate(&examples, &predictor);
        assert!(close(actual.precision, 0.5));
        assert!(close(actual.recall, 1.0));
        assert!(close(actual.f1, 2.0 / 3.0));
    }

    /// A shifted boundary counts as one false positive and one false negative.
    #[test]
    fn test_partial_overlap_earns_no_credit() {
        let examples = vec![AnnotatedExample::new(
            "Her SIN is 987654321.",
            vec![Entity::new(11, 20, SIN_LABEL)],
        )];
        let predictor = ByText::default()
            .with("Her SIN is 987654321.", vec![Entity::new(11, 19, SIN_LABEL)]);
        let actual = evaluate(&examples, &predictor);
        assert_eq!(
            actual,
            Evaluation {
                precision: 0.0,
                recall: 0.0,
                f1: 0.0
            }
        );
    }

    #[test]
    fn test_label_mismatch_earns_no_credit() {
        let examples = vec![AnnotatedExample::new(
            "123456789",
            vec![Entity::new(0, 9, SIN_LABEL)],
        )];
        let predictor =
            ByText::default().with("123456789", vec![Entity::new(0, 9, "ACCOUNT")]);
        let actual = evaluate(&examples, &predictor);
        assert_eq!(
            actual,
            Evaluation {
                precision: 0.0,
                recall: 0.0,
                f1: 0.0
            }
        );
    }

    #[test]
    fn test_duplicate_predictions_collapse() {
        let examples = vec![AnnotatedExample::new(
            "123456789",
            vec![
                Entity::new(0, 9, SIN_LABEL),
                Entity::new(0, 9, SIN_LABEL),
            ],
        )];
        let predictor = ByText::default().with(
            "123456789",
            vec![Entity::new(0, 9, SIN_LABEL), Entity::new(0, 9, SIN_LABEL)],
        );
        let actual = evaluate(&examples, &predictor);
        assert_eq!(
            actual,
            Evaluation {
                precision: 1.0,
                recall: 1.0,
                f1: 1.0
            }
        );
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let examples = vec![
            AnnotatedExample::new("123456789", vec![Entity::new(0, 9, SIN_LABEL)]),
            AnnotatedExample::new("no sin in this one", vec![]),
        ];
        let predictor = ByText::default()
            .with("123456789", vec![Entity::new(0, 9, SIN_LABEL)])
            .with("no sin in this one", vec![Entity::new(5, 14, SIN_LABEL)]);
        let first = evaluate(&examples, &predictor);
        let second = evaluate(&examples, &predictor);
        assert_eq!(first, second);
    }

    #[test]
    fn test_precision_recall_fscore_rejects_negative_beta() {
        let examples = vec![AnnotatedExample::new("123456789", vec![])];
        let actual =
            precision_recall_fscore(&examples, &ByText::default(), -1.0, Average::Micro);
        assert_eq!(actual, Err(NegativeBetaError));
    }

    #[test]
    fn test_fscore_with_beta_zero_reduces_to_precision() {
        let examples = vec![
            AnnotatedExample::new("123456789", vec![Entity::new(0, 9, SIN_LABEL)]),
            AnnotatedExample::new("no sin in this one", vec![]),
        ];
        let predictor = ByText::default()
            .with("123456789", vec![Entity::new(0, 9, SIN_LABEL)])
            .with("no sin in this one", vec![Entity::new(5, 14, SIN_LABEL)]);
        let (p, _, f, _) =
            precision_recall_fscore(&examples, &predictor, 0.0, Average::Micro).unwrap();
        assert!(close(f[0], p[0]));
    }

    #[test]
    fn test_per_label_counts_stay_separate() {
        let examples = vec![AnnotatedExample::new(
            "123456789 for account 987654321",
            vec![
                Entity::new(0, 9, SIN_LABEL),
                Entity::new(22, 31, "ACCOUNT"),
            ],
        )];
        let predictor = ByText::default().with(
            "123456789 for account 987654321",
            vec![Entity::new(0, 9, SIN_LABEL)],
        );
        let (p, r, _, s) =
            precision_recall_fscore(&examples, &predictor, 1.0, Average::None).unwrap();
        // Labels are ordered lexicographically: ACCOUNT before SIN.
        assert_eq!(p.to_vec(), vec![0.0, 1.0]);
        assert_eq!(r.to_vec(), vec![0.0, 1.0]);
        assert_eq!(s.to_vec(), vec![1, 1]);
    }

    #[test]
    fn test_metrics_stay_in_bounds() {
        fn prop(gold: Vec<(u8, u8)>, predicted: Vec<(u8, u8)>) -> bool {
            let gold_entities = gold
                .iter()
                .map(|&(start, len)| {
                    Entity::new(start as usize, start as usize + len as usize + 1, SIN_LABEL)
                })
                .collect();
            let predicted_entities: Vec<Entity<'static>> = predicted
                .iter()
                .map(|&(start, len)| {
                    Entity::new(start as usize, start as usize + len as usize + 1, SIN_LABEL)
                })
                .collect();
            let examples = vec![AnnotatedExample::new("", gold_entities)];
            let metrics = evaluate(&examples, &Always(predicted_entities));
            (0.0..=1.0).contains(&metrics.precision)
                && (0.0..=1.0).contains(&metrics.recall)
                && (0.0..=1.0).contains(&metrics.f1)
        }
        QuickCheck::new().quickcheck(prop as fn(Vec<(u8, u8)>, Vec<(u8, u8)>) -> bool);
    }
}
