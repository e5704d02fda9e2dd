/**
This module gives a few tools to prettyprint the per-label metrics and the overall micro
average.
*/
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt::Display;
use std::hash::Hash;

pub(crate) const OVERALL_MICRO: &str = "Overall_Micro";

/// The reporter holds the metrics of every label seen during an evaluation, along with the
/// overall micro average. It can be used to display the results (i.e. prettyprint them) as if
/// they were collected into a dataframe and can be consumed to obtain a `HashSet` containing
/// the metrics. The reporter is built by the `evaluation_report` function.
///
/// # Example
///
/// ```rust
/// use sinev::{evaluation_report, evaluation_examples, training_examples};
/// use sinev::{ShapeTrainer, TrainerConfig};
///
/// let trainer = ShapeTrainer::new(TrainerConfig::default());
/// let model = trainer.train(&training_examples()).unwrap();
/// let reporter = evaluation_report(&evaluation_examples(), &model);
///
/// let expected_report = "Label, Precision, Recall, Fscore, Support
/// Overall_Micro, 1, 1, 1, 10
/// SIN, 1, 1, 1, 10\n";
///
/// assert_eq!(expected_report, reporter.to_string());
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Reporter {
    pub(crate) classes: BTreeSet<ClassMetricsInner>,
}

/// By converting the reporter into a `HashSet` of `ClassMetrics`, you lose the display ordering
/// implemented for the reporter. If you mean to consume the data without prettyprinting it,
/// this is not a problem.
impl From<Reporter> for HashSet<ClassMetrics> {
    fn from(value: Reporter) -> Self {
        value.classes.into_iter().map(ClassMetrics::from).collect()
    }
}

impl Reporter {
    pub(crate) fn insert(&mut self, metrics: ClassMetricsInner) -> bool {
        self.classes.insert(metrics)
    }
}

/// The Reporter struct acts as a dataframe when displayed.
impl Display for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Label, Precision, Recall, Fscore, Support")?;
        for v in self.classes.iter().rev() {
            //Must call `.rev()` so that the overall row comes out first
            writeln!(f, "{}", v)?
        }
        Ok(())
    }
}

#[derive(Debug)]
/// Datastructure holding the metrics of a given label.
pub struct ClassMetrics {
    /// The label of the entity class, or `Overall_Micro` for the pooled row.
    pub label: String,
    /// The aggregation used to compute this row.
    pub average: Average,
    /// Precision metric
    pub precision: f32,
    /// Recall metric
    pub recall: f32,
    /// Fscore metric
    pub fscore: f32,
    /// Number of gold spans carrying this label.
    pub support: usize,
}

impl Hash for ClassMetrics {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.label.hash(state);
        self.average.hash(state)
    }
}

impl PartialEq for ClassMetrics {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.average == other.average
    }
}
impl Eq for ClassMetrics {}

impl From<ClassMetricsInner> for ClassMetrics {
    fn from(value: ClassMetricsInner) -> Self {
        Self {
            label: value.label,
            average: value.average,
            precision: value.precision,
            recall: value.recall,
            fscore: value.fscore,
            support: value.support,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
/// ClassMetricsInner holds the metrics of a single label. It cannot be constructed outside of
/// the crate and implements a special version of the `Display` trait, allowing it to be treated
/// as the line of a dataframe.
pub(crate) struct ClassMetricsInner {
    pub(crate) label: String,
    pub(crate) average: Average,
    pub(crate) precision: f32,
    pub(crate) recall: f32,
    pub(crate) fscore: f32,
    pub(crate) support: usize,
}

impl PartialEq for ClassMetricsInner {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.average == other.average
    }
}
impl Eq for ClassMetricsInner {}

impl PartialOrd for ClassMetricsInner {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassMetricsInner {
    fn cmp(&self, other: &Self) -> Ordering {
        self.average
            .cmp(&other.average)
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl ClassMetricsInner {
    pub(crate) fn new_overall(
        precision: f32,
        recall: f32,
        fscore: f32,
        support: usize,
    ) -> Self {
        ClassMetricsInner {
            label: String::from(OVERALL_MICRO),
            average: Average::Micro,
            precision,
            recall,
            fscore,
            support,
        }
    }
}

/// The ClassMetricsInner struct acts as a line in a dataframe when displayed.
impl Display for ClassMetricsInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.label, self.precision, self.recall, self.fscore, self.support
        )
    }
}

/// Enumeration of the two aggregations this crate reports: the raw per-label rows and the
/// micro average pooled over every label.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum Average {
    None,
    Micro,
}

impl Display for Average {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// `Micro` sorts above `None` so that the overall row is printed before the per-label rows.
impl PartialOrd for Average {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Average {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::None, Self::None) | (Self::Micro, Self::Micro) => Ordering::Equal,
            (Self::None, Self::Micro) => Ordering::Less,
            (Self::Micro, Self::None) => Ordering::Greater,
        }
    }
}
