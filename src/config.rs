/*
 * This module contains some quality of life structs for the baseline trainer. The
 * `TrainerConfig` struct implements the `Default` trait and can be customized through the
 * `TrainerConfigBuilder`.
*/
use std::fmt::Display;

/// Knobs of the shape trainer.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TrainerConfig {
    /// Minimal number of digit slots a learned shape must carry. Shapes below this threshold
    /// are rejected at training time; they would match almost anything at inference time.
    min_digits: usize,
    /// When enabled, a shape match whose window is immediately preceded or followed by another
    /// digit is discarded. This keeps a nine-digit shape from firing inside a longer digit run.
    digit_boundary_guard: bool,
}

impl TrainerConfig {
    pub fn min_digits(&self) -> usize {
        self.min_digits
    }

    pub fn digit_boundary_guard(&self) -> bool {
        self.digit_boundary_guard
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            min_digits: 3,
            digit_boundary_guard: true,
        }
    }
}

impl Display for TrainerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Minimal digit slots per shape: {}\n Guarding matches against adjacent digits: {}",
            self.min_digits, self.digit_boundary_guard
        )
    }
}

/// This builder can be used to build and customize a `TrainerConfig` structure.
pub struct TrainerConfigBuilder {
    min_digits: usize,
    digit_boundary_guard: bool,
}

impl Default for TrainerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainerConfigBuilder {
    pub fn new() -> Self {
        let defaults = TrainerConfig::default();
        Self {
            min_digits: defaults.min_digits,
            digit_boundary_guard: defaults.digit_boundary_guard,
        }
    }

    pub fn min_digits(mut self, min_digits: usize) -> Self {
        self.min_digits = min_digits;
        self
    }

    pub fn digit_boundary_guard(mut self, digit_boundary_guard: bool) -> Self {
        self.digit_boundary_guard = digit_boundary_guard;
        self
    }

    pub fn build(self) -> TrainerConfig {
        TrainerConfig {
            min_digits: self.min_digits,
            digit_boundary_guard: self.digit_boundary_guard,
        }
    }
}
