//! Weighted random selection over discrete outcome tables.
//!
//! A [`WeightedTable`] holds an ordered list of outcomes with individual
//! probabilities. Selection scans the table in order, accumulating probability
//! mass, and returns the first outcome whose cumulative sum reaches the draw.
//! Tables are not required to sum to exactly 1.0: a draw that lands beyond the
//! final cumulative sum resolves to the last entry of the table.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single labelled outcome with its selection probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedOutcome<T> {
    /// The value returned when this outcome is selected.
    pub label: T,
    /// Probability mass of this outcome, in `(0, 1]`.
    pub probability: f64,
}

impl<T> WeightedOutcome<T> {
    /// Creates a new weighted outcome.
    #[must_use]
    pub fn new(label: T, probability: f64) -> Self {
        Self { label, probability }
    }
}

/// Errors that can occur when building a weighted table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightedTableError {
    /// The table has no outcomes.
    #[error("Weighted table must contain at least one outcome")]
    Empty,

    /// An outcome's probability is outside `(0, 1]`.
    #[error("Outcome #{index} has probability {probability}, expected a value in (0, 1]")]
    InvalidProbability {
        /// Position of the offending outcome.
        index: usize,
        /// The rejected probability.
        probability: f64,
    },
}

/// A validated, non-empty table of weighted outcomes.
///
/// # Example
///
/// ```
/// use shared::generator::{WeightedOutcome, WeightedTable};
///
/// let table = WeightedTable::new(vec![
///     WeightedOutcome::new("INFO", 0.6),
///     WeightedOutcome::new("WARN", 0.25),
///     WeightedOutcome::new("ERROR", 0.15),
/// ])
/// .unwrap();
///
/// assert_eq!(*table.pick(0.0), "INFO");
/// assert_eq!(*table.pick(0.7), "WARN");
/// assert_eq!(*table.pick(0.99), "ERROR");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable<T> {
    outcomes: Vec<WeightedOutcome<T>>,
}

impl<T> WeightedTable<T> {
    /// Builds a table from an ordered list of outcomes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The list is empty
    /// - Any probability is not in `(0, 1]` (NaN included)
    pub fn new(outcomes: Vec<WeightedOutcome<T>>) -> Result<Self, WeightedTableError> {
        if outcomes.is_empty() {
            return Err(WeightedTableError::Empty);
        }

        if let Some((index, outcome)) = outcomes
            .iter()
            .enumerate()
            .find(|(_, o)| !(o.probability > 0.0 && o.probability <= 1.0))
        {
            return Err(WeightedTableError::InvalidProbability {
                index,
                probability: outcome.probability,
            });
        }

        Ok(Self { outcomes })
    }

    /// Returns the outcome whose cumulative range contains `r`.
    ///
    /// `r` is expected in `[0, 1)`. When `r` exceeds the cumulative sum of the
    /// whole table, the last outcome is returned.
    #[must_use]
    pub fn pick(&self, r: f64) -> &T {
        let mut cumulative = 0.0;
        self.outcomes
            .iter()
            .find(|outcome| {
                cumulative += outcome.probability;
                r <= cumulative
            })
            .or_else(|| self.outcomes.last())
            .map(|outcome| &outcome.label)
            .expect("weighted table is never empty")
    }

    /// Draws a uniform value in `[0, 1)` and picks the matching outcome.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        let r: f64 = rng.gen();
        self.pick(r)
    }

    /// Sum of all declared probabilities.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.outcomes.iter().map(|o| o.probability).sum()
    }

    /// Iterates over the labels in table order.
    pub fn labels(&self) -> impl Iterator<Item = &T> {
        self.outcomes.iter().map(|o| &o.label)
    }

    /// Number of outcomes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Always `false`; tables are non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl<T: Clone> TryFrom<&[WeightedOutcome<T>]> for WeightedTable<T> {
    type Error = WeightedTableError;

    fn try_from(outcomes: &[WeightedOutcome<T>]) -> Result<Self, Self::Error> {
        Self::new(outcomes.to_vec())
    }
}
