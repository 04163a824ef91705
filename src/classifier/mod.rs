//! Classifiers the scoring oracle can train on a candidate feature subset.

pub mod heap_utils;
pub mod logistic;
pub mod neighbors;

pub use logistic::LogisticRegression;
pub use neighbors::NearestNeighbors;

use crate::error::OracleFailure;

/// A trainable classifier over dense class indices.
///
/// `fit` replaces any previous state. Implementations must be deterministic:
/// the same training data always yields the same predictions.
pub trait Classifier: Send {
    fn fit(
        &mut self,
        features: &[Vec<f64>],
        classes: &[usize],
        n_classes: usize,
    ) -> Result<(), OracleFailure>;

    fn predict(&self, features: &[Vec<f64>]) -> Vec<usize>;

    /// Fraction of `features` whose prediction equals `classes`.
    fn score(&self, features: &[Vec<f64>], classes: &[usize]) -> Result<f64, OracleFailure> {
        if features.is_empty() {
            return Err(OracleFailure::EmptyEvaluation);
        }
        Ok(accuracy(&self.predict(features), classes))
    }
}

/// Fraction of positions where `predicted` and `actual` agree.
pub fn accuracy(predicted: &[usize], actual: &[usize]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let hits = predicted.iter().zip(actual).filter(|(p, a)| p == a).count();
    hits as f64 / actual.len() as f64
}

/// Rejects training sets a classifier cannot learn from (fewer than two classes).
pub(crate) fn check_training_classes(classes: &[usize], n_classes: usize) -> Result<(), OracleFailure> {
    let mut present = vec![false; n_classes.max(1)];
    for &c in classes {
        if c < present.len() {
            present[c] = true;
        }
    }
    let found = present.iter().filter(|&&p| p).count();
    if found < 2 {
        return Err(OracleFailure::SingleClassTraining { found });
    }
    Ok(())
}

/// Index of the largest value; the first one wins ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
