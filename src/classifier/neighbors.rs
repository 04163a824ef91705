//! Brute-force k-nearest-neighbours classifier.

use super::heap_utils::KBestNeighbors;
use super::{Classifier, check_training_classes};
use crate::config::Distance;
use crate::error::OracleFailure;

// --- Helper functions for vector operations ---

fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Calculates the magnitude (L2 norm) of a vector.
fn magnitude(vec: &[f64]) -> f64 {
    vec.iter().map(|x| x * x).sum::<f64>().sqrt()
}

pub fn minkowski_distance(a: &[f64], b: &[f64], p: u32) -> f64 {
    let sum_of_powers: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs().powf(f64::from(p)))
        .sum();
    sum_of_powers.powf(1.0 / f64::from(p))
}

/// Cosine distance = 1 - cosine similarity.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let dot = dot_product(a, b);
    let mag_a = magnitude(a);
    let mag_b = magnitude(b);
    if mag_a == 0.0 || mag_b == 0.0 {
        // Two zero vectors coincide; one zero vector is maximally far.
        return if mag_a == mag_b { 0.0 } else { 1.0 };
    }
    // Clamp to [-1, 1] against floating point drift
    let similarity = (dot / (mag_a * mag_b)).clamp(-1.0, 1.0);
    1.0 - similarity
}

pub fn distance_between(metric: Distance, a: &[f64], b: &[f64]) -> f64 {
    match metric {
        Distance::Euclidean => minkowski_distance(a, b, 2),
        Distance::Manhattan => minkowski_distance(a, b, 1),
        Distance::Minkowski { p } => minkowski_distance(a, b, p),
        Distance::Cosine => cosine_distance(a, b),
    }
}

/// Majority vote among the `k` nearest training samples.
///
/// Vote ties go to the lowest class index.
#[derive(Debug, Clone)]
pub struct NearestNeighbors {
    k: usize,
    distance: Distance,
    training_features: Vec<Vec<f64>>,
    training_classes: Vec<usize>,
    n_classes: usize,
}

impl NearestNeighbors {
    pub fn new(k: usize, distance: Distance) -> Self {
        NearestNeighbors {
            k,
            distance,
            training_features: Vec::new(),
            training_classes: Vec::new(),
            n_classes: 0,
        }
    }

    fn predict_one(&self, sample: &[f64]) -> usize {
        let mut nearest = KBestNeighbors::new(self.k);
        for (train, &class) in self.training_features.iter().zip(&self.training_classes) {
            nearest.add(distance_between(self.distance, sample, train), class);
        }
        let mut votes = vec![0usize; self.n_classes.max(1)];
        for class in nearest.into_sorted_points() {
            votes[class] += 1;
        }
        let mut best = 0;
        for (class, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = class;
            }
        }
        best
    }
}

impl Classifier for NearestNeighbors {
    fn fit(
        &mut self,
        features: &[Vec<f64>],
        classes: &[usize],
        n_classes: usize,
    ) -> Result<(), OracleFailure> {
        check_training_classes(classes, n_classes)?;
        self.training_features = features.to_vec();
        self.training_classes = classes.to_vec();
        self.n_classes = n_classes;
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Vec<usize> {
        features.iter().map(|sample| self.predict_one(sample)).collect()
    }
}
