//! Multinomial logistic regression with an L2 penalty.
//!
//! Features are standardized on the training data, weights start at zero and
//! are fitted by full-batch gradient descent, so a given training set always
//! produces the same model. The objective follows the usual `C` convention:
//!
//! ```text
//! mean cross-entropy + ||W||^2 / (2 * C * n)
//! ```
//!
//! Intercepts are not penalized.

use super::{Classifier, argmax, check_training_classes};
use crate::error::OracleFailure;

/// Stop once every gradient component is below this
const GRADIENT_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    c: f64,
    max_iter: usize,
    // --- Learned parameters (populated by fit) ---
    means: Vec<f64>,
    scales: Vec<f64>,
    /// One row of weights per class
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

impl LogisticRegression {
    pub fn new(c: f64, max_iter: usize) -> Self {
        LogisticRegression {
            c,
            max_iter,
            means: Vec::new(),
            scales: Vec::new(),
            weights: Vec::new(),
            intercepts: Vec::new(),
        }
    }

    fn standardize(&self, sample: &[f64]) -> Vec<f64> {
        sample
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect()
    }

    fn logits(&self, z: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| b + w.iter().zip(z).map(|(wi, zi)| wi * zi).sum::<f64>())
            .collect()
    }

    /// Class probabilities for one raw (unstandardized) sample.
    pub fn predict_proba(&self, sample: &[f64]) -> Vec<f64> {
        softmax(&self.logits(&self.standardize(sample)))
    }
}

fn softmax(raw_scores: &[f64]) -> Vec<f64> {
    // Log-sum-exp trick for numerical stability
    let max_val = raw_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = raw_scores.iter().map(|&s| (s - max_val).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

fn column_moments(features: &[Vec<f64>], n_features: usize) -> (Vec<f64>, Vec<f64>) {
    let n = features.len() as f64;
    let mut means = vec![0.0; n_features];
    for row in features {
        for (m, x) in means.iter_mut().zip(row) {
            *m += x / n;
        }
    }
    let mut scales = vec![0.0; n_features];
    for row in features {
        for ((s, x), m) in scales.iter_mut().zip(row).zip(&means) {
            *s += (x - m) * (x - m) / n;
        }
    }
    for s in scales.iter_mut() {
        *s = s.sqrt();
        // Constant column: leave it centred at zero instead of dividing by zero
        if *s <= f64::EPSILON {
            *s = 1.0;
        }
    }
    (means, scales)
}

impl Classifier for LogisticRegression {
    fn fit(
        &mut self,
        features: &[Vec<f64>],
        classes: &[usize],
        n_classes: usize,
    ) -> Result<(), OracleFailure> {
        check_training_classes(classes, n_classes)?;
        let n_features = features.first().map_or(0, Vec::len);
        let n = features.len() as f64;

        let (means, scales) = column_moments(features, n_features);
        self.means = means;
        self.scales = scales;
        let standardized: Vec<Vec<f64>> = features.iter().map(|row| self.standardize(row)).collect();

        self.weights = vec![vec![0.0; n_features]; n_classes];
        self.intercepts = vec![0.0; n_classes];

        let l2 = 1.0 / (self.c * n);
        // Inverse of a Lipschitz bound on the gradient for standardized inputs
        let step = 1.0 / (0.5 * (n_features as f64 + 1.0) + l2);

        for _ in 0..self.max_iter {
            let mut grad_w = vec![vec![0.0; n_features]; n_classes];
            let mut grad_b = vec![0.0; n_classes];

            for (z, &class) in standardized.iter().zip(classes) {
                let probs = softmax(&self.logits(z));
                for (k, p) in probs.iter().enumerate() {
                    let residual = (p - if k == class { 1.0 } else { 0.0 }) / n;
                    grad_b[k] += residual;
                    for (g, zi) in grad_w[k].iter_mut().zip(z) {
                        *g += residual * zi;
                    }
                }
            }

            let mut largest = 0.0_f64;
            for k in 0..n_classes {
                for (g, w) in grad_w[k].iter_mut().zip(&self.weights[k]) {
                    *g += l2 * w;
                    largest = largest.max(g.abs());
                }
                largest = largest.max(grad_b[k].abs());
            }
            if largest < GRADIENT_TOLERANCE {
                break;
            }

            for k in 0..n_classes {
                for (w, g) in self.weights[k].iter_mut().zip(&grad_w[k]) {
                    *w -= step * g;
                }
                self.intercepts[k] -= step * grad_b[k];
            }
        }

        let finite = self.intercepts.iter().all(|b| b.is_finite())
            && self.weights.iter().flatten().all(|w| w.is_finite());
        if !finite {
            return Err(OracleFailure::Diverged);
        }
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Vec<usize> {
        features
            .iter()
            .map(|row| argmax(&self.predict_proba(row)))
            .collect()
    }
}
