#![allow(dead_code)]

use branch_select::{Dataset, Feature, FeatureMatrix, LabelVector, OracleFailure, ScoringOracle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic scores in [0, 1) derived from a hash of the sorted subset.
pub struct PseudoRandomOracle {
    pub salt: u64,
}

impl ScoringOracle for PseudoRandomOracle {
    fn evaluate(&self, columns: &[usize]) -> Result<f64, OracleFailure> {
        let mut key = columns.to_vec();
        key.sort_unstable();
        let mut hasher = DefaultHasher::new();
        self.salt.hash(&mut hasher);
        key.hash(&mut hasher);
        Ok((hasher.finish() % 10_000) as f64 / 10_000.0)
    }
}

/// Per-column scores for single features, pairs and larger subsets score as their best member.
pub struct TableOracle {
    pub singles: Vec<f64>,
}

impl ScoringOracle for TableOracle {
    fn evaluate(&self, columns: &[usize]) -> Result<f64, OracleFailure> {
        columns
            .iter()
            .map(|&c| self.singles[c])
            .max_by(|a, b| a.total_cmp(b))
            .ok_or(OracleFailure::EmptySubset)
    }
}

pub struct AlwaysFails;

impl ScoringOracle for AlwaysFails {
    fn evaluate(&self, _columns: &[usize]) -> Result<f64, OracleFailure> {
        Err(OracleFailure::SingleClassTraining { found: 1 })
    }
}

pub fn features(n: usize) -> Vec<Feature> {
    (0..n).map(|c| Feature::new(c, format!("f{c}"))).collect()
}

/// Balanced binary labels; column `signal_column` equals the label, every other column is uniform noise.
pub fn signal_among_noise(n_samples: usize, n_features: usize, signal_column: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let labels: Vec<u8> = (0..n_samples).map(|i| (i % 2) as u8).collect();
    let rows = labels
        .iter()
        .map(|&label| {
            (0..n_features)
                .map(|c| {
                    if c == signal_column {
                        label as f64
                    } else {
                        rng.gen_range(0.0..1.0)
                    }
                })
                .collect()
        })
        .collect();
    let ids: Vec<String> = (0..n_features).map(|c| format!("f{c}")).collect();
    let matrix = FeatureMatrix::new(ids, rows).expect("valid matrix");
    Dataset::new(matrix, LabelVector::new(&labels)).expect("valid dataset")
}

/// Like `signal_among_noise`, but the non-signal columns are constant.
pub fn signal_among_constants(n_samples: usize, n_features: usize, signal_column: usize) -> Dataset {
    let labels: Vec<u8> = (0..n_samples).map(|i| (i % 2) as u8).collect();
    let rows = labels
        .iter()
        .map(|&label| {
            (0..n_features)
                .map(|c| if c == signal_column { label as f64 } else { 1.0 })
                .collect()
        })
        .collect();
    let ids: Vec<String> = (0..n_features).map(|c| format!("f{c}")).collect();
    let matrix = FeatureMatrix::new(ids, rows).expect("valid matrix");
    Dataset::new(matrix, LabelVector::new(&labels)).expect("valid dataset")
}
