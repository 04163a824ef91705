//! Search configuration.
//!
//! Every field has a default, so an empty TOML document (or
//! `SearchConfig::default()`) reproduces the stock behaviour:
//! greedy cross-validation with 5 folds, tree search with 2 branches,
//! depth 4 and a 0.01 delta cut on a 0.33 held-out split seeded with 42.

use crate::classifier::{Classifier, LogisticRegression, NearestNeighbors};
use crate::error::{Result, SelectionError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the oracle turns a trained classifier into a score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationPolicy {
    /// Mean accuracy over `cv_folds` stratified folds
    CrossValidated,
    /// Accuracy on one fixed stratified held-out split
    HeldOut,
}

/// Distance used by the nearest-neighbour classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Distance {
    Euclidean,
    Manhattan,
    Minkowski { p: u32 },
    Cosine,
}

/// Classifier trained by the oracle for every candidate subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ClassifierKind {
    LogisticRegression {
        #[serde(default = "default_c")]
        c: f64,
        #[serde(default = "default_max_iter")]
        max_iter: usize,
    },
    NearestNeighbors {
        k: usize,
        #[serde(default = "default_distance")]
        distance: Distance,
    },
}

fn default_c() -> f64 {
    1.0
}

fn default_max_iter() -> usize {
    1000
}

fn default_distance() -> Distance {
    Distance::Euclidean
}

impl Default for ClassifierKind {
    fn default() -> Self {
        ClassifierKind::LogisticRegression {
            c: default_c(),
            max_iter: default_max_iter(),
        }
    }
}

impl ClassifierKind {
    /// A fresh, untrained classifier of this kind.
    pub fn build(&self) -> Box<dyn Classifier> {
        match self {
            ClassifierKind::LogisticRegression { c, max_iter } => {
                Box::new(LogisticRegression::new(*c, *max_iter))
            }
            ClassifierKind::NearestNeighbors { k, distance } => {
                Box::new(NearestNeighbors::new(*k, *distance))
            }
        }
    }
}

/// Safety rail on the amount of oracle work a single search may do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBudget {
    /// Maximum number of oracle evaluations
    pub max_evaluations: Option<usize>,
    /// Wall-clock limit in milliseconds
    pub time_limit_ms: Option<u64>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        SearchBudget::default()
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Greedy: a candidate must beat the current best by more than this
    pub min_improvement: f64,
    /// Tree: a child must beat its parent by more than this
    pub min_delta: f64,
    pub max_branches: usize,
    pub max_depth: usize,
    pub cv_folds: usize,
    /// Fraction of samples held out for evaluation
    pub test_fraction: f64,
    pub random_seed: u64,
    /// Greedy scoring policy; the tree selector always scores on the held-out split
    pub policy: EvaluationPolicy,
    pub classifier: ClassifierKind,
    pub budget: SearchBudget,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            min_improvement: 0.0,
            min_delta: 0.01,
            max_branches: 2,
            max_depth: 4,
            cv_folds: 5,
            test_fraction: 0.33,
            random_seed: 42,
            policy: EvaluationPolicy::CrossValidated,
            classifier: ClassifierKind::default(),
            budget: SearchBudget::unlimited(),
        }
    }
}

impl SearchConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_improvement.is_finite() && self.min_improvement >= 0.0) {
            return Err(SelectionError::InvalidConfig(
                "min_improvement must be a finite, non-negative number".into(),
            ));
        }
        if !self.min_delta.is_finite() {
            return Err(SelectionError::InvalidConfig("min_delta must be finite".into()));
        }
        if self.max_branches == 0 {
            return Err(SelectionError::InvalidConfig(
                "max_branches must be greater than 0".into(),
            ));
        }
        if self.cv_folds < 2 {
            return Err(SelectionError::InvalidConfig(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(SelectionError::InvalidConfig(format!(
                "test_fraction must lie in (0, 1), got {}",
                self.test_fraction
            )));
        }
        match &self.classifier {
            ClassifierKind::LogisticRegression { c, max_iter } => {
                if !(c.is_finite() && *c > 0.0) {
                    return Err(SelectionError::InvalidConfig(
                        "logistic regression C must be strictly positive".into(),
                    ));
                }
                if *max_iter == 0 {
                    return Err(SelectionError::InvalidConfig(
                        "logistic regression max_iter must be greater than 0".into(),
                    ));
                }
            }
            ClassifierKind::NearestNeighbors { k, distance } => {
                if *k == 0 {
                    return Err(SelectionError::InvalidConfig(
                        "k must be greater than 0 for nearest neighbours".into(),
                    ));
                }
                if let Distance::Minkowski { p } = distance {
                    if *p == 0 || *p > i32::MAX as u32 {
                        return Err(SelectionError::InvalidConfig(format!(
                            "Minkowski order p must lie in 1..={}, got {p}",
                            i32::MAX
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
