//! Scoring oracles: the black box the selectors consult for every candidate subset.

use crate::common_types::{Dataset, FeatureSubset};
use crate::config::{ClassifierKind, EvaluationPolicy, SearchConfig};
use crate::error::OracleFailure;
use crate::split::{Partition, stratified_folds, stratified_holdout};

/// Scores a subset of matrix columns.
///
/// Implementations are bound to one dataset and must be deterministic for a
/// given subset; the selectors rely on that for reproducible ordering.
pub trait ScoringOracle: Sync {
    fn evaluate(&self, columns: &[usize]) -> Result<f64, OracleFailure>;
}

/// Score of one evaluated subset and its gain over the parent subset.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub subset: FeatureSubset,
    pub score: f64,
    pub delta: f64,
}

/// Evaluates `subset` and pairs the score with its delta versus `parent_score`.
pub fn score_subset<O: ScoringOracle + ?Sized>(
    oracle: &O,
    subset: FeatureSubset,
    parent_score: f64,
) -> Result<ScoreResult, OracleFailure> {
    let score = oracle.evaluate(&subset.columns())?;
    Ok(ScoreResult {
        delta: score - parent_score,
        subset,
        score,
    })
}

fn check_columns(dataset: &Dataset, columns: &[usize]) -> Result<(), OracleFailure> {
    if columns.is_empty() {
        return Err(OracleFailure::EmptySubset);
    }
    let available = dataset.matrix().n_features();
    match columns.iter().find(|&&c| c >= available) {
        Some(&column) => Err(OracleFailure::UnknownColumn { column, available }),
        None => Ok(()),
    }
}

/// Trains on `partition.train`, scores on `partition.test`.
fn partition_accuracy(
    dataset: &Dataset,
    classifier: &ClassifierKind,
    partition: &Partition,
    columns: &[usize],
) -> Result<f64, OracleFailure> {
    if partition.test.is_empty() {
        return Err(OracleFailure::EmptyEvaluation);
    }
    let classes = dataset.labels().classes();
    let train_x = dataset.matrix().project(&partition.train, columns);
    let train_y: Vec<usize> = partition.train.iter().map(|&i| classes[i]).collect();
    let test_x = dataset.matrix().project(&partition.test, columns);
    let test_y: Vec<usize> = partition.test.iter().map(|&i| classes[i]).collect();

    let mut model = classifier.build();
    model.fit(&train_x, &train_y, dataset.labels().n_classes())?;
    model.score(&test_x, &test_y)
}

/// Mean accuracy over fixed stratified folds.
#[derive(Debug)]
pub struct CrossValidatedOracle<'a> {
    dataset: &'a Dataset,
    classifier: ClassifierKind,
    n_folds: usize,
    folds: Option<Vec<Partition>>,
}

impl<'a> CrossValidatedOracle<'a> {
    pub fn new(dataset: &'a Dataset, folds: usize, seed: u64, classifier: ClassifierKind) -> Self {
        let labels = dataset.labels();
        CrossValidatedOracle {
            dataset,
            classifier,
            n_folds: folds,
            folds: stratified_folds(labels.classes(), labels.n_classes(), folds, seed),
        }
    }
}

impl ScoringOracle for CrossValidatedOracle<'_> {
    fn evaluate(&self, columns: &[usize]) -> Result<f64, OracleFailure> {
        check_columns(self.dataset, columns)?;
        let folds = self.folds.as_ref().ok_or(OracleFailure::TooFewSamples {
            samples: self.dataset.n_samples(),
            folds: self.n_folds,
        })?;
        let mut total = 0.0;
        for fold in folds {
            total += partition_accuracy(self.dataset, &self.classifier, fold, columns)?;
        }
        Ok(total / folds.len() as f64)
    }
}

/// Accuracy on one stratified held-out split, established once at construction.
#[derive(Debug)]
pub struct HoldoutOracle<'a> {
    dataset: &'a Dataset,
    classifier: ClassifierKind,
    split: Partition,
}

impl<'a> HoldoutOracle<'a> {
    pub fn new(dataset: &'a Dataset, test_fraction: f64, seed: u64, classifier: ClassifierKind) -> Self {
        let labels = dataset.labels();
        HoldoutOracle {
            dataset,
            classifier,
            split: stratified_holdout(labels.classes(), labels.n_classes(), test_fraction, seed),
        }
    }

    pub fn split(&self) -> &Partition {
        &self.split
    }

    /// Accuracy of always answering the most frequent held-out label (lowest class on ties).
    pub fn baseline(&self) -> f64 {
        if self.split.test.is_empty() {
            return 0.0;
        }
        let classes = self.dataset.labels().classes();
        let mut counts = vec![0usize; self.dataset.labels().n_classes()];
        for &i in &self.split.test {
            counts[classes[i]] += 1;
        }
        let majority = counts.iter().copied().max().unwrap_or(0);
        majority as f64 / self.split.test.len() as f64
    }
}

impl ScoringOracle for HoldoutOracle<'_> {
    fn evaluate(&self, columns: &[usize]) -> Result<f64, OracleFailure> {
        check_columns(self.dataset, columns)?;
        partition_accuracy(self.dataset, &self.classifier, &self.split, columns)
    }
}

/// The oracle selected by `config.policy`.
pub fn oracle_for<'a>(dataset: &'a Dataset, config: &SearchConfig) -> Box<dyn ScoringOracle + 'a> {
    match config.policy {
        EvaluationPolicy::CrossValidated => Box::new(CrossValidatedOracle::new(
            dataset,
            config.cv_folds,
            config.random_seed,
            config.classifier.clone(),
        )),
        EvaluationPolicy::HeldOut => Box::new(HoldoutOracle::new(
            dataset,
            config.test_fraction,
            config.random_seed,
            config.classifier.clone(),
        )),
    }
}
