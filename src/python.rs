//! Python bindings (enabled with the `python` feature).
//!
//! Each function takes sample rows, string labels and feature names and
//! returns the JSON report as a string.

use crate::common_types::{Dataset, FeatureMatrix, LabelVector};
use crate::config::{EvaluationPolicy, SearchConfig};
use crate::error::SelectionError;
use crate::ranking::{RankingMetric, rank_features};
use crate::report::{greedy_report, to_json, tree_report};
use crate::search::{branched_select, greedy_select};
use pyo3::prelude::*;

fn value_error(message: impl ToString) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(message.to_string())
}

fn from_selection_error(err: SelectionError) -> PyErr {
    value_error(err)
}

fn build_dataset(rows: Vec<Vec<f64>>, labels: Vec<String>, feature_names: Vec<String>) -> PyResult<Dataset> {
    let matrix = FeatureMatrix::new(feature_names, rows).map_err(from_selection_error)?;
    Dataset::new(matrix, LabelVector::new(&labels)).map_err(from_selection_error)
}

fn parse_policy(policy: &str) -> PyResult<EvaluationPolicy> {
    match policy {
        "cv" | "cross_validated" => Ok(EvaluationPolicy::CrossValidated),
        "holdout" | "held_out" => Ok(EvaluationPolicy::HeldOut),
        other => Err(value_error(format!(
            "policy must be 'cv' or 'holdout', got '{other}'"
        ))),
    }
}

#[pyfunction(name = "greedy_select")]
#[pyo3(signature = (rows, labels, feature_names, min_improvement = 0.0, cv_folds = 5, random_seed = 42, policy = "cv"))]
fn greedy_select_py(
    rows: Vec<Vec<f64>>,
    labels: Vec<String>,
    feature_names: Vec<String>,
    min_improvement: f64,
    cv_folds: usize,
    random_seed: u64,
    policy: &str,
) -> PyResult<String> {
    let dataset = build_dataset(rows, labels, feature_names.clone())?;
    let config = SearchConfig {
        min_improvement,
        cv_folds,
        random_seed,
        policy: parse_policy(policy)?,
        ..SearchConfig::default()
    };
    let path = greedy_select(&dataset, &feature_names, &config).map_err(from_selection_error)?;
    to_json(&greedy_report(&path)).map_err(value_error)
}

#[pyfunction(name = "branched_select")]
#[pyo3(signature = (rows, labels, feature_names, max_branches = 2, min_delta = 0.01, max_depth = 4, test_fraction = 0.33, random_seed = 42))]
#[allow(clippy::too_many_arguments)]
fn branched_select_py(
    rows: Vec<Vec<f64>>,
    labels: Vec<String>,
    feature_names: Vec<String>,
    max_branches: usize,
    min_delta: f64,
    max_depth: usize,
    test_fraction: f64,
    random_seed: u64,
) -> PyResult<String> {
    let dataset = build_dataset(rows, labels, feature_names.clone())?;
    let config = SearchConfig {
        max_branches,
        min_delta,
        max_depth,
        test_fraction,
        random_seed,
        ..SearchConfig::default()
    };
    let tree = branched_select(&dataset, &feature_names, &config).map_err(from_selection_error)?;
    to_json(&tree_report(&tree)).map_err(value_error)
}

#[pyfunction(name = "rank_features")]
#[pyo3(signature = (rows, labels, feature_names, metric = "mi", top_n = 10))]
fn rank_features_py(
    rows: Vec<Vec<f64>>,
    labels: Vec<String>,
    feature_names: Vec<String>,
    metric: &str,
    top_n: usize,
) -> PyResult<String> {
    let dataset = build_dataset(rows, labels, feature_names)?;
    let metric: RankingMetric = metric.parse().map_err(from_selection_error)?;
    to_json(&rank_features(&dataset, metric, top_n)).map_err(value_error)
}

/// The name of this function must match the `lib.name` in `Cargo.toml`.
#[pymodule]
fn branch_select(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(greedy_select_py, m)?)?;
    m.add_function(wrap_pyfunction!(branched_select_py, m)?)?;
    m.add_function(wrap_pyfunction!(rank_features_py, m)?)?;
    Ok(())
}
