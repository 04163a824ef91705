//! This module contains the data structures shared by the oracle, the selectors and the reporter.

use crate::error::{Result, SelectionError};
use std::collections::HashSet;

/// A named column of the feature matrix.
///
/// Selectors work on `Feature`s rather than raw column indices so that the
/// caller's enumeration order (and therefore tie-breaking) is explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub column: usize,
    pub id: String,
}

impl Feature {
    pub fn new(column: usize, id: impl Into<String>) -> Self {
        Feature { column, id: id.into() }
    }
}

/// Samples as rows of `f64`, with one unique identifier per column.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    feature_ids: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Builds a matrix, rejecting empty or duplicate identifiers, ragged rows and non-finite values.
    pub fn new<S: Into<String>>(feature_ids: Vec<S>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let feature_ids: Vec<String> = feature_ids.into_iter().map(Into::into).collect();
        if feature_ids.is_empty() {
            return Err(SelectionError::NoFeatures);
        }
        let mut seen = HashSet::with_capacity(feature_ids.len());
        for id in &feature_ids {
            if !seen.insert(id.as_str()) {
                return Err(SelectionError::DuplicateFeature { id: id.clone() });
            }
        }
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != feature_ids.len() {
                return Err(SelectionError::RaggedRow {
                    row: row_idx,
                    expected: feature_ids.len(),
                    actual: row.len(),
                });
            }
            if let Some(col) = row.iter().position(|v| !v.is_finite()) {
                return Err(SelectionError::NonFiniteValue {
                    row: row_idx,
                    feature: feature_ids[col].clone(),
                });
            }
        }
        Ok(FeatureMatrix { feature_ids, rows })
    }

    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_samples(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_ids.len()
    }

    pub fn column_of(&self, id: &str) -> Option<usize> {
        self.feature_ids.iter().position(|f| f == id)
    }

    /// Copies the requested columns (in the given order) for the requested rows.
    pub fn project(&self, sample_indices: &[usize], columns: &[usize]) -> Vec<Vec<f64>> {
        sample_indices
            .iter()
            .map(|&i| columns.iter().map(|&c| self.rows[i][c]).collect())
            .collect()
    }

    /// Every feature of the matrix in column order.
    pub fn features(&self) -> Vec<Feature> {
        self.feature_ids
            .iter()
            .enumerate()
            .map(|(column, id)| Feature::new(column, id.clone()))
            .collect()
    }

    /// Resolves a caller-supplied ordered identifier sequence into features.
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Feature>> {
        if ids.is_empty() {
            return Err(SelectionError::NoFeatures);
        }
        let mut seen = HashSet::with_capacity(ids.len());
        let mut features = Vec::with_capacity(ids.len());
        for id in ids {
            let id = id.as_ref();
            if !seen.insert(id) {
                return Err(SelectionError::DuplicateFeature { id: id.to_string() });
            }
            let column = self
                .column_of(id)
                .ok_or_else(|| SelectionError::UnknownFeature { id: id.to_string() })?;
            features.push(Feature::new(column, id));
        }
        Ok(features)
    }
}

/// Categorical labels encoded as dense class indices.
///
/// Classes are numbered in ascending label order, so "lowest class index"
/// and "smallest label" are the same tie-break.
#[derive(Debug, Clone)]
pub struct LabelVector {
    classes: Vec<usize>,
    class_names: Vec<String>,
}

impl LabelVector {
    pub fn new<L: Ord + Clone + ToString>(labels: &[L]) -> Self {
        let mut distinct: Vec<L> = labels.to_vec();
        distinct.sort();
        distinct.dedup();
        let classes = labels
            .iter()
            .map(|l| distinct.binary_search(l).unwrap_or_default())
            .collect();
        LabelVector {
            classes,
            class_names: distinct.iter().map(ToString::to_string).collect(),
        }
    }

    /// Class index per sample.
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    pub fn n_classes(&self) -> usize {
        self.class_names.len()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// A validated matrix/label pair, read-only for the duration of a search.
#[derive(Debug, Clone)]
pub struct Dataset {
    matrix: FeatureMatrix,
    labels: LabelVector,
}

impl Dataset {
    pub fn new(matrix: FeatureMatrix, labels: LabelVector) -> Result<Self> {
        if matrix.n_samples() != labels.len() {
            return Err(SelectionError::LengthMismatch {
                samples: matrix.n_samples(),
                labels: labels.len(),
            });
        }
        if labels.n_classes() < 2 {
            return Err(SelectionError::TooFewClasses {
                found: labels.n_classes(),
            });
        }
        Ok(Dataset { matrix, labels })
    }

    pub fn matrix(&self) -> &FeatureMatrix {
        &self.matrix
    }

    pub fn labels(&self) -> &LabelVector {
        &self.labels
    }

    pub fn n_samples(&self) -> usize {
        self.matrix.n_samples()
    }
}

/// Columns used so far at one search point, in acceptance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSubset {
    features: Vec<Feature>,
}

impl FeatureSubset {
    pub fn empty() -> Self {
        FeatureSubset::default()
    }

    /// A new subset with `feature` appended; an already present column is not duplicated.
    pub fn extended(&self, feature: &Feature) -> Self {
        let mut features = self.features.clone();
        if !features.iter().any(|f| f.column == feature.column) {
            features.push(feature.clone());
        }
        FeatureSubset { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn columns(&self) -> Vec<usize> {
        self.features.iter().map(|f| f.column).collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.features.iter().map(|f| f.id.clone()).collect()
    }

    pub fn contains(&self, column: usize) -> bool {
        self.features.iter().any(|f| f.column == column)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> FeatureMatrix {
        FeatureMatrix::new(vec!["a", "b", "c"], vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_matrix_rejects_ragged_rows() {
        let err = FeatureMatrix::new(vec!["a", "b"], vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(err, SelectionError::RaggedRow { row: 1, expected: 2, actual: 1 });
    }

    #[test]
    fn test_matrix_rejects_duplicate_and_empty_ids() {
        assert_eq!(
            FeatureMatrix::new(vec!["a", "a"], vec![]).unwrap_err(),
            SelectionError::DuplicateFeature { id: "a".into() }
        );
        assert_eq!(
            FeatureMatrix::new(Vec::<String>::new(), vec![]).unwrap_err(),
            SelectionError::NoFeatures
        );
    }

    #[test]
    fn test_matrix_rejects_nan() {
        let err = FeatureMatrix::new(vec!["a", "b"], vec![vec![1.0, f64::NAN]]).unwrap_err();
        assert_eq!(err, SelectionError::NonFiniteValue { row: 0, feature: "b".into() });
    }

    #[test]
    fn test_resolve_keeps_caller_order() {
        let m = matrix();
        let features = m.resolve(&["c", "a"]).unwrap();
        assert_eq!(features, vec![Feature::new(2, "c"), Feature::new(0, "a")]);
        assert_eq!(m.resolve(&["z"]).unwrap_err(), SelectionError::UnknownFeature { id: "z".into() });
        assert_eq!(m.resolve(&["a", "a"]).unwrap_err(), SelectionError::DuplicateFeature { id: "a".into() });
        assert_eq!(m.resolve::<&str>(&[]).unwrap_err(), SelectionError::NoFeatures);
    }

    #[test]
    fn test_project_selects_rows_and_columns() {
        let m = matrix();
        assert_eq!(m.project(&[1], &[2, 0]), vec![vec![6.0, 4.0]]);
    }

    #[test]
    fn test_labels_encode_in_sorted_order() {
        let labels = LabelVector::new(&["dog", "cat", "dog", "bird"]);
        assert_eq!(labels.class_names(), &["bird", "cat", "dog"]);
        assert_eq!(labels.classes(), &[2, 1, 2, 0]);
    }

    #[test]
    fn test_dataset_contract() {
        let m = matrix();
        assert_eq!(
            Dataset::new(m.clone(), LabelVector::new(&[1, 2, 3])).unwrap_err(),
            SelectionError::LengthMismatch { samples: 2, labels: 3 }
        );
        assert_eq!(
            Dataset::new(m.clone(), LabelVector::new(&[1, 1])).unwrap_err(),
            SelectionError::TooFewClasses { found: 1 }
        );
        assert!(Dataset::new(m, LabelVector::new(&[0, 1])).is_ok());
    }

    #[test]
    fn test_subset_extension_is_duplicate_free() {
        let a = Feature::new(0, "a");
        let subset = FeatureSubset::empty().extended(&a).extended(&a);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset.ids(), vec!["a".to_string()]);
    }
}
