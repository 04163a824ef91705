//! Error types for the selection engine.
//!
//! Two layers:
//! - `SelectionError`: caller-facing contract and configuration errors, raised
//!   before any search work is done
//! - `OracleFailure`: a single candidate could not be scored; selectors treat
//!   it as non-improving and keep going

use thiserror::Error;

/// Result alias for fallible public operations.
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Main error type for input validation and configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// No feature identifiers were supplied
    #[error("Feature identifier list is empty")]
    NoFeatures,

    /// Identifier sequence contains the same name twice
    #[error("Duplicate feature identifier '{id}'")]
    DuplicateFeature { id: String },

    /// Identifier not present in the feature matrix
    #[error("Unknown feature identifier '{id}'")]
    UnknownFeature { id: String },

    /// A sample row does not match the identifier count
    #[error("Sample {row} has {actual} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// NaN or infinite value in the feature matrix
    #[error("Sample {row}, feature '{feature}' is not a finite number")]
    NonFiniteValue { row: usize, feature: String },

    /// Matrix and label vector disagree on the number of samples
    #[error("Feature matrix has {samples} samples but {labels} labels were given")]
    LengthMismatch { samples: usize, labels: usize },

    /// Fewer than two label values, no classifier can be scored
    #[error("At least 2 distinct labels are required, found {found}")]
    TooFewClasses { found: usize },

    /// Unsupported ranking metric name
    #[error("Unsupported ranking metric '{0}'")]
    UnknownMetric(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// TOML configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),
}

impl From<toml::de::Error> for SelectionError {
    fn from(err: toml::de::Error) -> Self {
        SelectionError::ConfigParse(err.to_string())
    }
}

/// Why one candidate subset could not be scored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleFailure {
    #[error("cannot score an empty feature subset")]
    EmptySubset,

    #[error("feature column {column} is out of range for {available} columns")]
    UnknownColumn { column: usize, available: usize },

    #[error("{samples} samples cannot be split into {folds} folds")]
    TooFewSamples { samples: usize, folds: usize },

    /// Training partition holds a single class
    #[error("training partition contains {found} class(es), need at least 2")]
    SingleClassTraining { found: usize },

    #[error("evaluation partition is empty")]
    EmptyEvaluation,

    /// Classifier parameters diverged
    #[error("classifier produced non-finite parameters")]
    Diverged,
}
