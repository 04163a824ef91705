//! Feature-subset selection driven by a cross-validated or held-out scoring oracle.
//!
//! Two searches are provided:
//! - [`search::GreedyForwardSelector`]: hill climbing, one feature per step
//! - [`search::BranchedTreeSelector`]: a pruned tree of feature subsets
//!
//! Both consult a [`oracle::ScoringOracle`] and produce structures the
//! [`report`] module turns into JSON.
//!
//! ```no_run
//! use branch_select::{Dataset, FeatureMatrix, LabelVector, SearchConfig};
//! use branch_select::report::{greedy_report, to_json};
//! use branch_select::search::greedy_select;
//!
//! let matrix = FeatureMatrix::new(vec!["avg_r", "std_gray"], vec![vec![0.1, 3.0], vec![0.9, 2.5]])?;
//! let dataset = Dataset::new(matrix, LabelVector::new(&["cat", "dog"]))?;
//! let path = greedy_select(&dataset, &["avg_r", "std_gray"], &SearchConfig::default())?;
//! println!("{}", to_json(&greedy_report(&path)).unwrap());
//! # Ok::<(), branch_select::SelectionError>(())
//! ```

pub mod classifier;
pub mod common_types;
pub mod config;
pub mod error;
pub mod oracle;
pub mod ranking;
pub mod report;
pub mod search;
pub mod split;

#[cfg(feature = "python")]
mod python;

pub use common_types::{Dataset, Feature, FeatureMatrix, FeatureSubset, LabelVector};
pub use config::{ClassifierKind, Distance, EvaluationPolicy, SearchBudget, SearchConfig};
pub use error::{OracleFailure, Result, SelectionError};
pub use oracle::{CrossValidatedOracle, HoldoutOracle, ScoreResult, ScoringOracle};
pub use search::{BranchedTreeSelector, GreedyForwardSelector, SearchPath, SearchTree};
