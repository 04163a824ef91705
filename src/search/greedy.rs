//! Greedy forward selection: one path, one accepted feature per step, no backtracking.

use super::{BudgetTracker, evaluate_extensions};
use crate::common_types::{Dataset, Feature, FeatureSubset};
use crate::config::{SearchBudget, SearchConfig};
use crate::error::Result;
use crate::oracle::{ScoringOracle, oracle_for};

/// One accepted feature and the cumulative score after accepting it.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStep {
    pub feature: String,
    pub column: usize,
    pub score: f64,
}

/// Outcome of a greedy search, steps in acceptance order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPath {
    pub steps: Vec<PathStep>,
    /// Score of the last accepted subset, or the starting score when nothing was accepted
    pub final_score: f64,
    pub evaluations: usize,
    /// Set when the budget stopped the search early
    pub truncated: bool,
}

impl SearchPath {
    pub fn selected_features(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.feature.clone()).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.score).collect()
    }
}

#[derive(Debug, Clone)]
pub struct GreedyForwardSelector {
    min_improvement: f64,
    budget: SearchBudget,
}

impl GreedyForwardSelector {
    /// Score a search starts from before any feature is accepted.
    pub const INITIAL_SCORE: f64 = 0.0;

    pub fn new(min_improvement: f64) -> Self {
        GreedyForwardSelector {
            min_improvement,
            budget: SearchBudget::unlimited(),
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        GreedyForwardSelector::new(config.min_improvement).with_budget(config.budget)
    }

    /// Runs the search over `features`, whose order decides score ties.
    pub fn select<O: ScoringOracle + ?Sized>(&self, oracle: &O, features: &[Feature]) -> SearchPath {
        let mut tracker = BudgetTracker::new(self.budget);
        let mut selected = FeatureSubset::empty();
        let mut remaining: Vec<Feature> = features.to_vec();
        let mut best_score = Self::INITIAL_SCORE;
        let mut steps = Vec::new();
        let mut truncated = false;

        while !remaining.is_empty() {
            if !tracker.try_charge(remaining.len()) {
                tracing::warn!(
                    accepted = steps.len(),
                    evaluations = tracker.evaluations(),
                    "search budget exhausted, stopping greedy selection"
                );
                truncated = true;
                break;
            }

            let candidates = evaluate_extensions(oracle, &selected, best_score, &remaining);
            // First encountered wins ties
            let mut best: Option<&super::Candidate> = None;
            for candidate in &candidates {
                if best.is_none_or(|b| candidate.result.score > b.result.score) {
                    best = Some(candidate);
                }
            }

            let Some(best) = best else {
                tracing::debug!(step = steps.len(), "no candidate could be scored");
                break;
            };
            if best.result.score <= best_score + self.min_improvement {
                tracing::debug!(
                    step = steps.len(),
                    best = best.result.score,
                    current = best_score,
                    "no candidate improves the current subset"
                );
                break;
            }

            let accepted = best.feature.clone();
            best_score = best.result.score;
            selected = best.result.subset.clone();
            remaining.retain(|f| f.column != accepted.column);
            tracing::debug!(feature = %accepted.id, score = best_score, "accepted feature");
            steps.push(PathStep {
                feature: accepted.id,
                column: accepted.column,
                score: best_score,
            });
        }

        tracing::info!(
            accepted = steps.len(),
            final_score = best_score,
            evaluations = tracker.evaluations(),
            "greedy selection finished"
        );
        SearchPath {
            steps,
            final_score: best_score,
            evaluations: tracker.evaluations(),
            truncated,
        }
    }
}

/// Validates inputs, builds the configured oracle and runs greedy selection over `feature_ids` in the given order.
pub fn greedy_select<S: AsRef<str>>(
    dataset: &Dataset,
    feature_ids: &[S],
    config: &SearchConfig,
) -> Result<SearchPath> {
    config.validate()?;
    let features = dataset.matrix().resolve(feature_ids)?;
    let oracle = oracle_for(dataset, config);
    Ok(GreedyForwardSelector::from_config(config).select(oracle.as_ref(), &features))
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;

    #[test]
    fn test_picks_best_then_stops_when_nothing_improves() {
        let mut oracle = ScriptedOracle::additive(vec![0.3, 0.6, 0.1]);
        // f1 alone is best; adding anything afterwards hurts
        oracle.exact.insert(vec![0, 1], 0.55);
        oracle.exact.insert(vec![1, 2], 0.5);
        let path = GreedyForwardSelector::new(0.0).select(&oracle, &features(3));
        assert_eq!(path.selected_features(), vec!["f1"]);
        assert_eq!(path.final_score, 0.6);
        assert_eq!(path.evaluations, 5);
        assert!(!path.truncated);
    }

    #[test]
    fn test_accumulates_until_exhausted() {
        let oracle = ScriptedOracle::additive(vec![0.1, 0.3, 0.2]);
        let path = GreedyForwardSelector::new(0.0).select(&oracle, &features(3));
        assert_eq!(path.selected_features(), vec!["f1", "f2", "f0"]);
        let scores = path.scores();
        assert!(scores.windows(2).all(|w| w[0] < w[1]));
        assert!((path.final_score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_ties_follow_caller_order() {
        let mut oracle = ScriptedOracle::additive(vec![0.5, 0.5]);
        oracle.exact.insert(vec![0, 1], 0.5);
        let mut reversed = features(2);
        reversed.reverse();
        let path = GreedyForwardSelector::new(0.0).select(&oracle, &reversed);
        assert_eq!(path.selected_features(), vec!["f1"]);

        let path = GreedyForwardSelector::new(0.0).select(&oracle, &features(2));
        assert_eq!(path.selected_features(), vec!["f0"]);
    }

    #[test]
    fn test_min_improvement_blocks_small_gains() {
        let oracle = ScriptedOracle::additive(vec![0.5, 0.01]);
        let path = GreedyForwardSelector::new(0.05).select(&oracle, &features(2));
        assert_eq!(path.selected_features(), vec!["f0"]);
    }

    #[test]
    fn test_all_failures_give_empty_path() {
        let path = GreedyForwardSelector::new(0.0).select(&FailingOracle, &features(4));
        assert!(path.steps.is_empty());
        assert_eq!(path.final_score, GreedyForwardSelector::INITIAL_SCORE);
    }

    #[test]
    fn test_failing_candidate_is_skipped() {
        let mut oracle = ScriptedOracle::additive(vec![0.9, 0.2]);
        oracle.failing = vec![0];
        let path = GreedyForwardSelector::new(0.0).select(&oracle, &features(2));
        assert_eq!(path.selected_features(), vec!["f1"]);
    }

    #[test]
    fn test_budget_stops_before_a_step() {
        let oracle = ScriptedOracle::additive(vec![0.1, 0.3, 0.2]);
        let budget = SearchBudget {
            max_evaluations: Some(4),
            time_limit_ms: None,
        };
        let path = GreedyForwardSelector::new(0.0).with_budget(budget).select(&oracle, &features(3));
        // 3 evaluations for step one, step two needs 2 more
        assert_eq!(path.selected_features(), vec!["f1"]);
        assert_eq!(path.evaluations, 3);
        assert!(path.truncated);
    }
}
