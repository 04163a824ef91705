//! Feature-subset search: the greedy single-path selector and the branched tree selector.

pub mod branched;
pub mod greedy;

pub use branched::{BranchedTreeSelector, NodeId, SearchNode, SearchTree, branched_select};
pub use greedy::{GreedyForwardSelector, PathStep, SearchPath, greedy_select};

use crate::common_types::{Feature, FeatureSubset};
use crate::config::SearchBudget;
use crate::oracle::{ScoreResult, ScoringOracle, score_subset};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A one-feature extension that the oracle scored successfully.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub feature: Feature,
    pub result: ScoreResult,
}

/// Tracks oracle work against a `SearchBudget`.
///
/// Work is charged per expansion step, before the step runs, so a step is
/// either evaluated completely or not at all.
#[derive(Debug)]
pub(crate) struct BudgetTracker {
    budget: SearchBudget,
    started: Instant,
    evaluations: usize,
}

impl BudgetTracker {
    pub(crate) fn new(budget: SearchBudget) -> Self {
        BudgetTracker {
            budget,
            started: Instant::now(),
            evaluations: 0,
        }
    }

    /// Reserves `count` evaluations; `false` when the budget cannot cover them.
    pub(crate) fn try_charge(&mut self, count: usize) -> bool {
        if let Some(limit) = self.budget.time_limit() {
            if self.started.elapsed() >= limit {
                return false;
            }
        }
        if let Some(max) = self.budget.max_evaluations {
            if self.evaluations + count > max {
                return false;
            }
        }
        self.evaluations += count;
        true
    }

    pub(crate) fn evaluations(&self) -> usize {
        self.evaluations
    }
}

fn evaluate_one<O: ScoringOracle + ?Sized>(
    oracle: &O,
    base: &FeatureSubset,
    parent_score: f64,
    feature: &Feature,
) -> Option<Candidate> {
    match score_subset(oracle, base.extended(feature), parent_score) {
        Ok(result) => Some(Candidate {
            feature: feature.clone(),
            result,
        }),
        Err(failure) => {
            tracing::debug!(feature = %feature.id, %failure, "candidate could not be scored");
            None
        }
    }
}

/// Scores `base + f` for every `f` in `remaining`.
///
/// Failed evaluations are dropped; successes keep `remaining` order.
pub(crate) fn evaluate_extensions<O: ScoringOracle + ?Sized>(
    oracle: &O,
    base: &FeatureSubset,
    parent_score: f64,
    remaining: &[Feature],
) -> Vec<Candidate> {
    #[cfg(feature = "parallel")]
    let scored: Vec<Option<Candidate>> = remaining
        .par_iter()
        .map(|feature| evaluate_one(oracle, base, parent_score, feature))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let scored: Vec<Option<Candidate>> = remaining
        .iter()
        .map(|feature| evaluate_one(oracle, base, parent_score, feature))
        .collect();

    scored.into_iter().flatten().collect()
}
