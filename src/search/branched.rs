//! Branched selection tree.
//!
//! Every node evaluates all remaining one-feature extensions of its subset,
//! ranks them by absolute score (descending, stable), keeps those whose gain
//! over the node exceeds `min_delta`, truncates to `max_branches` and expands
//! each kept child independently until `max_depth`.
//!
//! Nodes live in an arena (`SearchTree`) and are expanded from an explicit
//! stack, in the same depth-first order a recursive expansion would use:
//! all children of a node are created first, then the first child's
//! subtree is completed before the second child is touched.

use super::{BudgetTracker, Candidate, evaluate_extensions};
use crate::common_types::{Dataset, Feature, FeatureSubset};
use crate::config::{SearchBudget, SearchConfig};
use crate::error::Result;
use crate::oracle::{HoldoutOracle, ScoringOracle};

/// Index of a node in its `SearchTree`.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    pub id: NodeId,
    /// Feature added by this node; `None` for the root
    pub feature: Option<Feature>,
    pub subset: FeatureSubset,
    pub score: f64,
    /// Score gain over the parent (0 for the root)
    pub delta: f64,
    pub depth: usize,
    pub children: Vec<NodeId>,
}

/// Arena of search nodes; node 0 is the root. Children always have larger ids than their parent.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    feature_names: Vec<String>,
    evaluations: usize,
    truncated: bool,
}

impl SearchTree {
    pub fn root(&self) -> &SearchNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&SearchNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[SearchNode] {
        &self.nodes
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &SearchNode> + '_ {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(move |node| node.children.iter().map(move |&c| &self.nodes[c]))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deepest node depth (0 for a lone root).
    pub fn height(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Identifiers the search was run over, in caller order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

#[derive(Debug, Clone)]
pub struct BranchedTreeSelector {
    max_branches: usize,
    min_delta: f64,
    max_depth: usize,
    budget: SearchBudget,
}

impl BranchedTreeSelector {
    pub fn new(max_branches: usize, min_delta: f64, max_depth: usize) -> Self {
        BranchedTreeSelector {
            max_branches,
            min_delta,
            max_depth,
            budget: SearchBudget::unlimited(),
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        BranchedTreeSelector::new(config.max_branches, config.min_delta, config.max_depth)
            .with_budget(config.budget)
    }

    /// Ranks by score, then applies the delta cut and the branch limit.
    fn keep(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        // Stable: equal scores keep the remaining-feature order
        candidates.sort_by(|a, b| b.result.score.total_cmp(&a.result.score));
        candidates
            .into_iter()
            .filter(|c| c.result.delta > self.min_delta)
            .take(self.max_branches)
            .collect()
    }

    /// Builds the tree from a root scored at `baseline`.
    pub fn build<O: ScoringOracle + ?Sized>(
        &self,
        oracle: &O,
        baseline: f64,
        features: &[Feature],
    ) -> SearchTree {
        let mut tracker = BudgetTracker::new(self.budget);
        let mut nodes = vec![SearchNode {
            id: 0,
            feature: None,
            subset: FeatureSubset::empty(),
            score: baseline,
            delta: 0.0,
            depth: 0,
            children: Vec::new(),
        }];
        let mut truncated = false;
        let mut stack: Vec<(NodeId, Vec<Feature>)> = vec![(0, features.to_vec())];

        while let Some((id, remaining)) = stack.pop() {
            let (subset, score, depth) = {
                let node = &nodes[id];
                (node.subset.clone(), node.score, node.depth)
            };
            if remaining.is_empty() || depth >= self.max_depth {
                continue;
            }
            if !tracker.try_charge(remaining.len()) {
                tracing::warn!(
                    nodes = nodes.len(),
                    evaluations = tracker.evaluations(),
                    "search budget exhausted, stopping tree expansion"
                );
                truncated = true;
                break;
            }

            let kept = self.keep(evaluate_extensions(oracle, &subset, score, &remaining));
            tracing::debug!(node = id, depth, kept = kept.len(), "expanded node");

            let mut child_ids = Vec::with_capacity(kept.len());
            for candidate in kept {
                let child_id = nodes.len();
                nodes.push(SearchNode {
                    id: child_id,
                    feature: Some(candidate.feature.clone()),
                    subset: candidate.result.subset,
                    score: candidate.result.score,
                    delta: candidate.result.delta,
                    depth: depth + 1,
                    children: Vec::new(),
                });
                let child_remaining: Vec<Feature> = remaining
                    .iter()
                    .filter(|f| f.column != candidate.feature.column)
                    .cloned()
                    .collect();
                child_ids.push((child_id, child_remaining));
            }
            nodes[id].children = child_ids.iter().map(|(c, _)| *c).collect();
            // Reverse so the best-ranked child is expanded first
            stack.extend(child_ids.into_iter().rev());
        }

        tracing::info!(
            nodes = nodes.len(),
            evaluations = tracker.evaluations(),
            "selection tree built"
        );
        SearchTree {
            nodes,
            feature_names: features.iter().map(|f| f.id.clone()).collect(),
            evaluations: tracker.evaluations(),
            truncated,
        }
    }
}

/// Builds the selection tree on one fixed stratified held-out split of `dataset`.
///
/// The root is scored with the majority-class baseline of that split, and
/// every candidate in the tree is scored on the same split.
pub fn branched_select<S: AsRef<str>>(
    dataset: &Dataset,
    feature_ids: &[S],
    config: &SearchConfig,
) -> Result<SearchTree> {
    config.validate()?;
    let features = dataset.matrix().resolve(feature_ids)?;
    let oracle = HoldoutOracle::new(
        dataset,
        config.test_fraction,
        config.random_seed,
        config.classifier.clone(),
    );
    let baseline = oracle.baseline();
    tracing::debug!(baseline, "held-out split established");
    Ok(BranchedTreeSelector::from_config(config).build(&oracle, baseline, &features))
}
