//! Serializable views of search results.
//!
//! Greedy reports use the `selected_features` / `accuracies` /
//! `final_accuracy` shape with scores rounded to 4 decimals; tree reports use
//! `selectionTree` / `featureNames` with nested `feature`, `feats_now`,
//! `accuracy`, `delta` and `children` nodes.

use crate::search::{SearchPath, SearchTree};
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

/// Rounds to 4 decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreedyReport {
    pub selected_features: Vec<String>,
    pub accuracies: Vec<f64>,
    pub final_accuracy: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub truncated: bool,
}

impl From<&SearchPath> for GreedyReport {
    fn from(path: &SearchPath) -> Self {
        GreedyReport {
            selected_features: path.selected_features(),
            accuracies: path.scores().into_iter().map(round4).collect(),
            final_accuracy: round4(path.final_score),
            truncated: path.truncated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeReportNode {
    pub feature: Option<String>,
    pub feats_now: Vec<String>,
    pub accuracy: f64,
    pub delta: f64,
    pub children: Vec<TreeReportNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeReport {
    pub selection_tree: TreeReportNode,
    pub feature_names: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub truncated: bool,
}

impl From<&SearchTree> for TreeReport {
    fn from(tree: &SearchTree) -> Self {
        // Children have larger ids than parents, so a reverse sweep sees
        // every child finished before its parent.
        let mut built: Vec<Option<TreeReportNode>> = vec![None; tree.len()];
        for node in tree.nodes().iter().rev() {
            let children = node
                .children
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[node.id] = Some(TreeReportNode {
                feature: node.feature.as_ref().map(|f| f.id.clone()),
                feats_now: node.subset.ids(),
                accuracy: node.score,
                delta: node.delta,
                children,
            });
        }
        let root = built
            .first_mut()
            .and_then(Option::take)
            .unwrap_or_else(|| TreeReportNode {
                feature: None,
                feats_now: Vec::new(),
                accuracy: 0.0,
                delta: 0.0,
                children: Vec::new(),
            });
        TreeReport {
            selection_tree: root,
            feature_names: tree.feature_names().to_vec(),
            truncated: tree.truncated(),
        }
    }
}

pub fn greedy_report(path: &SearchPath) -> GreedyReport {
    GreedyReport::from(path)
}

pub fn tree_report(tree: &SearchTree) -> TreeReport {
    TreeReport::from(tree)
}

/// Compact JSON rendering of any report.
pub fn to_json<T: Serialize>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::testing::{ScriptedOracle, features};
    use crate::search::{BranchedTreeSelector, PathStep};

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(1.0), 1.0);
    }

    #[test]
    fn test_greedy_report_shape() {
        let path = SearchPath {
            steps: vec![
                PathStep { feature: "avg_r".into(), column: 0, score: 0.71234 },
                PathStep { feature: "std_gray".into(), column: 3, score: 0.8 },
            ],
            final_score: 0.8,
            evaluations: 7,
            truncated: false,
        };
        let json = to_json(&greedy_report(&path)).unwrap();
        assert_eq!(
            json,
            r#"{"selected_features":["avg_r","std_gray"],"accuracies":[0.7123,0.8],"final_accuracy":0.8}"#
        );
    }

    #[test]
    fn test_truncated_flag_is_emitted_only_when_set() {
        let path = SearchPath {
            steps: Vec::new(),
            final_score: 0.0,
            evaluations: 0,
            truncated: true,
        };
        let value: serde_json::Value = serde_json::to_value(greedy_report(&path)).unwrap();
        assert_eq!(value["truncated"], serde_json::Value::Bool(true));
    }

    #[test]
    fn test_tree_report_nesting() {
        let oracle = ScriptedOracle::additive(vec![0.1, 0.3]);
        let tree = BranchedTreeSelector::new(2, 0.0, 2).build(&oracle, 0.0, &features(2));
        let report = tree_report(&tree);
        let root = &report.selection_tree;
        assert_eq!(root.feature, None);
        assert!(root.feats_now.is_empty());
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].feature.as_deref(), Some("f1"));
        assert_eq!(root.children[0].children[0].feats_now, vec!["f1", "f0"]);
        assert_eq!(report.feature_names, vec!["f0", "f1"]);

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("selectionTree").is_some());
        assert!(value.get("featureNames").is_some());
        assert!(value["selectionTree"]["feature"].is_null());
    }
}
