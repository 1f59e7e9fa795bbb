//! Decision tree structures for forest inference

use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf)
///
/// Internal nodes carry `feature_idx >= 0` and child indices; leaves carry
/// `feature_idx == -1` and a per-class weight vector in `value`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Node ID (informational, traversal uses positions)
    pub id: i32,

    /// Left child index (-1 for leaves)
    pub left: i32,

    /// Right child index (-1 for leaves)
    pub right: i32,

    #[serde(rename = "feature_idx", alias = "feature")]
    pub feature_idx: i32,

    /// Split threshold; samples with `feature <= threshold` go left
    pub threshold: f64,

    /// Per-class weights (Some for leaves)
    pub value: Option<Vec<f64>>,
}

impl Node {
    pub fn internal(id: i32, feature_idx: i32, threshold: f64, left: i32, right: i32) -> Self {
        Self {
            id,
            left,
            right,
            feature_idx,
            threshold,
            value: None,
        }
    }

    pub fn leaf(id: i32, value: Vec<f64>) -> Self {
        Self {
            id,
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0.0,
            value: Some(value),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_idx < 0 || self.value.is_some()
    }
}

/// A single classification tree; node 0 is the root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Walk from the root to a leaf and return its class weights
    ///
    /// Returns `None` when the walk leaves the tree, hits a leaf without
    /// weights, or needs a feature the slice does not have. The walk is
    /// bounded by the node count, so cyclic trees also end in `None`.
    pub fn leaf_weights(&self, features: &[f64]) -> Option<&[f64]> {
        let mut idx = 0usize;

        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx)?;
            if node.is_leaf() {
                return node.value.as_deref();
            }

            let value = *features.get(usize::try_from(node.feature_idx).ok()?)?;
            let next = if value <= node.threshold {
                node.left
            } else {
                node.right
            };
            idx = usize::try_from(next).ok()?;
        }

        None
    }

    /// Check structure against the forest's feature and class counts
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        let len = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                let weights = node
                    .value
                    .as_ref()
                    .ok_or_else(|| format!("leaf {i} has no class weights"))?;
                if weights.len() != n_classes {
                    return Err(format!(
                        "leaf {i} has {} class weights, expected {n_classes}",
                        weights.len()
                    ));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {i} has a negative or non-finite weight"));
                }
                if weights.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {i} has zero total weight"));
                }
                continue;
            }

            // Children must point forward; this also rules out cycles.
            for (side, child) in [("left", node.left), ("right", node.right)] {
                let in_range = usize::try_from(child).map_or(false, |c| c > i && c < len);
                if !in_range {
                    return Err(format!("node {i} has invalid {side} child {child}"));
                }
            }

            let feature_ok = usize::try_from(node.feature_idx).map_or(false, |f| f < n_features);
            if !feature_ok {
                return Err(format!(
                    "node {i} splits on feature {} outside 0..{n_features}",
                    node.feature_idx
                ));
            }
            if !node.threshold.is_finite() {
                return Err(format!("node {i} has a non-finite threshold"));
            }
        }

        Ok(())
    }
}
