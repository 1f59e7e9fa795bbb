//! Random-forest classifier
//!
//! Each tree votes with its leaf's class weights normalised to
//! probabilities; the forest averages the votes and emits the class code at
//! the first maximal index.

use super::tree::Tree;
use crate::errors::ModelError;
use crate::serde_canon::{fingerprint_hex, to_canonical_json};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Artifact format version understood by this crate
pub const FORMAT_VERSION: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomForest {
    pub version: i32,

    /// Width of the input vector
    pub n_features: usize,

    /// Training column names, when the exporter recorded them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,

    /// Class codes; leaf weight `k` refers to `classes[k]`
    pub classes: Vec<i64>,

    pub trees: Vec<Tree>,
}

impl RandomForest {
    pub fn new(n_features: usize, classes: Vec<i64>, trees: Vec<Tree>) -> Self {
        Self {
            version: FORMAT_VERSION,
            n_features,
            feature_names: None,
            classes,
            trees,
        }
    }

    pub fn with_feature_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.version != FORMAT_VERSION {
            return Err(ModelError::ValidationFailed(format!(
                "unsupported model version: {}",
                self.version
            )));
        }
        if self.n_features == 0 {
            return Err(ModelError::ValidationFailed(
                "model declares zero features".to_string(),
            ));
        }
        if self.classes.is_empty() {
            return Err(ModelError::ValidationFailed(
                "model declares no classes".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed(
                "model has no trees".to_string(),
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(ModelError::ValidationFailed(format!(
                    "{} feature names for {} features",
                    names.len(),
                    self.n_features
                )));
            }
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| ModelError::ValidationFailed(format!("tree {i}: {e}")))?;
        }

        Ok(())
    }

    /// Averaged class probabilities, indexed like `classes`
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.n_features {
            return Err(ModelError::FeatureCountMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(ModelError::ValidationFailed(
                "model has no trees".to_string(),
            ));
        }

        let mut totals = vec![0.0; self.classes.len()];
        for (i, tree) in self.trees.iter().enumerate() {
            let weights = tree
                .leaf_weights(features)
                .filter(|w| w.len() == totals.len())
                .ok_or(ModelError::MalformedTree { tree: i })?;
            let sum: f64 = weights.iter().sum();
            if sum <= 0.0 {
                return Err(ModelError::MalformedTree { tree: i });
            }
            for (total, w) in totals.iter_mut().zip(weights) {
                *total += w / sum;
            }
        }

        let n_trees = self.trees.len() as f64;
        totals.iter_mut().for_each(|p| *p /= n_trees);
        Ok(totals)
    }

    /// Predicted class code
    pub fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        let proba = self.predict_proba(features)?;
        let mut best = 0usize;
        for (k, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = k;
            }
        }
        self.classes
            .get(best)
            .copied()
            .ok_or_else(|| ModelError::ValidationFailed("model declares no classes".to_string()))
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Canonical JSON (sorted keys, no whitespace)
    pub fn to_canonical_json(&self) -> Result<String, ModelError> {
        Ok(to_canonical_json(self)?)
    }

    /// BLAKE3 fingerprint of the canonical form, hex encoded
    pub fn hash_hex(&self) -> Result<String, ModelError> {
        Ok(fingerprint_hex(self)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        fs::write(path, self.to_canonical_json()?)?;
        Ok(())
    }

    /// Read and validate an artifact
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let json = fs::read_to_string(path)?;
        let model: RandomForest = serde_json::from_str(&json)?;
        model.validate()?;
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::tree::Node;

    fn two_tree_forest() -> RandomForest {
        let a = Tree::new(vec![
            Node::internal(0, 0, 50.0, 1, 2),
            Node::leaf(1, vec![9.0, 1.0]),
            Node::leaf(2, vec![2.0, 8.0]),
        ]);
        let b = Tree::new(vec![
            Node::internal(0, 1, 1.5, 1, 2),
            Node::leaf(1, vec![3.0, 1.0]),
            Node::leaf(2, vec![1.0, 3.0]),
        ]);
        RandomForest::new(2, vec![0, 1], vec![a, b])
    }

    #[test]
    fn averages_normalised_votes() {
        let forest = two_tree_forest();
        let proba = forest.predict_proba(&[40.0, 1.0]).unwrap();
        // (0.9 + 0.75) / 2 and (0.1 + 0.25) / 2
        assert!((proba[0] - 0.825).abs() < 1e-12);
        assert!((proba[1] - 0.175).abs() < 1e-12);
        assert_eq!(forest.predict(&[40.0, 1.0]).unwrap(), 0);
        assert_eq!(forest.predict(&[60.0, 2.0]).unwrap(), 1);
    }

    #[test]
    fn ties_resolve_to_first_class() {
        // tree a says 0.9 for class 0, tree b says 0.9 for class 1
        let a = Tree::new(vec![Node::leaf(0, vec![9.0, 1.0])]);
        let b = Tree::new(vec![Node::leaf(0, vec![1.0, 9.0])]);
        let forest = RandomForest::new(1, vec![5, 6], vec![a, b]);
        assert_eq!(forest.predict(&[0.0]).unwrap(), 5);
    }

    #[test]
    fn wrong_vector_length_is_an_error() {
        let forest = two_tree_forest();
        match forest.predict(&[1.0]) {
            Err(ModelError::FeatureCountMismatch { expected, actual }) => {
                assert_eq!((expected, actual), (2, 1));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_forest_refuses_to_predict() {
        let forest = RandomForest::new(2, vec![0, 1], Vec::new());
        assert!(matches!(
            forest.predict_proba(&[1.0, 2.0]),
            Err(ModelError::ValidationFailed(_))
        ));
        assert!(matches!(
            forest.predict(&[1.0, 2.0]),
            Err(ModelError::ValidationFailed(_))
        ));
    }

    #[test]
    fn repeated_inference_is_stable() {
        let forest = two_tree_forest();
        let first = forest.predict_proba(&[55.0, 0.5]).unwrap();
        for _ in 0..100 {
            assert_eq!(forest.predict_proba(&[55.0, 0.5]).unwrap(), first);
        }
    }

    #[test]
    fn validation_rules() {
        assert!(two_tree_forest().validate().is_ok());

        let mut bad = two_tree_forest();
        bad.version = 2;
        assert!(bad.validate().is_err());

        let mut bad = two_tree_forest();
        bad.trees.clear();
        assert!(bad.validate().is_err());

        let mut bad = two_tree_forest();
        bad.classes = vec![0, 1, 2];
        assert!(bad.validate().is_err());

        let bad = two_tree_forest().with_feature_names(["only_one"]);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn hash_tracks_content() {
        let a = two_tree_forest();
        assert_eq!(a.hash_hex().unwrap(), two_tree_forest().hash_hex().unwrap());

        let mut b = two_tree_forest();
        b.trees[0].nodes[0].threshold = 51.0;
        assert_ne!(a.hash_hex().unwrap(), b.hash_hex().unwrap());
    }

    #[test]
    fn save_load_roundtrip_keeps_fingerprint() {
        let forest = two_tree_forest().with_feature_names(["x", "y"]);
        let file = tempfile::NamedTempFile::new().unwrap();
        forest.save_json(file.path()).unwrap();

        let loaded = RandomForest::load_json(file.path()).unwrap();
        assert_eq!(loaded, forest);
        assert_eq!(loaded.hash_hex().unwrap(), forest.hash_hex().unwrap());
    }

    #[test]
    fn load_rejects_invalid_structure() {
        let mut forest = two_tree_forest();
        forest.trees[1].nodes[0].left = 7;
        let file = tempfile::NamedTempFile::new().unwrap();
        forest.save_json(file.path()).unwrap();

        assert!(matches!(
            RandomForest::load_json(file.path()),
            Err(ModelError::ValidationFailed(_))
        ));
    }
}
