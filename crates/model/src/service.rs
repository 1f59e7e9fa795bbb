//! Model service: the single classifier a process serves
//!
//! Loaded once at startup and never mutated afterwards, so a shared
//! reference can be read from any number of request handlers at once.

use crate::errors::ModelError;
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_ORDER};
use crate::forest::RandomForest;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub struct ModelService {
    model: RandomForest,
    fingerprint: String,
}

impl ModelService {
    /// Load, validate and fingerprint the artifact at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let model = RandomForest::load_json(path)?;
        let service = Self::from_model(model)?;
        info!(
            path = %path.display(),
            fingerprint = %service.fingerprint,
            trees = service.model.num_trees(),
            "loaded model artifact"
        );
        Ok(service)
    }

    /// Wrap an in-memory forest, checking it against the clinical schema
    pub fn from_model(model: RandomForest) -> Result<Self, ModelError> {
        model.validate()?;
        check_schema(&model)?;
        let fingerprint = model.hash_hex()?;
        Ok(Self { model, fingerprint })
    }

    /// Class code for one clinical feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError> {
        self.model.predict(features.as_slice())
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Fail unless the fingerprint equals `expected` (case-insensitive)
    pub fn verify_fingerprint(&self, expected: &str) -> Result<(), ModelError> {
        let expected = expected.trim();
        if self.fingerprint.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(ModelError::ValidationFailed(format!(
                "model hash mismatch: expected {expected}, computed {}",
                self.fingerprint
            )))
        }
    }

    pub fn model(&self) -> &RandomForest {
        &self.model
    }
}

fn check_schema(model: &RandomForest) -> Result<(), ModelError> {
    if model.n_features != FEATURE_COUNT {
        return Err(ModelError::SchemaMismatch(format!(
            "artifact expects {} features, the clinical schema has {FEATURE_COUNT}",
            model.n_features
        )));
    }

    if let Some(names) = &model.feature_names {
        if let Some((pos, (got, want))) = names
            .iter()
            .zip(FEATURE_ORDER)
            .enumerate()
            .find(|(_, (got, want))| got.as_str() != *want)
        {
            return Err(ModelError::SchemaMismatch(format!(
                "column {pos} is {got:?}, expected {want:?}"
            )));
        }
    }

    Ok(())
}
