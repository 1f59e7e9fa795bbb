//! Error types for the model service

use crate::serde_canon::CanonicalError;
use thiserror::Error;

/// Errors raised while loading or evaluating a model artifact
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Canonical serialization error: {0}")]
    Canonical(#[from] CanonicalError),

    /// Artifact parsed but its structure is unusable
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    /// Artifact was trained on a different column layout
    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Expected {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("Tree {tree} did not reach a leaf")]
    MalformedTree { tree: usize },
}

/// Errors raised while turning submitted form values into a feature vector
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("Missing field: {field}")]
    Missing { field: &'static str },

    #[error("Field {field} is not a number: {value:?}")]
    Malformed { field: &'static str, value: String },
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
