//! Heart-failure survival classifier
//!
//! Loads a random-forest artifact once and predicts survival (`0`) or
//! death (`1`) from twelve clinical features.
//!
//! Modules:
//! - `features`: the ordered clinical schema and form-record conversion
//! - `forest`: random-forest structures and inference
//! - `service`: the loaded, shared model and its fingerprint
//! - `outcome`: class code to label mapping
//! - `serde_canon`: canonical JSON and BLAKE3 fingerprints

pub mod errors;
pub mod features;
pub mod forest;
pub mod outcome;
pub mod serde_canon;
pub mod service;

pub use errors::{FeatureError, ModelError};
pub use features::{feature_index, ClinicalRecord, FeatureVector, FEATURE_COUNT, FEATURE_ORDER};
pub use forest::{Node, RandomForest, Tree};
pub use outcome::Outcome;
pub use service::ModelService;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Deserialize a model artifact from `path`
pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<ModelService, ModelError> {
    ModelService::load(path)
}
