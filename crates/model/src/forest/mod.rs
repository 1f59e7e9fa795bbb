//! Random-forest inference
//!
//! Artifacts are JSON documents exported by the training pipeline:
//!
//! ```json
//! {
//!   "version": 1,
//!   "n_features": 12,
//!   "feature_names": ["age", "anaemia", "..."],
//!   "classes": [0, 1],
//!   "trees": [
//!     {
//!       "nodes": [
//!         {"id":0,"left":1,"right":2,"feature_idx":4,"threshold":30.0,"value":null},
//!         {"id":1,"left":-1,"right":-1,"feature_idx":-1,"threshold":0.0,"value":[2.0,8.0]},
//!         {"id":2,"left":-1,"right":-1,"feature_idx":-1,"threshold":0.0,"value":[9.0,1.0]}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Traversal goes left when `feature <= threshold`. Children always sit at
//! higher positions than their parent, which `validate` enforces.

pub mod model;
pub mod tree;

pub use model::{RandomForest, FORMAT_VERSION};
pub use tree::{Node, Tree};
