use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use heartfail_model::RandomForest;

fn main() -> Result<()> {
    let model_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: compute_model_hash <model_path>")?;

    let model = RandomForest::load_json(&model_path)
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;

    println!("{}", model.hash_hex()?);
    Ok(())
}
