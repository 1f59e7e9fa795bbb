//! Canonical JSON and model fingerprints
//!
//! Canonical form: object keys sorted recursively, no whitespace. The
//! fingerprint is the BLAKE3 hash of that form, hex encoded.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanonicalError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Serialize a value to canonical JSON
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string(&sort_keys(value))?)
}

// serde_json only sorts maps when `preserve_order` is off; feature
// unification elsewhere in the graph can turn it on.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k, sort_keys(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// BLAKE3 hash of the canonical JSON form
pub fn fingerprint<T: Serialize>(value: &T) -> Result<[u8; 32], CanonicalError> {
    let json = to_canonical_json(value)?;
    Ok(*blake3::hash(json.as_bytes()).as_bytes())
}

/// Hex-encoded fingerprint (64 chars)
pub fn fingerprint_hex<T: Serialize>(value: &T) -> Result<String, CanonicalError> {
    fingerprint(value).map(hex::encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        zeta: f64,
        alpha: Vec<i64>,
        mid: Inner,
    }

    #[derive(Serialize)]
    struct Inner {
        y: bool,
        b: &'static str,
    }

    fn sample() -> Sample {
        Sample {
            zeta: 1.5,
            alpha: vec![3, 1, 2],
            mid: Inner { y: true, b: "x" },
        }
    }

    #[test]
    fn keys_are_sorted_at_every_level() {
        let json = to_canonical_json(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"alpha":[3,1,2],"mid":{"b":"x","y":true},"zeta":1.5}"#
        );
    }

    #[test]
    fn fingerprint_is_stable_and_sensitive() {
        let a = fingerprint_hex(&sample()).unwrap();
        let b = fingerprint_hex(&sample()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let mut changed = sample();
        changed.zeta = 1.25;
        assert_ne!(a, fingerprint_hex(&changed).unwrap());
    }
}
