//! Prediction labels

use serde::Serialize;
use std::fmt;

/// Human-readable outcome for a class code emitted by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Survived,
    Death,
    /// Code outside the binary label set
    Unknown,
}

impl Outcome {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Outcome::Death,
            0 => Outcome::Survived,
            _ => Outcome::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Survived => "survived",
            Outcome::Death => "death",
            Outcome::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
