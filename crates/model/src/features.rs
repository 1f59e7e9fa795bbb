//! Clinical feature schema
//!
//! The classifier was fit on one exact column order. `FEATURE_ORDER` is the
//! single place that order is written down; every conversion from named
//! fields to vector positions goes through it.

use crate::errors::FeatureError;
use serde::{Deserialize, Serialize};

/// Number of features the classifier consumes
pub const FEATURE_COUNT: usize = 12;

/// Column order the model was trained on
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "age",
    "anaemia",
    "creatinine_phosphokinase",
    "diabetes",
    "ejection_fraction",
    "high_blood_pressure",
    "platelets",
    "serum_creatinine",
    "serum_sodium",
    "sex",
    "smoking",
    "time",
];

/// Position of a named feature in the vector
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_ORDER.iter().position(|candidate| *candidate == name)
}

/// Fixed-order numeric encoding of the twelve clinical inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build from values already laid out in `FEATURE_ORDER`
    pub fn from_ordered(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Look up a value by feature name
    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|idx| self.0[idx])
    }
}

/// Raw clinical inputs as submitted by the form
///
/// Values stay as the submitted strings so they can be echoed back
/// verbatim. Every field is optional on the wire and required when the
/// vector is assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    pub age: Option<String>,
    pub anaemia: Option<String>,
    pub creatinine_phosphokinase: Option<String>,
    pub diabetes: Option<String>,
    pub ejection_fraction: Option<String>,
    pub high_blood_pressure: Option<String>,
    pub platelets: Option<String>,
    pub serum_creatinine: Option<String>,
    pub serum_sodium: Option<String>,
    pub sex: Option<String>,
    pub smoking: Option<String>,
    pub time: Option<String>,
}

impl ClinicalRecord {
    /// Named raw values, in `FEATURE_ORDER`
    pub fn fields(&self) -> [(&'static str, Option<&str>); FEATURE_COUNT] {
        let values = [
            &self.age,
            &self.anaemia,
            &self.creatinine_phosphokinase,
            &self.diabetes,
            &self.ejection_fraction,
            &self.high_blood_pressure,
            &self.platelets,
            &self.serum_creatinine,
            &self.serum_sodium,
            &self.sex,
            &self.smoking,
            &self.time,
        ];
        let mut out = [("", None); FEATURE_COUNT];
        for (slot, (name, value)) in out.iter_mut().zip(FEATURE_ORDER.iter().zip(values)) {
            *slot = (*name, value.as_deref());
        }
        out
    }

    /// Build a record from submitted name/value pairs
    ///
    /// The first value wins when a name repeats; unknown names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut record = Self::default();
        for (name, value) in pairs {
            let Some(idx) = feature_index(name.as_ref()) else {
                continue;
            };
            if let Some(slot) = record.slots_mut().into_iter().nth(idx) {
                if slot.is_none() {
                    *slot = Some(value.into());
                }
            }
        }
        record
    }

    fn slots_mut(&mut self) -> [&mut Option<String>; FEATURE_COUNT] {
        [
            &mut self.age,
            &mut self.anaemia,
            &mut self.creatinine_phosphokinase,
            &mut self.diabetes,
            &mut self.ejection_fraction,
            &mut self.high_blood_pressure,
            &mut self.platelets,
            &mut self.serum_creatinine,
            &mut self.serum_sodium,
            &mut self.sex,
            &mut self.smoking,
            &mut self.time,
        ]
    }

    /// Parse every field as a finite decimal number and lay them out in order
    pub fn to_feature_vector(&self) -> Result<FeatureVector, FeatureError> {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, (field, raw)) in values.iter_mut().zip(self.fields()) {
            let raw = raw.ok_or(FeatureError::Missing { field })?;
            *slot = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| FeatureError::Malformed {
                    field,
                    value: raw.to_string(),
                })?;
        }
        Ok(FeatureVector(values))
    }
}
