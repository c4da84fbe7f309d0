//! FeatureRow — named indicator values for one bar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Indicator values for a single bar, keyed by feature name.
///
/// A NaN value means "not yet available" (indicator still warming up).
/// Values are kept in a `BTreeMap`, so iteration is alphabetical and every
/// consumer that walks a row (notably the linear learner's vocabulary build)
/// sees the same order on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub values: BTreeMap<String, f64>,
}

impl FeatureRow {
    pub fn new(timestamp: DateTime<Utc>, symbol: impl Into<String>) -> Self {
        Self {
            timestamp,
            symbol: symbol.into(),
            values: BTreeMap::new(),
        }
    }

    /// Build a row from `(name, value)` pairs. Handy for tests and for callers
    /// that assemble features by hand.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let mut row = Self::default();
        for (name, value) in pairs {
            row.insert(name, value);
        }
        row
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Raw lookup; returns NaN values as stored.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Lookup that treats NaN the same as an absent key.
    pub fn defined(&self, name: &str) -> Option<f64> {
        self.get(name).filter(|v| !v.is_nan())
    }

    /// Iterate over present, non-NaN features.
    pub fn iter_defined(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_nan())
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Replace every NaN or infinite value with 0.0.
    pub fn sanitize(&mut self) {
        for v in self.values.values_mut() {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for FeatureRow {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH, "")
    }
}
