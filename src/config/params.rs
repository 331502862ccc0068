//! Algorithm parameters namespaced by algorithm name (`dbscan.eps`).

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Options for a single algorithm, keyed by option name.
pub type AlgorithmParams = Map<String, Value>;

/// Parameters for every algorithm in a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet {
    by_algorithm: BTreeMap<String, AlgorithmParams>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for `algorithm`, empty when none were given.
    pub fn for_algorithm(&self, algorithm: &str) -> AlgorithmParams {
        self.by_algorithm
            .get(&algorithm.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Set one option; the algorithm name is case-folded.
    pub fn set(&mut self, algorithm: &str, key: impl Into<String>, value: Value) {
        self.by_algorithm
            .entry(algorithm.to_lowercase())
            .or_default()
            .insert(key.into(), value);
    }

    /// Parse and apply an `algorithm.key=value` assignment.
    ///
    /// The value is read as JSON when it parses (`0.3`, `[0, 1]`, `true`) and kept
    /// as text otherwise (`english`, `a,b`).
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<()> {
        let (path, raw) = assignment.split_once('=').ok_or_else(|| {
            Error::configuration(format!(
                "invalid parameter '{}' (expected algorithm.key=value)",
                assignment
            ))
        })?;
        let (algorithm, key) = path
            .trim()
            .split_once('.')
            .filter(|(a, k)| !a.is_empty() && !k.is_empty())
            .ok_or_else(|| {
                Error::configuration(format!(
                    "invalid parameter name '{}' (expected algorithm.key)",
                    path.trim()
                ))
            })?;
        let raw = raw.trim();
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::from(raw));
        self.set(algorithm, key, value);
        Ok(())
    }

    /// Overlay `other` on top of `self`, key by key.
    pub fn merge(&mut self, other: &ParamSet) {
        for (algorithm, params) in &other.by_algorithm {
            for (key, value) in params {
                self.set(algorithm, key.clone(), value.clone());
            }
        }
    }

    /// The same parameters with every algorithm name case-folded.
    pub fn case_folded(&self) -> Self {
        let mut folded = Self::new();
        folded.merge(self);
        folded
    }

    /// Algorithm names that received parameters.
    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.by_algorithm.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_algorithm.is_empty()
    }
}
