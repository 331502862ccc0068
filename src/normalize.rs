//! Lexical normalization of names and text.
//!
//! This is canonicalization of identifiers and prose so that two structurally
//! equivalent documents compare equal. It is unrelated to numeric range scaling,
//! which lives in [`crate::algorithms::minmax`].
//!
//! All functions here are idempotent: normalizing an already normalized value
//! returns it unchanged.

use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").expect("valid regex"));

/// What to do when two distinct keys of one mapping normalize to the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCollisionPolicy {
    /// Keep the value of the key that sorts last among the originals
    #[default]
    LastWriteWins,
    /// Fail with a data integrity error
    Reject,
}

impl KeyCollisionPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "last_write_wins" | "last" => Some(Self::LastWriteWins),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Lowercase, drop underscores, collapse whitespace runs and trim.
///
/// `"User_Name"` becomes `"username"`.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase().replace('_', "");
    WHITESPACE_RUN.replace_all(&lowered, " ").trim().to_string()
}

/// Lowercase prose and fold it onto one line.
///
/// Line breaks (with any surrounding whitespace) and remaining whitespace runs
/// become single spaces. Underscores are kept, since docstrings quote identifiers.
pub fn normalize_docstring(text: &str) -> String {
    let lowered = text.to_lowercase();
    let joined = LINE_BREAK.replace_all(&lowered, " ");
    WHITESPACE_RUN.replace_all(&joined, " ").trim().to_string()
}

/// Normalize a scalar. Non-text values pass through unchanged.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(normalize_text(s)),
        other => other.clone(),
    }
}

/// Normalize every mapping key and scalar leaf, preserving container shape.
///
/// Key collisions resolve with [`KeyCollisionPolicy::LastWriteWins`].
pub fn normalize_content(content: &Value) -> Value {
    match content {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                let normalized = normalize_text(key);
                if out.contains_key(&normalized) {
                    tracing::warn!(
                        "Key '{}' normalizes to existing key '{}'; keeping the later value",
                        key,
                        normalized
                    );
                }
                out.insert(normalized, normalize_content(value));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_content).collect()),
        scalar => normalize_value(scalar),
    }
}

/// [`normalize_content`] with an explicit collision policy.
pub fn normalize_content_with(content: &Value, policy: KeyCollisionPolicy) -> Result<Value> {
    match policy {
        KeyCollisionPolicy::LastWriteWins => Ok(normalize_content(content)),
        KeyCollisionPolicy::Reject => normalize_rejecting_collisions(content),
    }
}

fn normalize_rejecting_collisions(content: &Value) -> Result<Value> {
    match content {
        Value::Object(map) => {
            let mut out = Map::new();
            let mut origins: HashMap<String, &str> = HashMap::new();
            for (key, value) in map {
                let normalized = normalize_text(key);
                if let Some(first) = origins.get(&normalized) {
                    return Err(Error::data_integrity(format!(
                        "keys '{}' and '{}' both normalize to '{}'",
                        first, key, normalized
                    )));
                }
                origins.insert(normalized.clone(), key.as_str());
                out.insert(normalized, normalize_rejecting_collisions(value)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(normalize_rejecting_collisions)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        scalar => Ok(normalize_value(scalar)),
    }
}
