//! Declared configuration options and typed access to them.

use crate::config::AlgorithmParams;
use crate::errors::{Error, Result};
use serde_json::Value;

/// Value shape an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Float,
    Integer,
    Boolean,
    Text,
    /// A single word, or a list of words (array or comma-separated text)
    TextList,
    /// Two floats, as an array or comma-separated text
    FloatPair,
}

impl OptionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Integer => "int",
            Self::Boolean => "bool",
            Self::Text => "text",
            Self::TextList => "text|list",
            Self::FloatPair => "(float, float)",
        }
    }
}

/// One recognized option of an algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionSpec {
    pub key: &'static str,
    pub kind: OptionKind,
    /// Default rendered for help output
    pub default: &'static str,
    pub help: &'static str,
}

impl OptionSpec {
    pub const fn new(
        key: &'static str,
        kind: OptionKind,
        default: &'static str,
        help: &'static str,
    ) -> Self {
        Self {
            key,
            kind,
            default,
            help,
        }
    }
}

/// Typed reader over one algorithm's parameter mapping.
///
/// Construction rejects keys the algorithm does not declare.
pub struct OptionReader<'a> {
    algorithm: &'a str,
    params: &'a AlgorithmParams,
}

impl<'a> OptionReader<'a> {
    pub fn new(
        algorithm: &'a str,
        specs: &[OptionSpec],
        params: &'a AlgorithmParams,
    ) -> Result<Self> {
        if let Some(unknown) = params.keys().find(|k| !specs.iter().any(|s| s.key == k.as_str())) {
            let recognized = specs.iter().map(|s| s.key).collect::<Vec<_>>();
            return Err(Error::configuration(format!(
                "{}: unknown option '{}' (recognized: {})",
                algorithm,
                unknown,
                if recognized.is_empty() {
                    "none".to_string()
                } else {
                    recognized.join(", ")
                }
            )));
        }
        Ok(Self { algorithm, params })
    }

    fn invalid(&self, key: &str, expected: &str, got: &Value) -> Error {
        Error::configuration(format!(
            "{}: option '{}' expects {}, got {}",
            self.algorithm, key, expected, got
        ))
    }

    pub fn float(&self, key: &str, default: f64) -> Result<f64> {
        match self.params.get(key) {
            None => Ok(default),
            Some(value) => parse_float(value).ok_or_else(|| self.invalid(key, "a float", value)),
        }
    }

    pub fn integer(&self, key: &str, default: i64) -> Result<i64> {
        match self.params.get(key) {
            None => Ok(default),
            Some(value) => {
                parse_integer(value).ok_or_else(|| self.invalid(key, "an integer", value))
            }
        }
    }

    pub fn boolean(&self, key: &str, default: bool) -> Result<bool> {
        match self.params.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" => Ok(false),
                _ => Err(self.invalid(key, "a boolean", &Value::String(s.clone()))),
            },
            Some(value) => Err(self.invalid(key, "a boolean", value)),
        }
    }

    pub fn text(&self, key: &str, default: &str) -> Result<String> {
        match self.params.get(key) {
            None => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(value) => Err(self.invalid(key, "text", value)),
        }
    }

    /// A list of words; a single word comes back as a one-element list.
    pub fn text_list(&self, key: &str, default: &[&str]) -> Result<Vec<String>> {
        match self.params.get(key) {
            None => Ok(default.iter().map(|s| s.to_string()).collect()),
            Some(Value::String(s)) => Ok(s
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.invalid(key, "a list of words", item))
                })
                .collect(),
            Some(value) => Err(self.invalid(key, "a word or a list of words", value)),
        }
    }

    pub fn float_pair(&self, key: &str, default: (f64, f64)) -> Result<(f64, f64)> {
        let Some(value) = self.params.get(key) else {
            return Ok(default);
        };
        let parts: Option<Vec<f64>> = match value {
            Value::Array(items) => items.iter().map(parse_float).collect(),
            Value::String(s) => s
                .trim_matches(|c| c == '(' || c == ')' || c == '[' || c == ']')
                .split(',')
                .map(|p| parse_float(&Value::from(p.trim())))
                .collect(),
            _ => None,
        };
        match parts.as_deref() {
            Some([lo, hi]) => Ok((*lo, *hi)),
            _ => Err(self.invalid(key, "two floats", value)),
        }
    }
}

fn parse_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
