//! API structure documents and the generic value helpers every algorithm shares.
//!
//! Documents travel through the engine as [`serde_json::Value`] trees so that a
//! pipeline step can replace an API structure with any document of the same
//! general shape (scaled leaves, a feature matrix). [`ApiStructure`] is the typed
//! view used where the member records themselves matter.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key under which TF-IDF stores its feature matrix.
pub const FEATURES_KEY: &str = "tfidf_features";
/// Key under which TF-IDF stores its vocabulary.
pub const FEATURE_NAMES_KEY: &str = "feature_names";

/// Comparisons and pipelines need at least this many input structures.
pub const MIN_STRUCTURES: usize = 2;

/// Usage error unless there are enough structures to compare.
pub fn ensure_comparable(structures: &[Value]) -> Result<()> {
    if structures.len() < MIN_STRUCTURES {
        return Err(Error::usage(format!(
            "at least {} structures are required for comparison, got {}",
            MIN_STRUCTURES,
            structures.len()
        )));
    }
    Ok(())
}

/// Kind of a public API member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemberKind {
    #[serde(rename = "function")]
    Function,
    #[serde(rename = "async function")]
    AsyncFunction,
    #[serde(rename = "method")]
    Method,
    #[serde(rename = "async method")]
    AsyncMethod,
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "module")]
    Module,
}

impl MemberKind {
    /// Callables and classes take part in comparisons; modules are containers only.
    pub fn is_comparable(self) -> bool {
        !matches!(self, Self::Module)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::AsyncFunction => "async function",
            Self::Method => "method",
            Self::AsyncMethod => "async method",
            Self::Class => "class",
            Self::Module => "module",
        }
    }
}

/// One member of an analyzed module's public surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    #[serde(rename = "type")]
    pub kind: MemberKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    /// Present for classes and modules only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<BTreeMap<String, MemberRecord>>,
}

impl MemberRecord {
    pub fn new(kind: MemberKind) -> Self {
        Self {
            kind,
            signature: None,
            docstring: None,
            members: None,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }

    pub fn with_member(mut self, name: impl Into<String>, member: MemberRecord) -> Self {
        self.members
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), member);
        self
    }
}

/// Qualified member name to member record.
pub type ApiStructure = BTreeMap<String, MemberRecord>;

/// A comparable member flattened out of an [`ApiStructure`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiElement<'a> {
    pub qualified_name: String,
    pub leaf_name: &'a str,
    pub kind: MemberKind,
    pub signature: Option<&'a str>,
    pub docstring: Option<&'a str>,
}

impl ApiElement<'_> {
    /// `name signature docstring`, with absent parts left empty.
    pub fn comparison_text(&self) -> String {
        format!(
            "{} {} {}",
            self.leaf_name,
            self.signature.unwrap_or(""),
            self.docstring.unwrap_or("")
        )
    }
}

/// Interpret a document as an API structure, if every entry is a member record.
pub fn as_api_structure(value: &Value) -> Option<ApiStructure> {
    match value {
        Value::Object(map) if !map.is_empty() => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}

/// Flatten the comparable members of a structure in sorted pre-order.
///
/// Uses an explicit worklist; nesting is bounded by the containment hierarchy.
pub fn comparable_elements(structure: &ApiStructure) -> Vec<ApiElement<'_>> {
    let mut elements = Vec::new();
    let mut stack: Vec<(String, &str, &MemberRecord)> = structure
        .iter()
        .rev()
        .map(|(name, record)| {
            let leaf = name.rsplit('.').next().unwrap_or(name.as_str());
            (name.clone(), leaf, record)
        })
        .collect();

    while let Some((qualified_name, leaf_name, record)) = stack.pop() {
        if let Some(members) = &record.members {
            for (name, member) in members.iter().rev() {
                stack.push((format!("{}.{}", qualified_name, name), name.as_str(), member));
            }
        }
        if record.kind.is_comparable() {
            elements.push(ApiElement {
                qualified_name,
                leaf_name,
                kind: record.kind,
                signature: record.signature.as_deref(),
                docstring: record.docstring.as_deref(),
            });
        }
    }

    elements
}

/// Join every scalar leaf of a document into one whitespace-separated text.
///
/// Mapping keys are not included. `null` leaves are absent values and add nothing.
pub fn structure_to_text(value: &Value) -> String {
    let mut parts = Vec::new();
    collect_text(value, &mut parts);
    parts.join(" ")
}

fn collect_text(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::Object(map) => map.values().for_each(|v| collect_text(v, parts)),
        Value::Array(items) => items.iter().for_each(|v| collect_text(v, parts)),
        Value::String(s) => parts.push(s.clone()),
        Value::Number(n) => parts.push(n.to_string()),
        Value::Bool(b) => parts.push(b.to_string()),
        Value::Null => {}
    }
}

/// Every numeric leaf of a document, in traversal order. Booleans are not numeric.
pub fn numeric_leaves(value: &Value) -> Vec<f64> {
    let mut out = Vec::new();
    collect_numbers(value, &mut out);
    out
}

fn collect_numbers(value: &Value, out: &mut Vec<f64>) {
    match value {
        Value::Object(map) => map.values().for_each(|v| collect_numbers(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_numbers(v, out)),
        Value::Number(n) => out.extend(n.as_f64()),
        _ => {}
    }
}

/// Rebuild a document with every numeric leaf replaced by `f(leaf)`.
pub fn map_numeric_leaves<F>(value: &Value, f: &F) -> Value
where
    F: Fn(f64) -> f64,
{
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), map_numeric_leaves(v, f)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| map_numeric_leaves(v, f)).collect()),
        Value::Number(n) => n.as_f64().map(|x| Value::from(f(x))).unwrap_or(Value::Null),
        other => other.clone(),
    }
}

/// A flat sequence of numbers, if the value is one.
pub fn as_numeric_vector(value: &Value) -> Option<Vec<f64>> {
    match value {
        Value::Array(items) if !items.is_empty() => items.iter().map(Value::as_f64).collect(),
        _ => None,
    }
}

/// Split a step output into the collection the next step consumes.
///
/// Sequences become their elements; any other document becomes a one-element
/// collection.
pub fn into_dataset(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}
