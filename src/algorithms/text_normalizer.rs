//! Lexical normalization as a pipeline step.

use super::options::{OptionKind, OptionReader, OptionSpec};
use super::registry::AlgorithmDescriptor;
use super::{Algorithm, AlgorithmCategory};
use crate::config::AlgorithmParams;
use crate::errors::{Error, Result};
use crate::normalize::{normalize_content_with, KeyCollisionPolicy};
use serde_json::Value;

const NAME: &str = "textnormalizer";

pub const OPTIONS: &[OptionSpec] = &[OptionSpec::new(
    "collisions",
    OptionKind::Text,
    "last_write_wins",
    "Keys that normalize to the same name: 'last_write_wins' or 'reject'",
)];

/// Applies [`crate::normalize::normalize_content`] to every structure.
///
/// Stateless: `fit` learns nothing and `transform` may run without it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    policy: KeyCollisionPolicy,
}

impl TextNormalizer {
    pub fn new(policy: KeyCollisionPolicy) -> Self {
        Self { policy }
    }

    pub fn configure(params: &AlgorithmParams) -> Result<Self> {
        let reader = OptionReader::new(NAME, OPTIONS, params)?;
        let raw = reader.text("collisions", "last_write_wins")?;
        let policy = KeyCollisionPolicy::parse(&raw).ok_or_else(|| {
            Error::configuration(format!(
                "{}: collisions must be 'last_write_wins' or 'reject', got '{}'",
                NAME, raw
            ))
        })?;
        Ok(Self::new(policy))
    }

    pub fn policy(&self) -> KeyCollisionPolicy {
        self.policy
    }
}

impl Algorithm for TextNormalizer {
    fn name(&self) -> &'static str {
        NAME
    }

    fn fit(&mut self, _data: &[Value]) -> Result<()> {
        Ok(())
    }

    fn transform(&self, data: &[Value]) -> Result<Value> {
        data.iter()
            .map(|structure| normalize_content_with(structure, self.policy))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

pub fn descriptor() -> AlgorithmDescriptor {
    AlgorithmDescriptor::new(
        "TextNormalizer",
        AlgorithmCategory::Transformation,
        OPTIONS,
        |params| Ok(Box::new(TextNormalizer::configure(params)?) as Box<dyn Algorithm>),
    )
    .with_summary("Canonicalize names and text (case, underscores, whitespace)")
}
