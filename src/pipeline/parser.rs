use crate::algorithms::{AlgorithmDescriptor, AlgorithmRegistry};
use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static STEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+):(\w+)$").expect("valid regex"));

/// A resolved `stage:algorithm` step.
#[derive(Debug, Clone)]
pub struct PipelineStep {
    /// Descriptive label from the pipeline text
    pub stage: String,
    pub descriptor: AlgorithmDescriptor,
}

impl PipelineStep {
    /// Case-folded algorithm name.
    pub fn algorithm(&self) -> &str {
        self.descriptor.name()
    }
}

/// Split one step into its stage label and algorithm name as written.
///
/// Lookup is case-insensitive, so the name is not folded here; error messages
/// then quote what the user typed.
pub fn parse_step(step: &str) -> Result<(String, String)> {
    let trimmed = step.trim();
    let captures = STEP
        .captures(trimmed)
        .ok_or_else(|| Error::PipelineFormat(trimmed.to_string()))?;
    Ok((captures[1].to_string(), captures[2].to_string()))
}

/// Ordered steps; order is execution order.
#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
}

impl Pipeline {
    /// Parse and resolve every step, failing on the first bad one.
    pub fn parse(spec: &str, registry: &AlgorithmRegistry) -> Result<Self> {
        let steps = spec
            .split(',')
            .map(|step| {
                let (stage, algorithm) = parse_step(step)?;
                let descriptor = registry.resolve(&algorithm)?.clone();
                Ok(PipelineStep { stage, descriptor })
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("Parsed pipeline with {} steps", steps.len());
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn algorithm_names(&self) -> Vec<&str> {
        self.steps.iter().map(PipelineStep::algorithm).collect()
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .steps
            .iter()
            .map(|s| format!("{}:{}", s.stage, s.algorithm()))
            .collect();
        f.write_str(&rendered.join(","))
    }
}
