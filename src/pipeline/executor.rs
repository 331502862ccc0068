//! Strictly sequential pipeline execution.

use super::parser::Pipeline;
use crate::algorithms::Algorithm;
use crate::config::ParamSet;
use crate::document::{ensure_comparable, into_dataset};
use crate::errors::{Error, Result};
use crate::observability::guard_panics;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Timing information for one executed step.
#[derive(Debug, Clone)]
pub struct StageTiming {
    /// Stage label from the pipeline text
    pub stage: String,

    pub algorithm: String,

    /// Time taken to execute the step
    pub duration: Duration,
}

impl StageTiming {
    /// Format the timing as a human-readable string.
    pub fn format(&self) -> String {
        format!(
            "{}:{}: {:.3}s",
            self.stage,
            self.algorithm,
            self.duration.as_secs_f64()
        )
    }
}

/// Run the pipeline over `structures` and return the last step's output.
pub fn run(pipeline: &Pipeline, structures: &[Value], params: &ParamSet) -> Result<Value> {
    run_with_timing(pipeline, structures, params).map(|(output, _)| output)
}

/// Run the pipeline and collect timing information for each step.
///
/// Every step is configured before any data is processed, so a bad parameter
/// in the last step fails the run before the first step starts. A failing step
/// aborts the run with [`Error::StepFailed`] naming the algorithm; later steps
/// never execute.
pub fn run_with_timing(
    pipeline: &Pipeline,
    structures: &[Value],
    params: &ParamSet,
) -> Result<(Value, Vec<StageTiming>)> {
    ensure_comparable(structures)?;
    if pipeline.is_empty() {
        return Err(Error::usage("pipeline has no steps"));
    }

    let mut algorithms: Vec<Box<dyn Algorithm>> = pipeline
        .steps()
        .iter()
        .map(|step| step.descriptor.instantiate(&params.for_algorithm(step.algorithm())))
        .collect::<Result<_>>()?;

    let total = pipeline.len();
    let mut data = structures.to_vec();
    let mut timings = Vec::with_capacity(total);
    let mut output = Value::Null;

    for (i, (step, algorithm)) in pipeline.steps().iter().zip(algorithms.iter_mut()).enumerate() {
        tracing::info!(
            "Stage {}/{}: {} ({})",
            i + 1,
            total,
            step.stage,
            step.algorithm()
        );
        let start = Instant::now();

        let result = guard_panics(step.algorithm(), || algorithm.fit_transform(&data))
            .map_err(|e| Error::step_failed(step.algorithm(), e))?;

        timings.push(StageTiming {
            stage: step.stage.clone(),
            algorithm: step.algorithm().to_string(),
            duration: start.elapsed(),
        });

        if i + 1 == total {
            output = result;
        } else {
            data = into_dataset(result);
        }
    }

    Ok((output, timings))
}
