use super::{load_structures, merged_params, resolve_config};
use crate::algorithms::AlgorithmRegistry;
use crate::io;
use crate::pipeline::{run_with_timing, Pipeline};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct PipelineConfig {
    pub pipeline: String,
    pub structures: Vec<PathBuf>,
    pub output: PathBuf,
    pub params: Vec<String>,
    pub config: Option<PathBuf>,
}

pub fn run_pipeline(config: PipelineConfig) -> Result<()> {
    let file_config = resolve_config(config.config.as_deref())?;
    let params = merged_params(&file_config, &config.params)?;

    let registry = AlgorithmRegistry::builtin();
    let pipeline = Pipeline::parse(&config.pipeline, &registry)?;
    let structures = load_structures(&config.structures)?;

    let (output, timings) = run_with_timing(&pipeline, &structures, &params)?;
    for timing in &timings {
        tracing::info!("{}", timing.format());
    }

    io::save(&config.output, &output)
        .with_context(|| format!("Failed to write results to {}", config.output.display()))?;
    println!("Pipeline results saved to {}", config.output.display());
    Ok(())
}
