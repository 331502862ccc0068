use super::{load_structures, merged_params, resolve_config};
use crate::algorithms::AlgorithmRegistry;
use crate::comparison::compare_structures;
use crate::io;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub struct CompareConfig {
    pub structures: Vec<PathBuf>,
    pub algorithms: Option<Vec<String>>,
    pub output: PathBuf,
    pub params: Vec<String>,
    pub jobs: Option<usize>,
    pub config: Option<PathBuf>,
}

pub fn compare(config: CompareConfig) -> Result<()> {
    let file_config = resolve_config(config.config.as_deref())?;
    let params = merged_params(&file_config, &config.params)?;
    let algorithms = config
        .algorithms
        .or_else(|| file_config.default_algorithms().map(<[String]>::to_vec));
    let jobs = config.jobs.or(file_config.jobs());

    let structures = load_structures(&config.structures)?;
    let registry = AlgorithmRegistry::builtin();
    let results = compare_structures(
        &structures,
        algorithms.as_deref(),
        &params,
        &registry,
        jobs,
    )?;

    let document = serde_json::to_value(&results)?;
    io::save(&config.output, &document)
        .with_context(|| format!("Failed to write results to {}", config.output.display()))?;

    for (name, outcome) in &results {
        match outcome.error() {
            None => eprintln!("  {} {}", "ok".green(), name),
            Some(error) => eprintln!("  {} {}: {}", "failed".red(), name, error),
        }
    }
    println!("Comparison results saved to {}", config.output.display());
    Ok(())
}
