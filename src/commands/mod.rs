pub mod algorithms;
pub mod compare;
pub mod init;
pub mod normalize;
pub mod pipeline;

use crate::config::{load_config, load_config_from, ApidriftConfig, ParamSet};
use crate::io;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// The explicit config file, or the nearest discovered one.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ApidriftConfig> {
    match explicit {
        Some(path) => Ok(load_config_from(path)?),
        None => Ok(load_config()),
    }
}

/// Config-file parameters overridden by command-line assignments.
pub fn merged_params(config: &ApidriftConfig, assignments: &[String]) -> Result<ParamSet> {
    let mut params = config.params.clone();
    let mut overrides = ParamSet::new();
    for assignment in assignments {
        overrides.apply_assignment(assignment)?;
    }
    params.merge(&overrides);
    Ok(params)
}

pub fn load_structures(paths: &[PathBuf]) -> Result<Vec<Value>> {
    paths
        .iter()
        .map(|path| {
            io::load(path).with_context(|| format!("Failed to load structure {}", path.display()))
        })
        .collect()
}
