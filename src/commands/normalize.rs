use crate::io::{self, Format};
use crate::normalize::{normalize_content_with, KeyCollisionPolicy};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct NormalizeConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub preview: bool,
    pub reject_collisions: bool,
}

pub fn normalize(config: NormalizeConfig) -> Result<()> {
    let document = io::load(&config.input)
        .with_context(|| format!("Failed to load {}", config.input.display()))?;
    let policy = if config.reject_collisions {
        KeyCollisionPolicy::Reject
    } else {
        KeyCollisionPolicy::LastWriteWins
    };
    let normalized = normalize_content_with(&document, policy)?;

    let output = config.output.unwrap_or(config.input);
    if config.preview {
        print!("{}", io::render(&normalized, Format::from_path(&output)?)?);
        return Ok(());
    }

    io::save(&output, &normalized)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Normalized document saved to {}", output.display());
    Ok(())
}
