//! Loading and saving documents in the supported interchange formats.
//!
//! The format is chosen from the file extension: `json`, `yaml`/`yml` or
//! `toml`, case-insensitively.

use crate::errors::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        })
    }
}

/// Parse `contents` as a document in `format`.
pub fn parse(contents: &str, format: Format) -> std::result::Result<Value, String> {
    match format {
        Format::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
    }
}

/// Render a document. JSON is indented with four spaces.
///
/// TOML needs a table at the top level and cannot represent `null`.
pub fn render(document: &Value, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            let mut buffer = Vec::new();
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
            document.serialize(&mut serializer)?;
            buffer.push(b'\n');
            Ok(String::from_utf8_lossy(&buffer).into_owned())
        }
        Format::Yaml => Ok(serde_yaml::to_string(document)?),
        Format::Toml => Ok(toml::to_string_pretty(document)?),
    }
}

pub fn load(path: &Path) -> Result<Value> {
    let format = Format::from_path(path)?;
    let contents = fs::read_to_string(path)?;
    let document = parse(&contents, format).map_err(|message| Error::parse(path, message))?;
    tracing::debug!("Loaded {} document from {}", format, path.display());
    Ok(document)
}

pub fn save(path: &Path, document: &Value) -> Result<()> {
    let format = Format::from_path(path)?;
    let rendered = render(document, format)?;
    fs::write(path, rendered)?;
    tracing::debug!("Saved {} document to {}", format, path.display());
    Ok(())
}
