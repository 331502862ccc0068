use std::fs;
use std::path::{Path, PathBuf};

use super::core::ApidriftConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".apidrift.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<ApidriftConfig, String> {
    let mut config = toml::from_str::<ApidriftConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if let Some(compare) = &config.compare {
        if compare.jobs == Some(0) {
            return Err("compare.jobs must be at least 1".to_string());
        }
        if compare.algorithms.as_ref().is_some_and(|a| a.is_empty()) {
            return Err("compare.algorithms must not be empty when given".to_string());
        }
    }

    config.params = config.params.case_folded();
    Ok(config)
}

/// Pure function to try loading config from a specific path
fn try_load_config_from_path(config_path: &Path) -> Option<ApidriftConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search the current directory and its ancestors for a config file.
///
/// Missing, unreadable or invalid files fall back to defaults with a warning.
pub fn load_config() -> ApidriftConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return ApidriftConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            ApidriftConfig::default()
        })
}

/// Load an explicitly requested config file; any failure is an error.
pub fn load_config_from(path: &Path) -> Result<ApidriftConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!(
            "failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_and_validate_config(&contents).map_err(Error::configuration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_and_validate_config(indoc! {r#"
            [compare]
            algorithms = ["dbscan", "tfidf"]
            jobs = 2

            [params.DBSCAN]
            eps = 0.4
            min_samples = 3

            [params.minmaxscaler]
            feature_range = [-1.0, 1.0]
        "#})
        .unwrap();

        assert_eq!(
            config.default_algorithms(),
            Some(&["dbscan".to_string(), "tfidf".to_string()][..])
        );
        assert_eq!(config.jobs(), Some(2));
        assert_eq!(
            config.params.for_algorithm("dbscan").get("eps"),
            Some(&json!(0.4))
        );
        assert_eq!(
            config.params.for_algorithm("minmaxscaler").get("feature_range"),
            Some(&json!([-1.0, 1.0]))
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_and_validate_config("").unwrap(), ApidriftConfig::default());
    }

    #[test]
    fn test_invalid_config_values() {
        assert!(parse_and_validate_config("[compare]\njobs = 0\n").is_err());
        assert!(parse_and_validate_config("[compare]\nalgorithms = []\n").is_err());
        assert!(parse_and_validate_config("compare = 3").is_err());
    }

    #[test]
    fn test_load_config_from_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[params.tfidf]\nmax_features = 10\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(
            config.params.for_algorithm("tfidf").get("max_features"),
            Some(&json!(10))
        );

        let missing = load_config_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(missing.is_configuration());
    }

    #[test]
    fn test_directory_ancestors_depth_limit() {
        let ancestors: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(ancestors, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
    }
}
