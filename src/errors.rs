//! Shared error types for the comparison engine.
//!
//! Errors fall into four groups that callers treat differently:
//!
//! - **Configuration**: bad pipeline syntax, unknown algorithms, bad option
//!   values. Raised before any data is processed.
//! - **Data integrity**: empty inputs, label/element mismatches, degenerate
//!   inputs. Raised where detected and abort only the affected algorithm.
//! - **Execution**: failures inside an algorithm run. Recorded per algorithm in
//!   independent comparisons, wrapped and propagated in pipelines.
//! - **Persistence**: unsupported formats and parse failures when loading or
//!   saving documents.
//!
//! # Example
//!
//! ```rust
//! use apidrift::errors::Error;
//!
//! let err = Error::unknown_algorithm("NoSuchAlgo", ["dbscan", "tfidf"]);
//! assert!(err.is_configuration());
//! assert!(err.to_string().contains("NoSuchAlgo"));
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for apidrift operations
#[derive(Debug, Error)]
pub enum Error {
    /// A pipeline step that does not have the `stage:algorithm` shape
    #[error("Invalid step format: '{0}' (expected 'stage:algorithm')")]
    PipelineFormat(String),

    /// An algorithm name that is not present in the registry
    #[error("Algorithm '{name}' not found in available algorithms: {available}")]
    UnknownAlgorithm { name: String, available: String },

    /// Invalid option values, unknown option keys, unreadable config files
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller misuse, such as comparing fewer than two structures
    #[error("Usage error: {0}")]
    Usage(String),

    /// Input data that cannot be processed meaningfully
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// `transform` called on a stateful algorithm that was never fitted
    #[error("{algorithm} has not been fitted; call fit before transform")]
    NotFitted { algorithm: String },

    /// A failure raised while an algorithm was running
    #[error("Algorithm execution error: {0}")]
    Execution(String),

    /// A pipeline step failure, tagged with the algorithm that produced it
    #[error("Error running {algorithm}: {source}")]
    StepFailed {
        algorithm: String,
        #[source]
        source: Box<Error>,
    },

    /// A persisted document whose extension has no known format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// A persisted document that could not be parsed
    #[error("Error parsing {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// TOML serialization errors
    #[error(transparent)]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Create a data integrity error
    pub fn data_integrity(message: impl Into<String>) -> Self {
        Self::DataIntegrity(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a not-fitted error for the named algorithm
    pub fn not_fitted(algorithm: impl Into<String>) -> Self {
        Self::NotFitted {
            algorithm: algorithm.into(),
        }
    }

    /// Create an unknown-algorithm error listing every known name
    pub fn unknown_algorithm<I, S>(name: impl Into<String>, known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let available = known
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnknownAlgorithm {
            name: name.into(),
            available,
        }
    }

    /// Wrap an error raised inside a pipeline step
    pub fn step_failed(algorithm: impl Into<String>, source: Error) -> Self {
        Self::StepFailed {
            algorithm: algorithm.into(),
            source: Box::new(source),
        }
    }

    /// Create a parse error with path context
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::PipelineFormat(_) | Self::UnknownAlgorithm { .. } | Self::Configuration(_) => {
                "Config"
            }
            Self::Usage(_) => "Usage",
            Self::DataIntegrity(_) | Self::NotFitted { .. } => "Data",
            Self::Execution(_) | Self::StepFailed { .. } => "Execution",
            Self::UnsupportedFormat(_)
            | Self::Parse { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_)
            | Self::TomlSerialize(_) => "I/O",
        }
    }

    /// Whether this error is raised before any data processing begins.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::PipelineFormat(_)
                | Self::UnknownAlgorithm { .. }
                | Self::Configuration(_)
                | Self::Usage(_)
        )
    }

    /// The innermost cause, looking through pipeline step wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::StepFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
