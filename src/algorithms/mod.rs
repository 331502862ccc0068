//! Interchangeable comparison and transform algorithms.
//!
//! Every algorithm implements [`Algorithm`]: it is configured from a mapping of
//! named options, learns what it needs in [`Algorithm::fit`] and produces a new
//! document in [`Algorithm::transform`]. Algorithms are registered by name in an
//! [`AlgorithmRegistry`] and instantiated fresh for every run, so no fit state is
//! shared between concurrent invocations.
//!
//! # Example
//!
//! ```rust
//! use apidrift::algorithms::AlgorithmRegistry;
//! use apidrift::config::AlgorithmParams;
//! use serde_json::json;
//!
//! let registry = AlgorithmRegistry::builtin();
//! let scaler = registry.resolve("MinMaxScaler").unwrap();
//! let mut algorithm = scaler.instantiate(&AlgorithmParams::new()).unwrap();
//!
//! let scaled = algorithm
//!     .fit_transform(&[json!({"a": 10, "b": {"c": 20}})])
//!     .unwrap();
//! assert_eq!(scaled, json!([{"a": 0.0, "b": {"c": 1.0}}]));
//! ```

pub mod dbscan;
pub mod minmax;
pub mod options;
pub mod registry;
mod stop_words;
pub mod text_normalizer;
pub mod tfidf;

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use dbscan::{Dbscan, DbscanParams, NOISE};
pub use minmax::{MinMaxParams, MinMaxScaler};
pub use options::{OptionKind, OptionReader, OptionSpec};
pub use registry::{AlgorithmDescriptor, AlgorithmFactory, AlgorithmRegistry, SkippedAlgorithm};
pub use text_normalizer::TextNormalizer;
pub use tfidf::{StopWords, Tfidf, TfidfParams};

/// Closed set of algorithm categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmCategory {
    Clustering,
    DimensionReduction,
    FeatureExtraction,
    Transformation,
    Normalization,
}

impl AlgorithmCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clustering => "clustering",
            Self::DimensionReduction => "dimension_reduction",
            Self::FeatureExtraction => "feature_extraction",
            Self::Transformation => "transformation",
            Self::Normalization => "normalization",
        }
    }
}

impl fmt::Display for AlgorithmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The contract every comparison or transform algorithm implements.
///
/// `fit` only reads its input. `transform` on a stateful algorithm that has not
/// been fitted must fail with [`crate::errors::Error::NotFitted`].
pub trait Algorithm: Send {
    /// Case-folded registry name, used in error messages.
    fn name(&self) -> &'static str;

    /// Learn whatever parameters the transform needs from `data`.
    fn fit(&mut self, data: &[Value]) -> Result<()>;

    /// Produce a new document from `data` using the learned parameters.
    fn transform(&self, data: &[Value]) -> Result<Value>;

    /// `fit` then `transform` on the same data.
    fn fit_transform(&mut self, data: &[Value]) -> Result<Value> {
        self.fit(data)?;
        self.transform(data)
    }
}

/// The algorithms shipped with the crate, in registration order.
pub fn builtin_descriptors() -> Vec<AlgorithmDescriptor> {
    vec![
        dbscan::descriptor(),
        minmax::descriptor(),
        tfidf::descriptor(),
        text_normalizer::descriptor(),
    ]
}
