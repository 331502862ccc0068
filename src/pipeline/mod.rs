//! Sequential algorithm pipelines described by a small text language.
//!
//! A pipeline is written as comma-separated `stage:algorithm` steps, for
//! example `normalize:minmaxscaler,extract:tfidf`. The stage label documents
//! intent only; the algorithm name is resolved case-insensitively against the
//! registry. Steps run strictly in order and each step's output becomes the
//! next step's input.
//!
//! ```rust
//! use apidrift::algorithms::AlgorithmRegistry;
//! use apidrift::config::ParamSet;
//! use apidrift::pipeline::{self, Pipeline};
//! use serde_json::json;
//!
//! let registry = AlgorithmRegistry::builtin();
//! let pipeline = Pipeline::parse("normalize:MinMaxScaler", &registry).unwrap();
//! let output = pipeline::run(
//!     &pipeline,
//!     &[json!({"a": 1, "b": 3}), json!({"a": 10, "b": 20})],
//!     &ParamSet::new(),
//! )
//! .unwrap();
//! assert_eq!(output, json!([{"a": 0.0, "b": 1.0}, {"a": 0.0, "b": 1.0}]));
//! ```

pub mod executor;
pub mod parser;

pub use executor::{run, run_with_timing, StageTiming};
pub use parser::{parse_step, Pipeline, PipelineStep};
