// Export modules for library usage
pub mod algorithms;
pub mod cli;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod document;
pub mod errors;
pub mod io;
pub mod normalize;
pub mod observability;
pub mod pipeline;

// Re-export commonly used types
pub use crate::algorithms::{
    Algorithm, AlgorithmCategory, AlgorithmDescriptor, AlgorithmRegistry, NOISE,
};

pub use crate::comparison::{compare_structures, AlgorithmOutcome, ComparisonResults};

pub use crate::config::{AlgorithmParams, ApidriftConfig, ParamSet};

pub use crate::document::{ApiStructure, MemberKind, MemberRecord};

pub use crate::errors::{Error, Result};

pub use crate::normalize::{
    normalize_content, normalize_docstring, normalize_value, KeyCollisionPolicy,
};

pub use crate::pipeline::{Pipeline, PipelineStep, StageTiming};
