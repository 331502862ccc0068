use serde::{Deserialize, Serialize};

use super::params::ParamSet;

/// Root configuration structure for apidrift
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ApidriftConfig {
    /// Independent multi-algorithm comparison settings
    #[serde(default)]
    pub compare: Option<CompareConfig>,

    /// Algorithm options, one table per algorithm
    #[serde(default)]
    pub params: ParamSet,
}

/// `[compare]` section
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CompareConfig {
    /// Algorithms to run when none are named on the command line
    #[serde(default)]
    pub algorithms: Option<Vec<String>>,

    /// Upper bound on concurrently running algorithms
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl ApidriftConfig {
    pub fn default_algorithms(&self) -> Option<&[String]> {
        self.compare.as_ref()?.algorithms.as_deref()
    }

    pub fn jobs(&self) -> Option<usize> {
        self.compare.as_ref()?.jobs
    }
}
