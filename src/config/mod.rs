//! Configuration: the `.apidrift.toml` file and namespaced algorithm parameters.

mod core;
mod loader;
mod params;

pub use self::core::{ApidriftConfig, CompareConfig};
pub use self::loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
pub use self::params::{AlgorithmParams, ParamSet};
