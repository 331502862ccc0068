use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "apidrift")]
#[command(about = "Compare API structures to detect drift between versions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Configuration file (defaults to the nearest .apidrift.toml)
    #[arg(long, global = true, env = "APIDRIFT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run algorithms independently over the same structures
    Compare {
        /// Structure documents to compare (json, yaml or toml)
        #[arg(short, long, num_args = 1.., required = true)]
        structures: Vec<PathBuf>,

        /// Algorithms to run (defaults to the config file, then all)
        #[arg(short, long, num_args = 1.., value_delimiter = ',')]
        algorithms: Option<Vec<String>>,

        /// Output file; the format follows the extension
        #[arg(short, long)]
        output: PathBuf,

        /// Algorithm parameter as algorithm.key=value (repeatable)
        #[arg(short, long = "param", value_name = "ALGO.KEY=VALUE")]
        params: Vec<String>,

        /// Number of worker threads (defaults to one per CPU)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// Run a sequential pipeline of algorithms
    Pipeline {
        /// Steps as stage:algorithm, comma separated
        #[arg(long)]
        pipeline: String,

        /// Structure documents to feed the first step
        #[arg(short, long, num_args = 1.., required = true)]
        structures: Vec<PathBuf>,

        /// Output file; the format follows the extension
        #[arg(short, long)]
        output: PathBuf,

        /// Algorithm parameter as algorithm.key=value (repeatable)
        #[arg(short, long = "param", value_name = "ALGO.KEY=VALUE")]
        params: Vec<String>,
    },

    /// Canonicalize names and text in a structure document
    Normalize {
        /// Document to normalize
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the normalized document instead of writing it
        #[arg(long)]
        preview: bool,

        /// Fail when two keys normalize to the same name
        #[arg(long)]
        reject_collisions: bool,
    },

    /// List available algorithms and their options
    Algorithms,

    /// Write a starter .apidrift.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
