use anyhow::Result;
use apidrift::cli::{Cli, Commands};
use apidrift::commands::{self, compare::CompareConfig, normalize::NormalizeConfig};
use apidrift::commands::pipeline::PipelineConfig;
use apidrift::observability::init_logging;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Compare {
            structures,
            algorithms,
            output,
            params,
            jobs,
        } => commands::compare::compare(CompareConfig {
            structures,
            algorithms,
            output,
            params,
            jobs,
            config: cli.config,
        }),
        Commands::Pipeline {
            pipeline,
            structures,
            output,
            params,
        } => commands::pipeline::run_pipeline(PipelineConfig {
            pipeline,
            structures,
            output,
            params,
            config: cli.config,
        }),
        Commands::Normalize {
            input,
            output,
            preview,
            reject_collisions,
        } => commands::normalize::normalize(NormalizeConfig {
            input,
            output,
            preview,
            reject_collisions,
        }),
        Commands::Algorithms => {
            commands::algorithms::list_algorithms();
            Ok(())
        }
        Commands::Init { force } => commands::init::init_config(&std::env::current_dir()?, force),
    }
}
