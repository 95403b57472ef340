#![deny(missing_docs)]

//! # Modeler CLI
//!
//! Command Line Interface for the OpenAPI code modeler.
//!
//! Supported Commands:
//! - `model`: OpenAPI document -> code model (YAML or JSON).
//!
//! Diagnostics are logged to stderr; set `RUST_LOG` to adjust verbosity.

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::CliResult;

mod error;
mod model;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI Code Modeler CLI")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Builds the code model of an OpenAPI document.
    Model(model::ModelArgs),
}

fn main() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Model(args) => {
            model::execute(args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_model_args() {
        let cli = Cli::try_parse_from([
            "modeler",
            "model",
            "openapi.yaml",
            "--format",
            "json",
            "--separator",
            ".",
            "--skip-components",
        ])
        .unwrap();
        let Commands::Model(args) = cli.command;
        assert_eq!(args.format, model::OutputFormat::Json);
        assert_eq!(args.separator, '.');
        assert!(args.skip_components);
        assert!(!args.deny_errors);
    }
}
