//! asian-pde - command-line driver for the Asian-option PDE scheme engine
//!
//! # Commands
//!
//! - `asian-pde solve` - Run every configured (equation, scheme, option)
//!   combination and write the solution tables
//! - `asian-pde check` - Validate the configuration and list the planned runs
//!
//! # Architecture
//!
//! This crate is the service layer: it owns configuration loading, logging
//! set-up and file output, and delegates all numerics to `asian_schemes`.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::solve::OutputFormat;

/// Asian-option PDE solver CLI
#[derive(Parser)]
#[command(name = "asian-pde")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "asian_pde.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve all configured runs and write CSV tables
    Solve {
        /// Output directory (overrides the configuration)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Summary format printed to stdout
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Validate the configuration and print the run plan
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Solve { output_dir, format } => {
            commands::solve::run(&cli.config, output_dir, format)
                .with_context(|| format!("solve failed for {}", cli.config.display()))
        }
        Commands::Check => commands::check::run(&cli.config)
            .with_context(|| format!("check failed for {}", cli.config.display())),
    }
}

/// `RUST_LOG` wins, then `--verbose`, then the configured `log_level`.
fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config::CliConfig::load(&cli.config)
            .map(|c| c.with_env_override().log_level)
            .unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}
