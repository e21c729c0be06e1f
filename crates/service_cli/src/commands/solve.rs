//! Solve command implementation
//!
//! Runs every configured (equation, scheme, option) combination, writes one
//! CSV table per successful run plus `summary.json`, and prints a summary.

use std::path::{Path, PathBuf};

use asian_schemes::driver::{run_study, StudyReport};
use clap::ValueEnum;
use tracing::{info, warn};

use crate::config::CliConfig;
use crate::output::{self, Financials};
use crate::{CliError, Result};

/// Summary format printed to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Run the solve command
pub fn run(config_path: &Path, output_dir: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let mut config = super::load_config(config_path)?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    execute(&config, format)
}

/// Solve the study described by an already validated configuration.
pub(crate) fn execute(config: &CliConfig, format: OutputFormat) -> Result<()> {
    let report = run_study(&config.study)?;
    std::fs::create_dir_all(&config.output_dir)?;
    write_tables(config, &report)?;

    let summaries = output::summarise(&report);
    let summary_path = output::write_summary_file(&config.output_dir, &summaries)?;
    info!("Summary written to {}", summary_path.display());

    match format {
        OutputFormat::Table => print!("{}", output::render_table(&summaries)),
        OutputFormat::Json => {
            output::write_summary_json(std::io::stdout().lock(), &summaries)?;
            println!();
        }
    }

    let failed = report.failed();
    if failed > 0 {
        return Err(CliError::RunsFailed {
            failed,
            total: report.outcomes.len(),
        });
    }
    Ok(())
}

fn write_tables(config: &CliConfig, report: &StudyReport) -> Result<()> {
    for outcome in &report.outcomes {
        let Ok(artifacts) = &outcome.result else {
            continue;
        };
        let Some(eq) = config.study.equation(outcome.spec.variant) else {
            warn!(run = %outcome.spec, "Equation missing from configuration, skipping output");
            continue;
        };
        let fin = Financials {
            variant: outcome.spec.variant,
            volatility: eq.volatility,
            strike: eq.strike,
            maturity: eq.maturity,
        };
        let paths = output::write_run_tables(
            &config.output_dir,
            &outcome.spec.label(),
            artifacts,
            &fin,
            config.write_bounded,
        )?;
        for path in paths {
            info!(run = %outcome.spec, "Wrote {}", path.display());
        }
    }
    Ok(())
}
