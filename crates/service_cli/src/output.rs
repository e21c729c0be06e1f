//! Study output: long-format CSV tables and the run summary.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use asian_core::types::SchemeErrorKind;
use asian_schemes::driver::{RunArtifacts, RunOutcome, StudyReport};
use asian_schemes::params::EquationVariant;
use asian_schemes::solution::SolutionMatrix;
use asian_schemes::transform::{average_ratio, calendar_time, monetary_value};
use serde::Serialize;

use crate::Result;

/// Scalars needed to map transformed values back to financial ones.
#[derive(Debug, Clone, Copy)]
pub struct Financials {
    /// Equation formulation
    pub variant: EquationVariant,
    /// Volatility σ
    pub volatility: f64,
    /// Strike K
    pub strike: f64,
    /// Maturity T
    pub maturity: f64,
}

/// One row of a solution table.
#[derive(Debug, Serialize)]
struct SolutionRow {
    x: f64,
    tau: f64,
    t: f64,
    ratio: f64,
    value: f64,
    price: f64,
}

/// Writes `matrix` in long format (`x,tau,t,ratio,value,price`), time-major.
pub fn write_solution_csv(
    path: &Path,
    x: &[f64],
    tau: &[f64],
    matrix: &SolutionMatrix,
    fin: &Financials,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for (n, &tau_n) in tau.iter().enumerate() {
        let t = calendar_time(fin.maturity, tau_n, fin.volatility);
        for (&x_i, &value) in x.iter().zip(matrix.level(n)) {
            writer.serialize(SolutionRow {
                x: x_i,
                tau: tau_n,
                t,
                ratio: average_ratio(fin.variant, fin.maturity, x_i),
                value,
                price: monetary_value(fin.strike, value),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Writes the raw table and, when present, the presentation table of a run.
///
/// Returns the paths written.
pub fn write_run_tables(
    dir: &Path,
    label: &str,
    artifacts: &RunArtifacts,
    fin: &Financials,
    write_bounded: bool,
) -> Result<Vec<PathBuf>> {
    let grid = &artifacts.solution.grid;
    let raw = dir.join(format!("{label}.csv"));
    write_solution_csv(&raw, grid.x(), grid.tau(), &artifacts.solution.matrix, fin)?;
    let mut written = vec![raw];

    if write_bounded {
        let presented = match (&artifacts.window, &artifacts.bounded) {
            (Some(w), _) => Some((w.x.as_slice(), &w.matrix)),
            (None, Some(b)) => Some((grid.x(), &b.matrix)),
            (None, None) => None,
        };
        if let Some((x, matrix)) = presented {
            let path = dir.join(format!("{label}_bounded.csv"));
            write_solution_csv(&path, x, grid.tau(), matrix, fin)?;
            written.push(path);
        }
    }

    Ok(written)
}

/// Summary line for one run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary {
    /// Run label, e.g. `H_explicit_call`
    pub run: String,
    /// `ok` or `failed`
    pub status: &'static str,
    /// Wall-clock time in milliseconds
    pub elapsed_ms: f64,
    /// Spatial node count
    pub nodes: Option<usize>,
    /// Time step count actually used
    pub steps: Option<usize>,
    /// Whether the step count was refined for stability
    pub refined: bool,
    /// Smallest value on the final level
    pub min_final: Option<f64>,
    /// Largest value on the final level
    pub max_final: Option<f64>,
    /// Entries moved by clamping
    pub clipped: Option<usize>,
    /// Error category of a failed run
    pub error_kind: Option<SchemeErrorKind>,
    /// Error message of a failed run
    pub error: Option<String>,
}

impl RunSummary {
    /// Summarises one outcome.
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        let elapsed_ms = outcome.elapsed.as_secs_f64() * 1e3;
        let run = outcome.spec.label();
        match &outcome.result {
            Ok(a) => {
                let last = a.solution.matrix.last_level();
                Self {
                    run,
                    status: "ok",
                    elapsed_ms,
                    nodes: Some(a.solution.grid.node_count()),
                    steps: Some(a.solution.grid.step_count()),
                    refined: a.refined_steps.is_some(),
                    min_final: last.iter().copied().reduce(f64::min),
                    max_final: last.iter().copied().reduce(f64::max),
                    clipped: a.bounded.as_ref().map(|b| b.clipped),
                    error_kind: None,
                    error: None,
                }
            }
            Err(e) => Self {
                run,
                status: "failed",
                elapsed_ms,
                nodes: None,
                steps: None,
                refined: false,
                min_final: None,
                max_final: None,
                clipped: None,
                error_kind: Some(e.kind()),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Summaries of every run in `report`.
pub fn summarise(report: &StudyReport) -> Vec<RunSummary> {
    report.outcomes.iter().map(RunSummary::from_outcome).collect()
}

/// Writes the summaries as pretty-printed JSON.
pub fn write_summary_json<W: Write>(writer: W, summaries: &[RunSummary]) -> Result<()> {
    serde_json::to_writer_pretty(writer, summaries)?;
    Ok(())
}

/// Writes the summaries as `summary.json` under `dir`.
pub fn write_summary_file(dir: &Path, summaries: &[RunSummary]) -> Result<PathBuf> {
    let path = dir.join("summary.json");
    write_summary_json(File::create(&path)?, summaries)?;
    Ok(path)
}

/// Renders the summaries as a fixed-width text table.
pub fn render_table(summaries: &[RunSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<26} {:<7} {:>10} {:>7} {:>8} {:>12} {:>12}  {}\n",
        "run", "status", "time [ms]", "nodes", "steps", "min(final)", "max(final)", "note"
    ));
    out.push_str(&"-".repeat(98));
    out.push('\n');

    for s in summaries {
        let note = match (&s.error_kind, s.refined) {
            (Some(kind), _) => kind.as_str().to_string(),
            (None, true) => "refined".to_string(),
            (None, false) => String::new(),
        };
        out.push_str(&format!(
            "{:<26} {:<7} {:>10.2} {:>7} {:>8} {:>12} {:>12}  {}\n",
            s.run,
            s.status,
            s.elapsed_ms,
            opt(s.nodes),
            opt(s.steps),
            s.min_final.map_or_else(|| "-".to_string(), |v| format!("{v:.6}")),
            s.max_final.map_or_else(|| "-".to_string(), |v| format!("{v:.6}")),
            note
        ));
    }
    out
}

fn opt(value: Option<usize>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
