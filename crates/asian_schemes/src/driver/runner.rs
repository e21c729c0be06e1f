//! Study execution.

use std::time::{Duration, Instant};

use asian_core::types::SchemeError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::{EquationConfig, StudyConfig};
use crate::bounder::{self, BoundedResult, SolutionBounder, SpatialWindow};
use crate::grid::{Grid, GridBuilder};
use crate::initial::InitialCondition;
use crate::params::{EquationVariant, OptionKind, ProblemParameters};
use crate::schemes::{CrankNicolsonScheme, ExplicitScheme, FiniteDifferenceScheme, SchemeKind};
use crate::solution::SolveResult;

/// One (variant, scheme, option) combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunSpec {
    /// Equation formulation
    pub variant: EquationVariant,
    /// Time-stepping scheme
    pub scheme: SchemeKind,
    /// Option kind
    pub option: OptionKind,
}

impl RunSpec {
    /// File-name friendly label, e.g. `H_explicit_call`.
    pub fn label(&self) -> String {
        format!("{}_{}_{}", self.variant, self.scheme, self.option)
    }
}

impl std::fmt::Display for RunSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.variant, self.scheme, self.option)
    }
}

/// Products of a successful run.
#[derive(Clone, Debug)]
pub struct RunArtifacts {
    /// Grid, unclipped matrix and run identity
    pub solution: SolveResult,
    /// Clamped copy, when clamp bounds are configured
    pub bounded: Option<BoundedResult>,
    /// Spatial window of the (clamped if available) matrix
    pub window: Option<SpatialWindow>,
    /// Step count used after refinement, when the configured one was unstable
    pub refined_steps: Option<usize>,
}

/// Outcome of one run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Which combination ran
    pub spec: RunSpec,
    /// Wall-clock time of the run
    pub elapsed: Duration,
    /// Artifacts or the run-local error
    pub result: Result<RunArtifacts, SchemeError>,
}

impl RunOutcome {
    /// Whether the run completed.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of every planned run, in plan order.
#[derive(Debug, Default)]
pub struct StudyReport {
    /// Per-run outcomes
    pub outcomes: Vec<RunOutcome>,
}

impl StudyReport {
    /// Number of completed runs.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    /// Number of failed runs.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Outcome for `spec`, if it was planned.
    pub fn outcome(&self, spec: &RunSpec) -> Option<&RunOutcome> {
        self.outcomes.iter().find(|o| &o.spec == spec)
    }
}

/// Expands the configured combinations in variant, scheme, option order.
pub fn plan(config: &StudyConfig) -> Vec<RunSpec> {
    let mut specs = Vec::new();
    for (variant, eq) in config.equations() {
        for &scheme in &eq.schemes {
            for &option in &eq.options {
                let spec = RunSpec {
                    variant,
                    scheme,
                    option,
                };
                if !specs.contains(&spec) {
                    specs.push(spec);
                }
            }
        }
    }
    specs
}

/// Runs every planned combination.
///
/// Run failures are recorded in the report and never abort the study.
///
/// # Errors
///
/// Returns `SchemeError::Configuration` if the study layout is invalid.
pub fn run_study(config: &StudyConfig) -> Result<StudyReport, SchemeError> {
    config.validate()?;
    let specs = plan(config);
    info!(
        runs = specs.len(),
        parallel = config.parallel,
        "Starting study"
    );

    let execute = |spec: &RunSpec| -> RunOutcome {
        let start = Instant::now();
        let result = match config.equation(spec.variant) {
            Some(eq) => run_single(*spec, eq, config.parallel_fill),
            None => Err(SchemeError::configuration(format!(
                "equation {} is not configured",
                spec.variant
            ))),
        };
        let elapsed = start.elapsed();
        match &result {
            Ok(artifacts) => info!(
                run = %spec,
                elapsed_ms = elapsed.as_secs_f64() * 1e3,
                steps = artifacts.solution.grid.step_count(),
                "Run complete"
            ),
            Err(e) => warn!(run = %spec, kind = %e.kind(), error = %e, "Run failed"),
        }
        RunOutcome {
            spec: *spec,
            elapsed,
            result,
        }
    };

    let outcomes: Vec<RunOutcome> = if config.parallel {
        specs.par_iter().map(execute).collect()
    } else {
        specs.iter().map(execute).collect()
    };

    let report = StudyReport { outcomes };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Study finished"
    );
    Ok(report)
}

/// Builds, solves and post-processes one combination.
///
/// # Errors
///
/// Any [`SchemeError`] raised while building the parameters or grid, solving,
/// or applying the configured bounds.
pub fn run_single(
    spec: RunSpec,
    eq: &EquationConfig,
    parallel_fill: bool,
) -> Result<RunArtifacts, SchemeError> {
    let params = eq.parameters(spec.variant, spec.option)?;
    let mut grid = build_grid(&params, eq.nodes, eq.steps)?;
    debug!(run = %spec, dx = grid.dx(), dt = grid.dt(), "Grid built");

    let mut refined_steps = None;
    let solution = match spec.scheme {
        SchemeKind::Explicit => {
            if eq.refine_unstable_steps {
                let bound = ExplicitScheme::max_stable_step(&params, &grid);
                if grid.dt() > bound {
                    let steps = (grid.horizon() / bound).ceil() as usize;
                    grid = build_grid(&params, eq.nodes, steps)?;
                    info!(
                        run = %spec,
                        configured = eq.steps,
                        refined = grid.step_count(),
                        max_stable = bound,
                        "Refined explicit time step to satisfy stability"
                    );
                    refined_steps = Some(grid.step_count());
                }
            }
            ExplicitScheme::new()
                .with_parallel_fill(parallel_fill)
                .solve_result(&params, &grid, &InitialCondition::Payoff)?
        }
        SchemeKind::CrankNicolson => {
            CrankNicolsonScheme::new().solve_result(&params, &grid, &InitialCondition::Payoff)?
        }
    };

    let (bounded, window) = match eq.bounds_for(spec.scheme, spec.option) {
        Some(bounds) => {
            let bounded = bounds
                .clamp
                .map(|[lo, hi]| SolutionBounder::new(lo, hi).map(|b| b.clamp(&solution.matrix)))
                .transpose()?;
            let source = bounded.as_ref().map_or(&solution.matrix, |b| &b.matrix);
            let window = bounds
                .window
                .map(|[lo, hi]| bounder::window(&solution.grid, source, lo, hi))
                .transpose()?;
            (bounded, window)
        }
        None => (None, None),
    };

    Ok(RunArtifacts {
        solution,
        bounded,
        window,
        refined_steps,
    })
}

fn build_grid(params: &ProblemParameters, nodes: usize, steps: usize) -> Result<Grid, SchemeError> {
    GridBuilder::for_problem(params).nodes(nodes).steps(steps).build()
}
