//! Time-stepping schemes.
//!
//! Both schemes share the same contract: level 0 is the initial condition,
//! boundary nodes at levels `n ≥ 1` come from
//! [`BoundaryConditionProvider`](crate::boundary::BoundaryConditionProvider),
//! and each interior level is computed from the previous one.
//!
//! - [`ExplicitScheme`]: forward-time centred-space, conditionally stable
//! - [`CrankNicolsonScheme`]: trapezoidal in time, one tridiagonal solve per step

mod crank_nicolson;
mod explicit;

pub use crank_nicolson::CrankNicolsonScheme;
pub use explicit::ExplicitScheme;

use asian_core::types::SchemeError;
use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryConditionProvider;
use crate::grid::Grid;
use crate::initial::InitialCondition;
use crate::params::ProblemParameters;
use crate::solution::{SolutionMatrix, SolveResult};

/// Scheme selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    /// [`ExplicitScheme`].
    Explicit,
    /// [`CrankNicolsonScheme`].
    CrankNicolson,
}

impl SchemeKind {
    /// snake_case label used in file names and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeKind::Explicit => "explicit",
            SchemeKind::CrankNicolson => "crank_nicolson",
        }
    }
}

impl std::fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finite-difference time-stepping scheme.
pub trait FiniteDifferenceScheme {
    /// Which scheme this is.
    fn kind(&self) -> SchemeKind;

    /// Advances `initial` across every level of `grid`.
    ///
    /// # Errors
    ///
    /// - `Configuration` for an initial condition that does not fit the grid
    /// - `NumericalInstability` if the scheme cannot run on this grid
    /// - `NumericalDivergence` if a non-finite value appears
    /// - `LinearSystem` if an implicit solve breaks down
    fn solve(
        &self,
        params: &ProblemParameters,
        grid: &Grid,
        initial: &InitialCondition,
    ) -> Result<SolutionMatrix, SchemeError>;

    /// [`solve`](Self::solve) wrapped with the run identity.
    fn solve_result(
        &self,
        params: &ProblemParameters,
        grid: &Grid,
        initial: &InitialCondition,
    ) -> Result<SolveResult, SchemeError> {
        let matrix = self.solve(params, grid, initial)?;
        Ok(SolveResult {
            variant: params.variant(),
            option: params.option(),
            scheme: self.kind(),
            grid: grid.clone(),
            matrix,
        })
    }
}

/// Writes the boundary values of `level` into the ends of `next`.
#[inline]
fn apply_boundaries(params: &ProblemParameters, grid: &Grid, level: usize, next: &mut [f64]) {
    let bc = BoundaryConditionProvider::values(params, grid, level);
    next[0] = bc.lower;
    next[next.len() - 1] = bc.upper;
}
