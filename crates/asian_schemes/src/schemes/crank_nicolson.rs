//! Crank-Nicolson scheme.

use asian_core::math::solvers::{SolverConfig, TridiagonalMatrix, TridiagonalSolver};
use asian_core::types::SchemeError;

use super::{apply_boundaries, FiniteDifferenceScheme, SchemeKind};
use crate::coefficients::SchemeCoefficients;
use crate::grid::Grid;
use crate::initial::InitialCondition;
use crate::params::ProblemParameters;
use crate::solution::{SolutionMatrix, Stepper};

/// Crank-Nicolson (trapezoidal) scheme.
///
/// Each step solves `A·u_{n+1} = B·u_n + b` over the interior nodes, where
/// `b` carries the boundary values of both levels. `A` depends only on the
/// grid and parameters and is assembled once per run.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrankNicolsonScheme {
    solver: TridiagonalSolver<f64>,
}

impl CrankNicolsonScheme {
    /// Scheme with the default pivot tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheme with a custom linear solver configuration.
    pub fn with_solver_config(config: SolverConfig<f64>) -> Self {
        Self {
            solver: TridiagonalSolver::new(config),
        }
    }

    /// Interior system matrix `A` for `params` on `grid`.
    ///
    /// Row `j` corresponds to grid node `j + 1`.
    pub fn system_matrix(
        params: &ProblemParameters,
        grid: &Grid,
    ) -> Result<TridiagonalMatrix<f64>, SchemeError> {
        let coeffs = SchemeCoefficients::new(params, grid);
        interior_matrix(&coeffs)
    }
}

fn interior_matrix(coeffs: &SchemeCoefficients) -> Result<TridiagonalMatrix<f64>, SchemeError> {
    let implicit = coeffs.implicit_stencil();
    let last = implicit.diag.len() - 1;
    TridiagonalMatrix::new(
        implicit.lower[1..last].to_vec(),
        implicit.diag[1..last].to_vec(),
        implicit.upper[1..last].to_vec(),
    )
}

impl FiniteDifferenceScheme for CrankNicolsonScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::CrankNicolson
    }

    fn solve(
        &self,
        params: &ProblemParameters,
        grid: &Grid,
        initial: &InitialCondition,
    ) -> Result<SolutionMatrix, SchemeError> {
        let initial = initial.resolve(params, grid)?;
        let coeffs = SchemeCoefficients::new(params, grid);
        let matrix = interior_matrix(&coeffs)?;
        let explicit = coeffs.averaged_explicit_stencil();

        let interior = matrix.len();
        let first_sub = matrix.sub()[0];
        let last_sup = matrix.sup()[interior - 1];
        let mut rhs = vec![0.0; interior];
        let mut scratch = vec![0.0; interior];

        Stepper::new(grid, &initial).run(|level, previous, next| {
            apply_boundaries(params, grid, level, next);
            let (lower, upper) = (next[0], next[interior + 1]);

            for (j, d) in rhs.iter_mut().enumerate() {
                *d = explicit.apply_at(previous, j + 1);
            }
            rhs[0] -= first_sub * lower;
            rhs[interior - 1] -= last_sup * upper;

            self.solver
                .solve_into(&matrix, &rhs, &mut scratch, &mut next[1..=interior])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryConditionProvider;
    use crate::grid::GridBuilder;
    use crate::params::{EquationVariant, OptionKind};
    use approx::assert_relative_eq;

    fn params(variant: EquationVariant, option: OptionKind) -> ProblemParameters {
        ProblemParameters::builder()
            .variant(variant)
            .option(option)
            .volatility(0.2)
            .rate(0.05)
            .strike(100.0)
            .maturity(1.0)
            .domain(-1.0, 1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_system_matrix_dimensions() {
        let p = params(EquationVariant::H, OptionKind::Call);
        let grid = GridBuilder::for_problem(&p).nodes(12).steps(5).build().unwrap();
        let a = CrankNicolsonScheme::system_matrix(&p, &grid).unwrap();
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_large_step_stays_finite() {
        let p = params(EquationVariant::H, OptionKind::Put);
        let grid = GridBuilder::for_problem(&p).nodes(101).steps(2).build().unwrap();
        assert!(crate::schemes::ExplicitScheme::check_stability(&p, &grid).is_err());

        let m = CrankNicolsonScheme::new()
            .solve(&p, &grid, &InitialCondition::Payoff)
            .unwrap();
        assert!(m.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_boundaries_exact() {
        let p = params(EquationVariant::W, OptionKind::Call);
        let grid = GridBuilder::for_problem(&p).nodes(31).steps(40).build().unwrap();
        let m = CrankNicolsonScheme::new()
            .solve(&p, &grid, &InitialCondition::Payoff)
            .unwrap();
        for n in 1..grid.level_count() {
            let bc = BoundaryConditionProvider::values(&p, &grid, n);
            assert_eq!(m.value(0, n), bc.lower);
            assert_eq!(m.value(30, n), bc.upper);
        }
    }

    #[test]
    fn test_single_interior_node_uses_both_boundaries() {
        let p = params(EquationVariant::H, OptionKind::Call);
        let grid = GridBuilder::for_problem(&p).nodes(3).steps(1).build().unwrap();
        let initial = InitialCondition::Payoff.resolve(&p, &grid).unwrap();
        let coeffs = SchemeCoefficients::new(&p, &grid);
        let a = coeffs.implicit_stencil();
        let b = coeffs.averaged_explicit_stencil();
        let bc = BoundaryConditionProvider::values(&p, &grid, 1);

        let m = CrankNicolsonScheme::new()
            .solve(&p, &grid, &InitialCondition::Payoff)
            .unwrap();

        let rhs = b.apply_at(&initial, 1) - a.lower[1] * bc.lower - a.upper[1] * bc.upper;
        assert_relative_eq!(m.value(1, 1), rhs / a.diag[1], epsilon = 1e-14);
    }

    #[test]
    fn test_singular_system_reports_linear_error() {
        let p = params(EquationVariant::H, OptionKind::Call);
        let grid = GridBuilder::for_problem(&p).nodes(5).steps(1).build().unwrap();
        let strict = CrankNicolsonScheme::with_solver_config(SolverConfig::new(1e6));
        let err = strict
            .solve(&p, &grid, &InitialCondition::Payoff)
            .unwrap_err();
        assert!(matches!(err, SchemeError::LinearSystem { row: 0, .. }));
    }
}
