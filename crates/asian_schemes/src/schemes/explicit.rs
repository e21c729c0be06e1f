//! Forward-time centred-space scheme.

use asian_core::types::SchemeError;
use rayon::prelude::*;

use super::{apply_boundaries, FiniteDifferenceScheme, SchemeKind};
use crate::coefficients::{SchemeCoefficients, Stencil};
use crate::grid::Grid;
use crate::initial::InitialCondition;
use crate::params::ProblemParameters;
use crate::solution::{SolutionMatrix, Stepper};

/// Relative slack on the stability bound, absorbing rounding in Δt.
const STABILITY_SLACK: f64 = 1e-12;

/// Explicit (forward Euler) scheme.
///
/// Conditionally stable: [`solve`](FiniteDifferenceScheme::solve) refuses to
/// start when the grid's Δt exceeds [`ExplicitScheme::max_stable_step`].
///
/// # Examples
///
/// ```rust
/// use asian_schemes::grid::GridBuilder;
/// use asian_schemes::initial::InitialCondition;
/// use asian_schemes::params::ProblemParameters;
/// use asian_schemes::schemes::{ExplicitScheme, FiniteDifferenceScheme};
///
/// let params = ProblemParameters::builder()
///     .volatility(0.2)
///     .rate(0.05)
///     .strike(100.0)
///     .maturity(1.0)
///     .domain(-1.0, 1.0)
///     .build()
///     .unwrap();
/// let grid = GridBuilder::for_problem(&params).nodes(41).steps(200).build().unwrap();
/// assert!(grid.dt() <= ExplicitScheme::max_stable_step(&params, &grid));
///
/// let matrix = ExplicitScheme::new()
///     .solve(&params, &grid, &InitialCondition::Payoff)
///     .unwrap();
/// assert_eq!(matrix.levels(), 201);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ExplicitScheme {
    parallel_fill: bool,
}

impl ExplicitScheme {
    /// Sequential explicit scheme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills each level's interior nodes in parallel when `enabled`.
    ///
    /// Each node reads only the previous level, so the result is identical
    /// to the sequential fill.
    pub fn with_parallel_fill(mut self, enabled: bool) -> Self {
        self.parallel_fill = enabled;
        self
    }

    /// Whether the interior fill runs on the rayon pool.
    pub fn parallel_fill(&self) -> bool {
        self.parallel_fill
    }

    /// Largest stable time step for `params` on the spatial grid of `grid`.
    pub fn max_stable_step(params: &ProblemParameters, grid: &Grid) -> f64 {
        SchemeCoefficients::new(params, grid).explicit_step_bound()
    }

    /// Checks the grid's time step against the stability bound.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::NumericalInstability` carrying both steps.
    pub fn check_stability(params: &ProblemParameters, grid: &Grid) -> Result<(), SchemeError> {
        check_step(grid.dt(), Self::max_stable_step(params, grid))
    }

    fn fill_interior(&self, stencil: &Stencil, previous: &[f64], next: &mut [f64]) {
        let last = next.len() - 1;
        let interior = &mut next[1..last];
        if self.parallel_fill {
            interior
                .par_iter_mut()
                .enumerate()
                .for_each(|(j, v)| *v = stencil.apply_at(previous, j + 1));
        } else {
            interior
                .iter_mut()
                .enumerate()
                .for_each(|(j, v)| *v = stencil.apply_at(previous, j + 1));
        }
    }
}

fn check_step(dt: f64, max_stable: f64) -> Result<(), SchemeError> {
    if dt > max_stable * (1.0 + STABILITY_SLACK) {
        Err(SchemeError::NumericalInstability { dt, max_stable })
    } else {
        Ok(())
    }
}

impl FiniteDifferenceScheme for ExplicitScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Explicit
    }

    fn solve(
        &self,
        params: &ProblemParameters,
        grid: &Grid,
        initial: &InitialCondition,
    ) -> Result<SolutionMatrix, SchemeError> {
        let initial = initial.resolve(params, grid)?;
        let coeffs = SchemeCoefficients::new(params, grid);
        check_step(grid.dt(), coeffs.explicit_step_bound())?;
        let stencil = coeffs.explicit_stencil();

        Stepper::new(grid, &initial).run(|level, previous, next| {
            self.fill_interior(&stencil, previous, next);
            apply_boundaries(params, grid, level, next);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryConditionProvider;
    use crate::grid::GridBuilder;
    use crate::params::{EquationVariant, OptionKind};

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

    fn stable_grid(p: &ProblemParameters, nodes: usize) -> Grid {
        let coarse = GridBuilder::for_problem(p).nodes(nodes).steps(1).build().unwrap();
        let bound = ExplicitScheme::max_stable_step(p, &coarse);
        GridBuilder::for_problem(p)
            .nodes(nodes)
            .time_step(0.9 * bound)
            .build()
            .unwrap()
    }

    #[test]
    fn test_unstable_step_fails_before_stepping() {
        let p = params(EquationVariant::H, OptionKind::Call);
        let grid = GridBuilder::for_problem(&p).nodes(101).steps(2).build().unwrap();
        let err = ExplicitScheme::new()
            .solve(&p, &grid, &InitialCondition::Payoff)
            .unwrap_err();
        match err {
            SchemeError::NumericalInstability { dt, max_stable } => {
                assert_eq!(dt, grid.dt());
                assert!(max_stable < dt);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(ExplicitScheme::check_stability(&p, &grid).is_err());
    }

    #[test]
    fn test_largest_stable_target_step_is_accepted() {
        let p = params(EquationVariant::H, OptionKind::Call);
        let probe = GridBuilder::for_problem(&p).nodes(41).steps(1).build().unwrap();
        let bound = ExplicitScheme::max_stable_step(&p, &probe);

        // Horizons just past a multiple of the bound used to round Δt above it
        for horizon in [p.tau_max(), bound * 100.0 * (1.0 + 5e-10)] {
            let grid = GridBuilder::for_problem(&p)
                .nodes(41)
                .horizon(horizon)
                .time_step(bound)
                .build()
                .unwrap();
            assert!(grid.dt() <= bound);
            let m = ExplicitScheme::new()
                .solve(&p, &grid, &InitialCondition::Payoff)
                .unwrap();
            assert_eq!(m.levels(), grid.level_count());
        }
    }

    #[test]
    fn test_level_zero_and_boundaries() {
        let p = params(EquationVariant::H, OptionKind::Call);
        let grid = stable_grid(&p, 21);
        let m = ExplicitScheme::new()
            .solve(&p, &grid, &InitialCondition::Payoff)
            .unwrap();

        let payoff = InitialCondition::Payoff.resolve(&p, &grid).unwrap();
        assert_eq!(m.level(0), payoff.as_slice());
        for n in 1..grid.level_count() {
            let bc = BoundaryConditionProvider::values(&p, &grid, n);
            assert_eq!(m.value(0, n), bc.lower);
            assert_eq!(m.value(20, n), bc.upper);
        }
    }

    #[test]
    fn test_single_interior_node() {
        let p = params(EquationVariant::W, OptionKind::Put);
        let grid = stable_grid(&p, 3);
        let m = ExplicitScheme::new()
            .solve(&p, &grid, &InitialCondition::Payoff)
            .unwrap();
        assert!(m.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_parallel_fill_is_bit_identical() {
        let p = params(EquationVariant::W, OptionKind::Call);
        let grid = stable_grid(&p, 61);
        let seq = ExplicitScheme::new()
            .solve(&p, &grid, &InitialCondition::Payoff)
            .unwrap();
        let par = ExplicitScheme::new()
            .with_parallel_fill(true)
            .solve(&p, &grid, &InitialCondition::Payoff)
            .unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_bad_initial_values_rejected() {
        let p = params(EquationVariant::H, OptionKind::Put);
        let grid = stable_grid(&p, 11);
        let err = ExplicitScheme::new()
            .solve(&p, &grid, &InitialCondition::Values(vec![0.0; 10]))
            .unwrap_err();
        assert!(matches!(err, SchemeError::Configuration(_)));
    }
}
