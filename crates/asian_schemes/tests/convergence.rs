//! Convergence of the explicit and Crank-Nicolson schemes.
//!
//! Scenario: H call, σ = 0.2, r = 0.05, K = 100, T = 1 on x ∈ [-1, 1].
//! Errors are the maximum pointwise error on the final time level, against a
//! fine Crank-Nicolson reference, at the nodes shared with each coarse grid.
//! Only the final level is compared: the explicit step counts do not divide
//! the reference step count, so earlier levels have no shared time points.
//! Level-by-level agreement is covered by
//! `test_explicit_and_crank_nicolson_agree`, which compares every entry.

use asian_schemes::grid::{Grid, GridBuilder};
use asian_schemes::initial::InitialCondition;
use asian_schemes::params::{EquationVariant, OptionKind, ProblemParameters};
use asian_schemes::schemes::{CrankNicolsonScheme, ExplicitScheme, FiniteDifferenceScheme};
use asian_schemes::solution::SolutionMatrix;

const REFERENCE_NODES: usize = 2561;
const REFERENCE_STEPS: usize = 2560;

fn scenario(option: OptionKind) -> ProblemParameters {
    ProblemParameters::builder()
        .variant(EquationVariant::H)
        .option(option)
        .volatility(0.2)
        .rate(0.05)
        .strike(100.0)
        .maturity(1.0)
        .domain(-1.0, 1.0)
        .build()
        .unwrap()
}

fn grid(params: &ProblemParameters, nodes: usize, steps: usize) -> Grid {
    GridBuilder::for_problem(params)
        .nodes(nodes)
        .steps(steps)
        .build()
        .unwrap()
}

fn reference(params: &ProblemParameters) -> Vec<f64> {
    let g = grid(params, REFERENCE_NODES, REFERENCE_STEPS);
    CrankNicolsonScheme::new()
        .solve(params, &g, &InitialCondition::Payoff)
        .unwrap()
        .last_level()
        .to_vec()
}

/// Max error of the final level on the nodes shared with the reference grid.
fn final_level_error(matrix: &SolutionMatrix, reference: &[f64]) -> f64 {
    let stride = (REFERENCE_NODES - 1) / (matrix.nodes() - 1);
    matrix
        .last_level()
        .iter()
        .enumerate()
        .map(|(i, v)| (v - reference[i * stride]).abs())
        .fold(0.0, f64::max)
}

// ============================================================================
// Crank-Nicolson: halving Δx and Δt together
// ============================================================================

#[test]
fn test_crank_nicolson_second_order() {
    let params = scenario(OptionKind::Call);
    let reference = reference(&params);

    let errors: Vec<f64> = [(161, 80), (321, 160), (641, 320)]
        .iter()
        .map(|&(nodes, steps)| {
            let m = CrankNicolsonScheme::new()
                .solve(&params, &grid(&params, nodes, steps), &InitialCondition::Payoff)
                .unwrap();
            final_level_error(&m, &reference)
        })
        .collect();

    for pair in errors.windows(2) {
        let ratio = pair[0] / pair[1];
        assert!(
            (3.0..6.5).contains(&ratio),
            "error ratio {ratio} outside second-order range, errors = {errors:?}"
        );
    }
    assert!(errors[2] < 5e-3, "finest error {} too large", errors[2]);
}

// ============================================================================
// Explicit: halving Δx with μ = Δt/Δx² held fixed
// ============================================================================

#[test]
fn test_explicit_order_with_fixed_diffusion_number() {
    let params = scenario(OptionKind::Call);
    let reference = reference(&params);

    let errors: Vec<f64> = [(81, 400), (161, 1600), (321, 6400)]
        .iter()
        .map(|&(nodes, steps)| {
            let g = grid(&params, nodes, steps);
            ExplicitScheme::check_stability(&params, &g).unwrap();
            let m = ExplicitScheme::new()
                .solve(&params, &g, &InitialCondition::Payoff)
                .unwrap();
            final_level_error(&m, &reference)
        })
        .collect();

    for pair in errors.windows(2) {
        let ratio = pair[0] / pair[1];
        // Δt shrinks fourfold per halving of Δx, so the ratio sits between
        // first order in time and second order in space
        assert!(
            (1.8..6.0).contains(&ratio),
            "error ratio {ratio} outside expected range, errors = {errors:?}"
        );
    }
}

// ============================================================================
// Agreement on a shared fine grid
// ============================================================================

#[test]
fn test_explicit_and_crank_nicolson_agree() {
    for variant in [EquationVariant::H, EquationVariant::W] {
        for option in [OptionKind::Call, OptionKind::Put] {
            let params = scenario(option).with_variant(variant);
            let fine = grid(&params, 161, 1600);
            let explicit = ExplicitScheme::new()
                .solve(&params, &fine, &InitialCondition::Payoff)
                .unwrap();
            let cn = CrankNicolsonScheme::new()
                .solve(&params, &fine, &InitialCondition::Payoff)
                .unwrap();

            let diff = explicit.max_abs_diff(&cn).unwrap();
            assert!(diff < 5e-3, "{variant} {option}: max difference {diff}");
        }
    }
}
