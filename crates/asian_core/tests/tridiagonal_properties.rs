//! Property tests for the tridiagonal solver.
//!
//! Random diagonally dominant systems are solved and multiplied back by the
//! original matrix; the product must reproduce the right-hand side.

use asian_core::math::solvers::{TridiagonalMatrix, TridiagonalSolver};
use asian_core::types::SchemeError;
use proptest::prelude::*;

/// Diagonally dominant system of size `n` with its right-hand side.
fn dominant_system() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>)> {
    (1usize..64).prop_flat_map(|n| {
        (
            prop::collection::vec(-10.0..10.0_f64, n),
            prop::collection::vec(-10.0..10.0_f64, n),
            prop::collection::vec(0.1..10.0_f64, n),
            prop::collection::vec(prop::bool::ANY, n),
            prop::collection::vec(-100.0..100.0_f64, n),
        )
            .prop_map(|(sub, sup, margin, negate, rhs)| {
                let diag = sub
                    .iter()
                    .zip(&sup)
                    .zip(&margin)
                    .zip(&negate)
                    .map(|(((a, c), m), neg)| {
                        let d = a.abs() + c.abs() + m;
                        if *neg {
                            -d
                        } else {
                            d
                        }
                    })
                    .collect();
                (sub, diag, sup, rhs)
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_solve_then_multiply_reproduces_rhs(
        (sub, diag, sup, rhs) in dominant_system()
    ) {
        let matrix = TridiagonalMatrix::new(sub, diag, sup).unwrap();
        prop_assert!(matrix.is_diagonally_dominant());

        let x = TridiagonalSolver::with_defaults().solve(&matrix, &rhs).unwrap();
        let back = matrix.apply(&x).unwrap();

        let scale = rhs.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
        for (got, want) in back.iter().zip(&rhs) {
            prop_assert!(
                (got - want).abs() <= 1e-9 * scale,
                "A·x = {} but d = {} (scale {})", got, want, scale
            );
        }
    }

    #[test]
    fn test_solution_is_finite(
        (sub, diag, sup, rhs) in dominant_system()
    ) {
        let matrix = TridiagonalMatrix::new(sub, diag, sup).unwrap();
        let x = TridiagonalSolver::with_defaults().solve(&matrix, &rhs).unwrap();
        prop_assert!(x.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn test_singular_system_reports_linear_system_error() {
    // Two identical rows: [1 1; 1 1]
    let matrix = TridiagonalMatrix::new(vec![0.0, 1.0], vec![1.0, 1.0], vec![1.0, 0.0]).unwrap();
    let result = TridiagonalSolver::with_defaults().solve(&matrix, &[2.0, 2.0]);
    assert!(matches!(result, Err(SchemeError::LinearSystem { row: 1, .. })));
}
