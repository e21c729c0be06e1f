//! Far-field boundary values.
//!
//! Each non-zero boundary is the exact solution `a(τ) + b(τ)·e^x` of the
//! transformed PDE that matches the payoff's linear branch at `τ = 0`. With
//! `κ = 2r/σ²`, `α(τ) = e^{-κτ}` and `φ(τ) = (1 − e^{-κτ})/(rT)`:
//!
//! | variant/option | `x_min`                 | `x_max`                   |
//! |----------------|-------------------------|---------------------------|
//! | H call         | `1 − φ − α·e^{x_min}`   | 0                         |
//! | H put          | 0                       | `α·e^{x_max} + φ − 1`     |
//! | W call         | 0                       | `(1 − φ)·e^{x_max} − α`   |
//! | W put          | `α − (1 − φ)·e^{x_min}` | 0                         |

use crate::grid::Grid;
use crate::params::{EquationVariant, OptionKind, ProblemParameters};

/// Below this |κτ| the series form of `φ` is used.
const SMALL_DECAY: f64 = 1e-12;

/// Boundary values at one time level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryValues {
    /// Value at node 0.
    pub lower: f64,
    /// Value at node `N − 1`.
    pub upper: f64,
}

/// Side of the spatial domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// `x → x_min`.
    Lower,
    /// `x → x_max`.
    Upper,
}

/// Supplies analytic boundary values for a variant and option kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundaryConditionProvider;

impl BoundaryConditionProvider {
    /// Boundary values at time level `level` of `grid`.
    ///
    /// # Panics
    ///
    /// Panics if `level` is not a level of `grid`.
    pub fn values(params: &ProblemParameters, grid: &Grid, level: usize) -> BoundaryValues {
        let tau = grid.tau()[level];
        BoundaryValues {
            lower: Self::far_field(params, Side::Lower, grid.x_min(), tau),
            upper: Self::far_field(params, Side::Upper, grid.x_max(), tau),
        }
    }

    /// Far-field value on `side` at coordinate `x` and time `tau`.
    pub fn far_field(params: &ProblemParameters, side: Side, x: f64, tau: f64) -> f64 {
        let (alpha, phi) = decay_terms(params, tau);
        match (params.variant(), params.option(), side) {
            (EquationVariant::H, OptionKind::Call, Side::Lower) => 1.0 - phi - alpha * x.exp(),
            (EquationVariant::H, OptionKind::Put, Side::Upper) => alpha * x.exp() + phi - 1.0,
            (EquationVariant::W, OptionKind::Call, Side::Upper) => (1.0 - phi) * x.exp() - alpha,
            (EquationVariant::W, OptionKind::Put, Side::Lower) => alpha - (1.0 - phi) * x.exp(),
            _ => 0.0,
        }
    }
}

/// `(α(τ), φ(τ))`.
fn decay_terms(params: &ProblemParameters, tau: f64) -> (f64, f64) {
    let sigma2 = params.volatility() * params.volatility();
    let r = params.rate();
    let t = params.maturity();
    let kappa_tau = 2.0 * r * tau / sigma2;
    let alpha = (-kappa_tau).exp();
    let phi = if kappa_tau.abs() < SMALL_DECAY {
        2.0 * tau / (sigma2 * t)
    } else {
        -(-kappa_tau).exp_m1() / (r * t)
    };
    (alpha, phi)
}
