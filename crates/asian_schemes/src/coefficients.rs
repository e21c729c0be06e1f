//! Per-node PDE coefficients and finite-difference stencils.
//!
//! Both formulations reduce to
//!
//! ```text
//! u_τ = u_xx + c(x)·u_x − q(x)·u
//! ```
//!
//! with unit diffusion. With κ = 2/σ²:
//!
//! - H: `c(x) = κ(e^{-x}/T − r) − 1`, `q(x) = 0`
//! - W: `B(x) = κ(r − e^{x}/T)`, `c(x) = B(x) − 1`, `q(x) = B(x)`

use crate::grid::Grid;
use crate::params::{EquationVariant, ProblemParameters};

/// Drift `c(x)` of the transformed PDE.
pub fn drift(params: &ProblemParameters, x: f64) -> f64 {
    let kappa = 2.0 / (params.volatility() * params.volatility());
    let t = params.maturity();
    match params.variant() {
        EquationVariant::H => kappa * ((-x).exp() / t - params.rate()) - 1.0,
        EquationVariant::W => kappa * (params.rate() - x.exp() / t) - 1.0,
    }
}

/// Reaction `q(x)` of the transformed PDE.
pub fn reaction(params: &ProblemParameters, x: f64) -> f64 {
    match params.variant() {
        EquationVariant::H => 0.0,
        EquationVariant::W => {
            let kappa = 2.0 / (params.volatility() * params.volatility());
            kappa * (params.rate() - x.exp() / params.maturity())
        }
    }
}

/// Three-point stencil weights, one entry per spatial node.
///
/// Entries at the boundary nodes are computed but never used by the schemes.
#[derive(Clone, Debug, PartialEq)]
pub struct Stencil {
    /// Weight on node `i − 1`.
    pub lower: Vec<f64>,
    /// Weight on node `i`.
    pub diag: Vec<f64>,
    /// Weight on node `i + 1`.
    pub upper: Vec<f64>,
}

impl Stencil {
    /// Applies the stencil at interior node `i` to `values`.
    #[inline]
    pub fn apply_at(&self, values: &[f64], i: usize) -> f64 {
        self.lower[i] * values[i - 1] + self.diag[i] * values[i] + self.upper[i] * values[i + 1]
    }
}

/// Coefficients of one run, sampled on the grid nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemeCoefficients {
    drift: Vec<f64>,
    reaction: Vec<f64>,
    dx: f64,
    dt: f64,
}

impl SchemeCoefficients {
    /// Samples drift and reaction at every node of `grid`.
    pub fn new(params: &ProblemParameters, grid: &Grid) -> Self {
        let drift = grid.x().iter().map(|&x| drift(params, x)).collect();
        let reaction = grid.x().iter().map(|&x| reaction(params, x)).collect();
        Self {
            drift,
            reaction,
            dx: grid.dx(),
            dt: grid.dt(),
        }
    }

    /// Drift at every node.
    #[inline]
    pub fn drift(&self) -> &[f64] {
        &self.drift
    }

    /// Reaction at every node.
    #[inline]
    pub fn reaction(&self) -> &[f64] {
        &self.reaction
    }

    /// Diffusion number `μ = Δt/Δx²`.
    #[inline]
    pub fn mu(&self) -> f64 {
        self.dt / (self.dx * self.dx)
    }

    /// Courant number `λ = Δt/Δx`.
    #[inline]
    pub fn lambda(&self) -> f64 {
        self.dt / self.dx
    }

    /// Forward-time centred-space weights.
    pub fn explicit_stencil(&self) -> Stencil {
        let (mu, lambda) = (self.mu(), self.lambda());
        self.stencil(
            |c| mu - 0.5 * lambda * c,
            |q| 1.0 - 2.0 * mu - self.dt * q,
            |c| mu + 0.5 * lambda * c,
        )
    }

    /// Crank-Nicolson left-hand (time level `n + 1`) weights.
    pub fn implicit_stencil(&self) -> Stencil {
        let (mu, lambda) = (self.mu(), self.lambda());
        self.stencil(
            |c| -0.5 * mu + 0.25 * lambda * c,
            |q| 1.0 + mu + 0.5 * self.dt * q,
            |c| -0.5 * mu - 0.25 * lambda * c,
        )
    }

    /// Crank-Nicolson right-hand (time level `n`) weights.
    pub fn averaged_explicit_stencil(&self) -> Stencil {
        let (mu, lambda) = (self.mu(), self.lambda());
        self.stencil(
            |c| 0.5 * mu - 0.25 * lambda * c,
            |q| 1.0 - mu - 0.5 * self.dt * q,
            |c| 0.5 * mu + 0.25 * lambda * c,
        )
    }

    /// Largest time step for which the explicit stencil is stable on this grid.
    ///
    /// Minimum over interior nodes of `Δx²/(2 + Δx²·max(q, 0))` (non-negative
    /// diagonal weight) and `2/c²` (von Neumann drift bound).
    pub fn explicit_step_bound(&self) -> f64 {
        let h2 = self.dx * self.dx;
        let n = self.drift.len();
        (1..n - 1)
            .map(|i| {
                let diffusive = h2 / (2.0 + h2 * self.reaction[i].max(0.0));
                let c = self.drift[i];
                let advective = if c == 0.0 { f64::INFINITY } else { 2.0 / (c * c) };
                diffusive.min(advective)
            })
            .fold(f64::INFINITY, f64::min)
    }

    fn stencil(
        &self,
        lower: impl Fn(f64) -> f64,
        diag: impl Fn(f64) -> f64,
        upper: impl Fn(f64) -> f64,
    ) -> Stencil {
        Stencil {
            lower: self.drift.iter().map(|&c| lower(c)).collect(),
            diag: self.reaction.iter().map(|&q| diag(q)).collect(),
            upper: self.drift.iter().map(|&c| upper(c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridBuilder;
    use crate::params::OptionKind;
    use approx::assert_relative_eq;

    fn params(variant: EquationVariant) -> ProblemParameters {
        ProblemParameters::builder()
            .variant(variant)
            .option(OptionKind::Call)
            .volatility(0.2)
            .rate(0.05)
            .strike(100.0)
            .maturity(1.0)
            .domain(-1.0, 1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_h_drift_at_origin() {
        // κ = 50, c(0) = 50·(1 − 0.05) − 1
        assert_relative_eq!(drift(&params(EquationVariant::H), 0.0), 46.5, epsilon = 1e-12);
        assert_eq!(reaction(&params(EquationVariant::H), 0.3), 0.0);
    }

    #[test]
    fn test_w_drift_and_reaction_at_origin() {
        let p = params(EquationVariant::W);
        // B(0) = 50·(0.05 − 1) = −47.5
        assert_relative_eq!(reaction(&p, 0.0), -47.5, epsilon = 1e-12);
        assert_relative_eq!(drift(&p, 0.0), -48.5, epsilon = 1e-12);
    }

    #[test]
    fn test_explicit_stencil_rows_sum_to_one_minus_reaction() {
        let p = params(EquationVariant::W);
        let grid = GridBuilder::for_problem(&p).nodes(11).steps(50).build().unwrap();
        let coeffs = SchemeCoefficients::new(&p, &grid);
        let s = coeffs.explicit_stencil();
        for i in 1..10 {
            let sum = s.lower[i] + s.diag[i] + s.upper[i];
            assert_relative_eq!(sum, 1.0 - grid.dt() * coeffs.reaction()[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_crank_nicolson_stencils_average_to_explicit() {
        let p = params(EquationVariant::H);
        let grid = GridBuilder::for_problem(&p).nodes(9).steps(20).build().unwrap();
        let coeffs = SchemeCoefficients::new(&p, &grid);
        let e = coeffs.explicit_stencil();
        let b = coeffs.averaged_explicit_stencil();
        let a = coeffs.implicit_stencil();
        for i in 1..8 {
            // B − I = (E − I)/2 and A − I = −(E − I)/2
            assert_relative_eq!(b.lower[i], 0.5 * e.lower[i], epsilon = 1e-12);
            assert_relative_eq!(a.upper[i], -0.5 * e.upper[i], epsilon = 1e-12);
            assert_relative_eq!(b.diag[i] - 1.0, 0.5 * (e.diag[i] - 1.0), epsilon = 1e-12);
            assert_relative_eq!(a.diag[i] - 1.0, -0.5 * (e.diag[i] - 1.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_step_bound_is_diffusive_for_mild_drift() {
        let p = ProblemParameters::builder()
            .variant(EquationVariant::H)
            .volatility(1.0)
            .rate(0.0)
            .strike(1.0)
            .maturity(1.0)
            .domain(-0.1, 0.1)
            .build()
            .unwrap();
        let grid = GridBuilder::for_problem(&p).nodes(5).steps(1).build().unwrap();
        let coeffs = SchemeCoefficients::new(&p, &grid);
        // |c| ≤ 2e^{0.1} − 1 ≈ 1.21, so 2/c² ≈ 1.37 ≫ Δx²/2 = 1.25e-3
        assert_relative_eq!(coeffs.explicit_step_bound(), 0.05 * 0.05 / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_step_bound_accounts_for_positive_reaction() {
        let p = ProblemParameters::builder()
            .variant(EquationVariant::W)
            .volatility(0.2)
            .rate(0.5)
            .strike(1.0)
            .maturity(100.0)
            .domain(-0.1, 0.1)
            .build()
            .unwrap();
        let grid = GridBuilder::for_problem(&p).nodes(5).steps(1).build().unwrap();
        let coeffs = SchemeCoefficients::new(&p, &grid);
        let h2 = grid.dx() * grid.dx();
        assert!(coeffs.reaction()[2] > 0.0);
        assert!(coeffs.explicit_step_bound() < h2 / 2.0);
    }
}
