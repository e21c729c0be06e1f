//! Uniform space-time grids.
//!
//! A [`Grid`] holds `N` spatial nodes `x_i = x_min + iΔx` and `M + 1` time
//! levels `τ_n = nΔt`, with `τ_0 = 0` and `τ_M` equal to the horizon.

use asian_core::types::SchemeError;

use crate::params::ProblemParameters;

/// Minimum number of spatial nodes (two boundaries plus one interior node).
pub const MIN_NODES: usize = 3;

/// Upper bound on `N · (M + 1)`, the size of a full solution matrix.
pub const MAX_MATRIX_ENTRIES: usize = 1 << 28;

/// Immutable space-time discretisation.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    x: Vec<f64>,
    tau: Vec<f64>,
    dx: f64,
    dt: f64,
}

impl Grid {
    /// Spatial coordinates, strictly increasing.
    #[inline]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Time levels, strictly increasing from zero.
    #[inline]
    pub fn tau(&self) -> &[f64] {
        &self.tau
    }

    /// Spatial spacing Δx.
    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Time step Δt.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of spatial nodes `N`.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.x.len()
    }

    /// Number of time levels `M + 1`.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.tau.len()
    }

    /// Number of time steps `M`.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.tau.len() - 1
    }

    /// Final time level.
    #[inline]
    pub fn horizon(&self) -> f64 {
        self.tau[self.tau.len() - 1]
    }

    /// Lower spatial bound.
    #[inline]
    pub fn x_min(&self) -> f64 {
        self.x[0]
    }

    /// Upper spatial bound.
    #[inline]
    pub fn x_max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }
}

/// How the builder derives the number of time steps.
#[derive(Clone, Copy, Debug, PartialEq)]
enum TimeStepping {
    Steps(usize),
    Target(f64),
}

/// Builder for [`Grid`].
///
/// # Examples
///
/// ```rust
/// use asian_schemes::grid::GridBuilder;
///
/// let grid = GridBuilder::new(-1.0, 1.0)
///     .nodes(21)
///     .horizon(0.02)
///     .steps(100)
///     .build()
///     .unwrap();
///
/// assert_eq!(grid.node_count(), 21);
/// assert_eq!(grid.level_count(), 101);
/// assert!((grid.dx() - 0.1).abs() < 1e-15);
/// ```
#[derive(Clone, Debug)]
pub struct GridBuilder {
    x_min: f64,
    x_max: f64,
    nodes: Option<usize>,
    horizon: Option<f64>,
    stepping: Option<TimeStepping>,
}

impl GridBuilder {
    /// Starts a builder over `[x_min, x_max]`.
    pub fn new(x_min: f64, x_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            nodes: None,
            horizon: None,
            stepping: None,
        }
    }

    /// Starts a builder with the domain and horizon `σ²T/2` of `params`.
    pub fn for_problem(params: &ProblemParameters) -> Self {
        Self::new(params.x_min(), params.x_max()).horizon(params.tau_max())
    }

    /// Sets the number of spatial nodes `N`.
    #[inline]
    pub fn nodes(mut self, nodes: usize) -> Self {
        self.nodes = Some(nodes);
        self
    }

    /// Sets the time horizon.
    #[inline]
    pub fn horizon(mut self, horizon: f64) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Sets the number of time steps `M` directly.
    #[inline]
    pub fn steps(mut self, steps: usize) -> Self {
        self.stepping = Some(TimeStepping::Steps(steps));
        self
    }

    /// Sets a target time step.
    ///
    /// The step count is the smallest `M` with `horizon / M <= dt`, so the
    /// actual step never exceeds the target and the last level lands on the
    /// horizon.
    #[inline]
    pub fn time_step(mut self, dt: f64) -> Self {
        self.stepping = Some(TimeStepping::Target(dt));
        self
    }

    /// Builds the grid.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::Configuration` if the bounds are inverted or
    /// non-finite, `N < 3`, the horizon is not positive, `M < 1`, the target
    /// step is not positive, or the grid would exceed
    /// [`MAX_MATRIX_ENTRIES`].
    pub fn build(self) -> Result<Grid, SchemeError> {
        if !self.x_min.is_finite() || !self.x_max.is_finite() {
            return Err(SchemeError::configuration(format!(
                "grid bounds must be finite, got [{}, {}]",
                self.x_min, self.x_max
            )));
        }
        if self.x_min >= self.x_max {
            return Err(SchemeError::configuration(format!(
                "x_min must be < x_max, got [{}, {}]",
                self.x_min, self.x_max
            )));
        }

        let nodes = self
            .nodes
            .ok_or_else(|| SchemeError::configuration("node count is required"))?;
        if nodes < MIN_NODES {
            return Err(SchemeError::configuration(format!(
                "node count must be >= {MIN_NODES}, got {nodes}"
            )));
        }

        let horizon = self
            .horizon
            .ok_or_else(|| SchemeError::configuration("horizon is required"))?;
        if !(horizon.is_finite() && horizon > 0.0) {
            return Err(SchemeError::configuration(format!(
                "horizon must be positive and finite, got {horizon}"
            )));
        }

        let steps = match self.stepping {
            None => return Err(SchemeError::configuration("step count or time step is required")),
            Some(TimeStepping::Steps(m)) => m,
            Some(TimeStepping::Target(dt)) => steps_for_target(horizon, dt)?,
        };
        if steps < 1 {
            return Err(SchemeError::configuration(format!(
                "step count must be >= 1, got {steps}"
            )));
        }

        let entries = steps.checked_add(1).and_then(|levels| nodes.checked_mul(levels));
        if entries.map_or(true, |e| e > MAX_MATRIX_ENTRIES) {
            return Err(SchemeError::configuration(format!(
                "grid of {nodes} nodes x {steps} steps exceeds {MAX_MATRIX_ENTRIES} entries"
            )));
        }

        let dx = (self.x_max - self.x_min) / (nodes - 1) as f64;
        let dt = horizon / steps as f64;
        let x = uniform(self.x_min, self.x_max, dx, nodes);
        let tau = uniform(0.0, horizon, dt, steps + 1);

        Ok(Grid { x, tau, dx, dt })
    }
}

fn steps_for_target(horizon: f64, dt: f64) -> Result<usize, SchemeError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SchemeError::configuration(format!(
            "time step must be positive and finite, got {dt}"
        )));
    }
    let mut steps = (horizon / dt).ceil().max(1.0);
    if steps > MAX_MATRIX_ENTRIES as f64 {
        return Err(SchemeError::configuration(format!(
            "time step {dt} yields too many steps for horizon {horizon}"
        )));
    }
    // The quotient may round up past an exact multiple; the step actually
    // used, horizon / M, must still be <= dt.
    if steps > 1.0 && horizon / (steps - 1.0) <= dt {
        steps -= 1.0;
    }
    while horizon / steps > dt {
        steps += 1.0;
    }
    Ok(steps as usize)
}

/// `count` points from `start` with spacing `step`, the last pinned to `end`.
fn uniform(start: f64, end: f64, step: f64, count: usize) -> Vec<f64> {
    let mut points: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
    points[count - 1] = end;
    points
}
