//! Error types for structured error handling.
//!
//! This module provides:
//! - `SchemeError`: Every failure mode of a single PDE run (grid and
//!   parameter construction, explicit stability, mid-run divergence and
//!   tridiagonal solves)
//! - `SchemeErrorKind`: Payload-free category of a `SchemeError`, used for
//!   logging and summaries

use thiserror::Error;

/// Categorised PDE engine errors.
///
/// All variants are local to one (equation, scheme, option) run. A caller
/// orchestrating several runs records the error and moves on to the next
/// combination.
///
/// # Variants
/// - `Configuration`: Invalid grid, parameter or initial-condition construction
/// - `NumericalInstability`: Explicit time step exceeds the stability bound
/// - `NumericalDivergence`: Non-finite value produced mid-stepping
/// - `LinearSystem`: Tridiagonal elimination hit a (near-)zero pivot
///
/// # Examples
/// ```
/// use asian_core::types::SchemeError;
///
/// let err = SchemeError::configuration("node count must be >= 3, got 2");
/// assert_eq!(
///     format!("{}", err),
///     "Configuration error: node count must be >= 3, got 2"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemeError {
    /// Invalid grid or parameter construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Explicit scheme stability bound violated before stepping began.
    #[error("Numerical instability: time step {dt:e} exceeds stability bound {max_stable:e}")]
    NumericalInstability {
        /// Configured time step
        dt: f64,
        /// Largest stable time step for the grid and coefficients
        max_stable: f64,
    },

    /// Non-finite value encountered while stepping.
    #[error("Numerical divergence: non-finite value {value} at node {node}, level {level}")]
    NumericalDivergence {
        /// Spatial index of the offending entry
        node: usize,
        /// Time index of the offending entry
        level: usize,
        /// The offending value (NaN or ±inf)
        value: f64,
    },

    /// Tridiagonal solve encountered a non-invertible pivot.
    #[error("Linear system error: pivot {pivot:e} at row {row} is not invertible")]
    LinearSystem {
        /// Row at which elimination broke down
        row: usize,
        /// The offending pivot value
        pivot: f64,
    },
}

/// Payload-free category of a [`SchemeError`].
///
/// # Examples
/// ```
/// use asian_core::types::{SchemeError, SchemeErrorKind};
///
/// let err = SchemeError::LinearSystem { row: 3, pivot: 0.0 };
/// assert_eq!(err.kind(), SchemeErrorKind::LinearSystem);
/// assert_eq!(err.kind().as_str(), "linear_system");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SchemeErrorKind {
    /// See [`SchemeError::Configuration`].
    Configuration,
    /// See [`SchemeError::NumericalInstability`].
    NumericalInstability,
    /// See [`SchemeError::NumericalDivergence`].
    NumericalDivergence,
    /// See [`SchemeError::LinearSystem`].
    LinearSystem,
}

impl SchemeErrorKind {
    /// Stable snake_case label for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeErrorKind::Configuration => "configuration",
            SchemeErrorKind::NumericalInstability => "numerical_instability",
            SchemeErrorKind::NumericalDivergence => "numerical_divergence",
            SchemeErrorKind::LinearSystem => "linear_system",
        }
    }
}

impl std::fmt::Display for SchemeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SchemeError {
    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Category of this error.
    pub fn kind(&self) -> SchemeErrorKind {
        match self {
            SchemeError::Configuration(_) => SchemeErrorKind::Configuration,
            SchemeError::NumericalInstability { .. } => SchemeErrorKind::NumericalInstability,
            SchemeError::NumericalDivergence { .. } => SchemeErrorKind::NumericalDivergence,
            SchemeError::LinearSystem { .. } => SchemeErrorKind::LinearSystem,
        }
    }

    /// Whether this error was raised before any time step was taken.
    ///
    /// Configuration and stability failures are detected up front;
    /// divergence and linear-system failures happen mid-run.
    pub fn is_pre_stepping(&self) -> bool {
        matches!(
            self,
            SchemeError::Configuration(_) | SchemeError::NumericalInstability { .. }
        )
    }
}
