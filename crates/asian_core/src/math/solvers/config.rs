//! Configuration for linear solvers.

use num_traits::Float;

/// Linear solver configuration.
///
/// Controls when elimination treats a pivot as numerically zero.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`, `f32`)
///
/// # Example
///
/// ```
/// use asian_core::math::solvers::SolverConfig;
///
/// // Default configuration
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert!(config.pivot_tolerance < 1e-12);
///
/// // Custom configuration
/// let custom = SolverConfig {
///     pivot_tolerance: 1e-10,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Smallest pivot magnitude accepted during elimination.
    ///
    /// A pivot with `|pivot| <= pivot_tolerance` (or a non-finite pivot)
    /// aborts the solve with `SchemeError::LinearSystem`.
    pub pivot_tolerance: T,
}

impl<T: Float> Default for SolverConfig<T> {
    /// Default values:
    /// - `pivot_tolerance`: 1e-14
    fn default() -> Self {
        Self {
            pivot_tolerance: T::from(1e-14).unwrap_or_else(T::epsilon),
        }
    }
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration with the given pivot tolerance.
    ///
    /// # Panics
    ///
    /// Panics if `pivot_tolerance < 0` or is NaN.
    ///
    /// # Example
    ///
    /// ```
    /// use asian_core::math::solvers::SolverConfig;
    ///
    /// let config = SolverConfig::new(1e-12);
    /// assert_eq!(config.pivot_tolerance, 1e-12);
    /// ```
    pub fn new(pivot_tolerance: T) -> Self {
        assert!(
            pivot_tolerance >= T::zero(),
            "pivot_tolerance must be non-negative"
        );
        Self { pivot_tolerance }
    }

    /// Configuration that only rejects exactly-zero pivots.
    pub fn exact() -> Self {
        Self {
            pivot_tolerance: T::zero(),
        }
    }
}
