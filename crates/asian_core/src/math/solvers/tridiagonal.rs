//! Tridiagonal linear systems and the Thomas algorithm.

use super::SolverConfig;
use crate::types::SchemeError;
use num_traits::Float;

/// Tridiagonal matrix stored as three bands of equal length `n`.
///
/// Row `i` reads `sub[i]·x[i-1] + diag[i]·x[i] + sup[i]·x[i+1]`.
/// `sub[0]` and `sup[n-1]` lie outside the matrix and are ignored.
///
/// # Example
///
/// ```
/// use asian_core::math::solvers::TridiagonalMatrix;
///
/// let m = TridiagonalMatrix::new(
///     vec![0.0, 1.0, 1.0],
///     vec![4.0, 4.0, 4.0],
///     vec![1.0, 1.0, 0.0],
/// )
/// .unwrap();
/// assert_eq!(m.apply(&[1.0, 1.0, 1.0]).unwrap(), vec![5.0, 6.0, 5.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalMatrix<T: Float> {
    sub: Vec<T>,
    diag: Vec<T>,
    sup: Vec<T>,
}

impl<T: Float> TridiagonalMatrix<T> {
    /// Create a matrix from its sub-, main and super-diagonal bands.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::Configuration` if the bands are empty or their
    /// lengths differ.
    pub fn new(sub: Vec<T>, diag: Vec<T>, sup: Vec<T>) -> Result<Self, SchemeError> {
        let n = diag.len();
        if n == 0 {
            return Err(SchemeError::configuration(
                "tridiagonal system must have at least one row",
            ));
        }
        if sub.len() != n || sup.len() != n {
            return Err(SchemeError::configuration(format!(
                "tridiagonal band lengths differ: sub={}, diag={}, sup={}",
                sub.len(),
                n,
                sup.len()
            )));
        }
        Ok(Self { sub, diag, sup })
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.diag.len()
    }

    /// Always false; construction rejects empty bands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diag.is_empty()
    }

    /// Sub-diagonal band.
    #[inline]
    pub fn sub(&self) -> &[T] {
        &self.sub
    }

    /// Main diagonal band.
    #[inline]
    pub fn diag(&self) -> &[T] {
        &self.diag
    }

    /// Super-diagonal band.
    #[inline]
    pub fn sup(&self) -> &[T] {
        &self.sup
    }

    /// Multiply the matrix by `x`.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::Configuration` if `x.len()` differs from the
    /// matrix size.
    pub fn apply(&self, x: &[T]) -> Result<Vec<T>, SchemeError> {
        let n = self.len();
        if x.len() != n {
            return Err(SchemeError::configuration(format!(
                "vector length {} does not match matrix size {}",
                x.len(),
                n
            )));
        }
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let mut acc = self.diag[i] * x[i];
            if i > 0 {
                acc = acc + self.sub[i] * x[i - 1];
            }
            if i + 1 < n {
                acc = acc + self.sup[i] * x[i + 1];
            }
            out.push(acc);
        }
        Ok(out)
    }

    /// Whether every row satisfies `|diag| >= |sub| + |sup|`.
    pub fn is_diagonally_dominant(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| {
            let off_sub = if i > 0 { self.sub[i].abs() } else { T::zero() };
            let off_sup = if i + 1 < n { self.sup[i].abs() } else { T::zero() };
            self.diag[i].abs() >= off_sub + off_sup
        })
    }
}

/// Thomas-algorithm solver for tridiagonal systems.
///
/// Forward elimination followed by back substitution, O(n) time. Every pivot
/// is checked against [`SolverConfig::pivot_tolerance`] so that a singular or
/// ill-conditioned system fails instead of returning garbage.
///
/// # Example
///
/// ```
/// use asian_core::math::solvers::{SolverConfig, TridiagonalMatrix, TridiagonalSolver};
///
/// let solver = TridiagonalSolver::new(SolverConfig::default());
/// let m = TridiagonalMatrix::new(
///     vec![0.0, -1.0, -1.0, -1.0],
///     vec![2.0, 2.0, 2.0, 2.0],
///     vec![-1.0, -1.0, -1.0, 0.0],
/// )
/// .unwrap();
///
/// let x = solver.solve(&m, &[1.0, 0.0, 0.0, 1.0]).unwrap();
/// for xi in x {
///     assert!((xi - 1.0_f64).abs() < 1e-12);
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TridiagonalSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> TridiagonalSolver<T> {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Solve `matrix · x = rhs`.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Solution vector
    /// * `Err(SchemeError::LinearSystem)` - A pivot fell within tolerance of zero
    /// * `Err(SchemeError::Configuration)` - `rhs` length does not match
    pub fn solve(&self, matrix: &TridiagonalMatrix<T>, rhs: &[T]) -> Result<Vec<T>, SchemeError> {
        let n = matrix.len();
        let mut scratch = vec![T::zero(); n];
        let mut out = vec![T::zero(); n];
        self.solve_into(matrix, rhs, &mut scratch, &mut out)?;
        Ok(out)
    }

    /// Solve `matrix · x = rhs` writing `x` into `out`.
    ///
    /// `scratch` holds the modified super-diagonal. Both buffers must have the
    /// matrix length; reusing them across calls keeps a time loop free of
    /// allocation.
    pub fn solve_into(
        &self,
        matrix: &TridiagonalMatrix<T>,
        rhs: &[T],
        scratch: &mut [T],
        out: &mut [T],
    ) -> Result<(), SchemeError> {
        let n = matrix.len();
        if rhs.len() != n || scratch.len() != n || out.len() != n {
            return Err(SchemeError::configuration(format!(
                "buffer lengths (rhs={}, scratch={}, out={}) do not match matrix size {}",
                rhs.len(),
                scratch.len(),
                out.len(),
                n
            )));
        }

        let (a, b, c) = (matrix.sub(), matrix.diag(), matrix.sup());

        // Forward sweep: scratch holds c', out holds d'
        let pivot = self.check_pivot(0, b[0])?;
        scratch[0] = c[0] / pivot;
        out[0] = rhs[0] / pivot;

        for i in 1..n {
            let pivot = self.check_pivot(i, b[i] - a[i] * scratch[i - 1])?;
            scratch[i] = if i + 1 < n { c[i] / pivot } else { T::zero() };
            out[i] = (rhs[i] - a[i] * out[i - 1]) / pivot;
        }

        // Back substitution
        for i in (0..n - 1).rev() {
            out[i] = out[i] - scratch[i] * out[i + 1];
        }

        Ok(())
    }

    #[inline]
    fn check_pivot(&self, row: usize, pivot: T) -> Result<T, SchemeError> {
        // Negated comparison so NaN pivots are rejected as well
        if !(pivot.abs() > self.config.pivot_tolerance) {
            return Err(SchemeError::LinearSystem {
                row,
                pivot: pivot.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(pivot)
    }
}

impl<T: Float> Default for TridiagonalSolver<T> {
    fn default() -> Self {
        Self::with_defaults()
    }
}
