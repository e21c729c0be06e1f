//! Linear solvers for the finite-difference schemes.
//!
//! ## Available Solvers
//!
//! - [`TridiagonalSolver`]: Thomas algorithm (forward elimination, back
//!   substitution) with pivot checking
//!
//! ## Configuration
//!
//! [`SolverConfig`] sets `pivot_tolerance` (default: 1e-14), the smallest
//! pivot magnitude accepted during elimination.
//!
//! ## Examples
//!
//! ```
//! use asian_core::math::solvers::{TridiagonalMatrix, TridiagonalSolver};
//!
//! let m = TridiagonalMatrix::new(
//!     vec![0.0, 1.0, 1.0],
//!     vec![4.0, 4.0, 4.0],
//!     vec![1.0, 1.0, 0.0],
//! )
//! .unwrap();
//!
//! let d = m.apply(&[1.0, 2.0, 3.0]).unwrap();
//! let x = TridiagonalSolver::with_defaults().solve(&m, &d).unwrap();
//! assert!((x[2] - 3.0_f64).abs() < 1e-12);
//! ```

mod config;
mod tridiagonal;

// Re-export public types at module level
pub use config::SolverConfig;
pub use tridiagonal::{TridiagonalMatrix, TridiagonalSolver};
