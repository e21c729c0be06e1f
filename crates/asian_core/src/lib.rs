//! # asian_core: Foundation for the Asian-option PDE engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! asian_core is the bottom layer of the workspace, providing:
//! - Error types: `SchemeError`, `SchemeErrorKind` (`types::error`)
//! - Tridiagonal linear systems and the Thomas solver (`math::solvers`)
//! - Solver tolerance configuration (`math::solvers::SolverConfig`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use asian_core::math::solvers::{TridiagonalMatrix, TridiagonalSolver};
//!
//! // [ 2 -1  0 ]       [1]
//! // [-1  2 -1 ] x  =  [0]
//! // [ 0 -1  2 ]       [1]
//! let matrix = TridiagonalMatrix::new(
//!     vec![0.0, -1.0, -1.0],
//!     vec![2.0, 2.0, 2.0],
//!     vec![-1.0, -1.0, 0.0],
//! )
//! .unwrap();
//!
//! let solver = TridiagonalSolver::with_defaults();
//! let x = solver.solve(&matrix, &[1.0, 0.0, 1.0]).unwrap();
//! # assert!((x[1] - 1.0_f64).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `SchemeErrorKind`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
