//! Numerical building blocks.
//!
//! - [`solvers`]: Tridiagonal systems and the Thomas algorithm

pub mod solvers;
