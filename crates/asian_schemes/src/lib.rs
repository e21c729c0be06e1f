//! # asian_schemes (L2: Scheme Engine)
//!
//! Finite-difference solvers for the H and W formulations of the Asian-option
//! pricing PDE in transformed variables `(x, τ)`.
//!
//! This crate provides:
//! - Validated problem parameters and uniform space-time grids
//! - Analytic far-field boundary values and transformed payoffs
//! - Explicit (FTCS) and Crank-Nicolson time stepping
//! - Presentation-only clamping and spatial windowing of results
//! - A study driver running independent (variant, scheme, option) combinations
//!
//! ## Design Principles
//!
//! - **Builders validate up front**: no stepping starts on an invalid grid
//! - **Runs are isolated**: every failure is a `SchemeError` local to one run
//! - **The engine is silent**: only the `driver` module emits `tracing` events
//!
//! ## Usage Examples
//!
//! ```rust
//! use asian_schemes::grid::GridBuilder;
//! use asian_schemes::initial::InitialCondition;
//! use asian_schemes::params::{EquationVariant, OptionKind, ProblemParameters};
//! use asian_schemes::schemes::{CrankNicolsonScheme, FiniteDifferenceScheme};
//!
//! let params = ProblemParameters::builder()
//!     .variant(EquationVariant::W)
//!     .option(OptionKind::Put)
//!     .volatility(0.2)
//!     .rate(0.05)
//!     .strike(100.0)
//!     .maturity(1.0)
//!     .domain(-1.0, 1.0)
//!     .build()
//!     .unwrap();
//! let grid = GridBuilder::for_problem(&params).nodes(101).steps(50).build().unwrap();
//!
//! let result = CrankNicolsonScheme::new()
//!     .solve_result(&params, &grid, &InitialCondition::Payoff)
//!     .unwrap();
//! assert_eq!(result.matrix.levels(), 51);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod boundary;
pub mod bounder;
pub mod coefficients;
pub mod driver;
pub mod grid;
pub mod initial;
pub mod params;
pub mod schemes;
pub mod solution;
pub mod transform;

pub use asian_core::types::{SchemeError, SchemeErrorKind};
