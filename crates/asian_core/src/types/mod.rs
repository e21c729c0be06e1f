//! Core error types.
//!
//! This module provides:
//! - `error`: Structured error taxonomy shared by grid construction, the
//!   stepping schemes and the tridiagonal solver
//!
//! # Re-exports
//!
//! For convenience, [`SchemeError`] and [`SchemeErrorKind`] are re-exported
//! at this module level.

pub mod error;

pub use error::{SchemeError, SchemeErrorKind};
