//! Study orchestration.
//!
//! Expands a [`StudyConfig`] into independent (variant, scheme, option) runs,
//! executes them sequentially or on the rayon pool, and records each outcome
//! without letting one failure affect its siblings.
//!
//! This is the only part of the crate that emits `tracing` events; the
//! subscriber is installed by the binary.

mod config;
mod runner;

pub use config::{BoundsConfig, EquationConfig, StudyConfig};
pub use runner::{plan, run_single, run_study, RunArtifacts, RunOutcome, RunSpec, StudyReport};
