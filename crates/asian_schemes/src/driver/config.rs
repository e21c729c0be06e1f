//! Study configuration.
//!
//! A study runs every enabled (scheme, option) pair for each configured
//! equation variant. The configuration is plain serde data; loading it from
//! a file is left to the caller.

use asian_core::types::SchemeError;
use serde::{Deserialize, Serialize};

use crate::grid::MIN_NODES;
use crate::params::{EquationVariant, OptionKind, ProblemParameters};
use crate::schemes::SchemeKind;

/// Top-level study configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Run independent combinations on the rayon pool
    #[serde(default)]
    pub parallel: bool,

    /// Fill explicit levels in parallel
    #[serde(default)]
    pub parallel_fill: bool,

    /// H formulation settings
    #[serde(default)]
    pub equation_h: Option<EquationConfig>,

    /// W formulation settings
    #[serde(default)]
    pub equation_w: Option<EquationConfig>,
}

/// Settings for one equation variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationConfig {
    /// Volatility σ
    pub volatility: f64,

    /// Risk-free rate r
    #[serde(default)]
    pub rate: f64,

    /// Strike K
    pub strike: f64,

    /// Maturity T
    pub maturity: f64,

    /// Lower spatial bound
    pub x_min: f64,

    /// Upper spatial bound
    pub x_max: f64,

    /// Spatial node count N
    pub nodes: usize,

    /// Time step count M
    pub steps: usize,

    /// Schemes to run
    #[serde(default = "default_schemes")]
    pub schemes: Vec<SchemeKind>,

    /// Option kinds to run
    #[serde(default = "default_options")]
    pub options: Vec<OptionKind>,

    /// Rebuild the explicit grid with enough steps to satisfy the stability bound
    #[serde(default)]
    pub refine_unstable_steps: bool,

    /// Presentation bounds per (scheme, option)
    #[serde(default)]
    pub bounds: Vec<BoundsConfig>,
}

fn default_schemes() -> Vec<SchemeKind> {
    vec![SchemeKind::Explicit, SchemeKind::CrankNicolson]
}

fn default_options() -> Vec<OptionKind> {
    vec![OptionKind::Call, OptionKind::Put]
}

/// Presentation bounds for one (scheme, option) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundsConfig {
    /// Scheme the bounds apply to
    pub scheme: SchemeKind,

    /// Option kind the bounds apply to
    pub option: OptionKind,

    /// Value range `[lower, upper]` to clamp into
    #[serde(default)]
    pub clamp: Option<[f64; 2]>,

    /// Spatial range `[x_lo, x_hi]` to keep
    #[serde(default)]
    pub window: Option<[f64; 2]>,
}

impl EquationConfig {
    /// Problem parameters for one option kind.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::Configuration` for out-of-range values.
    pub fn parameters(
        &self,
        variant: EquationVariant,
        option: OptionKind,
    ) -> Result<ProblemParameters, SchemeError> {
        ProblemParameters::builder()
            .variant(variant)
            .option(option)
            .volatility(self.volatility)
            .rate(self.rate)
            .strike(self.strike)
            .maturity(self.maturity)
            .domain(self.x_min, self.x_max)
            .build()
    }

    /// Bounds configured for `(scheme, option)`, if any.
    pub fn bounds_for(&self, scheme: SchemeKind, option: OptionKind) -> Option<&BoundsConfig> {
        self.bounds
            .iter()
            .find(|b| b.scheme == scheme && b.option == option)
    }

    fn collect_errors(&self, variant: EquationVariant, errors: &mut Vec<String>) {
        if self.nodes < MIN_NODES {
            errors.push(format!(
                "equation_{}: nodes must be >= {MIN_NODES}, got {}",
                variant.as_str().to_lowercase(),
                self.nodes
            ));
        }
        if self.steps == 0 {
            errors.push(format!(
                "equation_{}: steps must be >= 1",
                variant.as_str().to_lowercase()
            ));
        }
        if self.schemes.is_empty() {
            errors.push(format!(
                "equation_{}: schemes cannot be empty",
                variant.as_str().to_lowercase()
            ));
        }
        if self.options.is_empty() {
            errors.push(format!(
                "equation_{}: options cannot be empty",
                variant.as_str().to_lowercase()
            ));
        }

        for (i, b) in self.bounds.iter().enumerate() {
            let label = format!(
                "equation_{}.bounds[{i}] ({} {})",
                variant.as_str().to_lowercase(),
                b.scheme,
                b.option
            );
            if self.bounds[..i]
                .iter()
                .any(|o| o.scheme == b.scheme && o.option == b.option)
            {
                errors.push(format!("{label}: duplicate entry"));
            }
            if let Some([lo, hi]) = b.clamp {
                if lo.is_nan() || hi.is_nan() || lo > hi {
                    errors.push(format!("{label}: invalid clamp range [{lo}, {hi}]"));
                }
            }
            if let Some([lo, hi]) = b.window {
                if lo.is_nan() || hi.is_nan() || lo > hi {
                    errors.push(format!("{label}: invalid window [{lo}, {hi}]"));
                }
            }
        }
    }
}

impl StudyConfig {
    /// Configured equations in variant order.
    pub fn equations(&self) -> impl Iterator<Item = (EquationVariant, &EquationConfig)> {
        [
            (EquationVariant::H, self.equation_h.as_ref()),
            (EquationVariant::W, self.equation_w.as_ref()),
        ]
        .into_iter()
        .filter_map(|(v, eq)| eq.map(|eq| (v, eq)))
    }

    /// Settings for `variant`, if configured.
    pub fn equation(&self, variant: EquationVariant) -> Option<&EquationConfig> {
        match variant {
            EquationVariant::H => self.equation_h.as_ref(),
            EquationVariant::W => self.equation_w.as_ref(),
        }
    }

    /// Validates the study layout.
    ///
    /// Every problem is collected before returning. Numeric model parameters
    /// (σ, r, K, T, domain) are checked later, per run, so that one bad
    /// equation section cannot block the other.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::Configuration` listing every problem found.
    pub fn validate(&self) -> Result<(), SchemeError> {
        let mut errors = Vec::new();

        if self.equation_h.is_none() && self.equation_w.is_none() {
            errors.push("at least one of equation_h or equation_w must be configured".to_string());
        }
        for (variant, eq) in self.equations() {
            eq.collect_errors(variant, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemeError::configuration(errors.join("; ")))
        }
    }
}
