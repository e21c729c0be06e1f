//! Problem parameters for the transformed Asian-option PDEs.
//!
//! [`ProblemParameters`] is immutable once built. Use
//! [`ProblemParameters::builder`] to construct and validate an instance.

use asian_core::types::SchemeError;
use serde::{Deserialize, Serialize};

/// Equation formulation.
///
/// Both formulations share the scheme machinery; they differ only in the
/// transform of the average-normalised ratio and hence in their coefficients,
/// payoffs and far-field limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquationVariant {
    /// H formulation, ratio `R = e^x · T`.
    H,
    /// W formulation, ratio `R = e^x / T`.
    W,
}

impl EquationVariant {
    /// Short label used in file names and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EquationVariant::H => "H",
            EquationVariant::W => "W",
        }
    }
}

impl std::fmt::Display for EquationVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Call option.
    Call,
    /// Put option.
    Put,
}

impl OptionKind {
    /// Lower-case label used in file names and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Call => "call",
            OptionKind::Put => "put",
        }
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated problem parameters.
///
/// # Examples
///
/// ```rust
/// use asian_schemes::params::{EquationVariant, OptionKind, ProblemParameters};
///
/// let params = ProblemParameters::builder()
///     .variant(EquationVariant::H)
///     .option(OptionKind::Call)
///     .volatility(0.2)
///     .rate(0.05)
///     .strike(100.0)
///     .maturity(1.0)
///     .domain(-1.0, 1.0)
///     .build()
///     .unwrap();
///
/// assert!((params.tau_max() - 0.02).abs() < 1e-15);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemParameters {
    variant: EquationVariant,
    option: OptionKind,
    volatility: f64,
    rate: f64,
    strike: f64,
    maturity: f64,
    x_min: f64,
    x_max: f64,
}

impl ProblemParameters {
    /// Creates a new parameter builder.
    #[inline]
    pub fn builder() -> ProblemParametersBuilder {
        ProblemParametersBuilder::default()
    }

    /// Equation formulation.
    #[inline]
    pub fn variant(&self) -> EquationVariant {
        self.variant
    }

    /// Option kind.
    #[inline]
    pub fn option(&self) -> OptionKind {
        self.option
    }

    /// Volatility σ.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Risk-free rate r.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Strike K.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Maturity T.
    #[inline]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Lower spatial bound.
    #[inline]
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Upper spatial bound.
    #[inline]
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Transformed-time horizon `τ_max = σ²T/2`.
    #[inline]
    pub fn tau_max(&self) -> f64 {
        0.5 * self.volatility * self.volatility * self.maturity
    }

    /// Copy of these parameters for another equation variant.
    pub fn with_variant(&self, variant: EquationVariant) -> Self {
        Self {
            variant,
            ..self.clone()
        }
    }

    /// Copy of these parameters for another option kind.
    pub fn with_option(&self, option: OptionKind) -> Self {
        Self {
            option,
            ..self.clone()
        }
    }
}

/// Builder for [`ProblemParameters`].
///
/// `volatility`, `strike`, `maturity` and `domain` are required. The variant
/// defaults to H, the option to a call and the rate to zero.
#[derive(Clone, Debug, Default)]
pub struct ProblemParametersBuilder {
    variant: Option<EquationVariant>,
    option: Option<OptionKind>,
    volatility: Option<f64>,
    rate: Option<f64>,
    strike: Option<f64>,
    maturity: Option<f64>,
    domain: Option<(f64, f64)>,
}

impl ProblemParametersBuilder {
    /// Sets the equation variant.
    #[inline]
    pub fn variant(mut self, variant: EquationVariant) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Sets the option kind.
    #[inline]
    pub fn option(mut self, option: OptionKind) -> Self {
        self.option = Some(option);
        self
    }

    /// Sets the volatility σ (must be positive).
    #[inline]
    pub fn volatility(mut self, volatility: f64) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Sets the risk-free rate r.
    #[inline]
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the strike K (must be positive).
    #[inline]
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Sets the maturity T (must be positive).
    #[inline]
    pub fn maturity(mut self, maturity: f64) -> Self {
        self.maturity = Some(maturity);
        self
    }

    /// Sets the spatial domain `[x_min, x_max]`.
    #[inline]
    pub fn domain(mut self, x_min: f64, x_max: f64) -> Self {
        self.domain = Some((x_min, x_max));
        self
    }

    /// Builds and validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::Configuration` if a required field is missing,
    /// σ, K or T are not positive and finite, r is not finite, or the domain
    /// bounds are non-finite or inverted.
    pub fn build(self) -> Result<ProblemParameters, SchemeError> {
        let volatility = require(self.volatility, "volatility")?;
        let strike = require(self.strike, "strike")?;
        let maturity = require(self.maturity, "maturity")?;
        let (x_min, x_max) = require(self.domain, "domain")?;
        let rate = self.rate.unwrap_or(0.0);

        positive("volatility", volatility)?;
        positive("strike", strike)?;
        positive("maturity", maturity)?;
        if !rate.is_finite() {
            return Err(SchemeError::configuration(format!(
                "rate must be finite, got {rate}"
            )));
        }
        if !x_min.is_finite() || !x_max.is_finite() {
            return Err(SchemeError::configuration(format!(
                "domain bounds must be finite, got [{x_min}, {x_max}]"
            )));
        }
        if x_min >= x_max {
            return Err(SchemeError::configuration(format!(
                "x_min must be < x_max, got [{x_min}, {x_max}]"
            )));
        }

        Ok(ProblemParameters {
            variant: self.variant.unwrap_or(EquationVariant::H),
            option: self.option.unwrap_or(OptionKind::Call),
            volatility,
            rate,
            strike,
            maturity,
            x_min,
            x_max,
        })
    }
}

fn require<T>(value: Option<T>, name: &str) -> Result<T, SchemeError> {
    value.ok_or_else(|| SchemeError::configuration(format!("{name} is required")))
}

fn positive(name: &str, value: f64) -> Result<(), SchemeError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SchemeError::configuration(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ProblemParametersBuilder {
        ProblemParameters::builder()
            .volatility(0.2)
            .rate(0.05)
            .strike(100.0)
            .maturity(1.0)
            .domain(-1.0, 1.0)
    }

    #[test]
    fn test_defaults() {
        let p = base().build().unwrap();
        assert_eq!(p.variant(), EquationVariant::H);
        assert_eq!(p.option(), OptionKind::Call);
        assert_eq!(p.strike(), 100.0);
    }

    #[test]
    fn test_rate_defaults_to_zero() {
        let p = ProblemParameters::builder()
            .volatility(0.3)
            .strike(1.0)
            .maturity(2.0)
            .domain(0.0, 1.0)
            .build()
            .unwrap();
        assert_eq!(p.rate(), 0.0);
    }

    #[test]
    fn test_tau_max() {
        let p = base().volatility(0.4).maturity(2.0).build().unwrap();
        assert!((p.tau_max() - 0.16).abs() < 1e-15);
    }

    #[test]
    fn test_missing_volatility() {
        let err = ProblemParameters::builder()
            .strike(1.0)
            .maturity(1.0)
            .domain(0.0, 1.0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("volatility is required"));
    }

    #[test]
    fn test_non_positive_volatility_rejected() {
        for sigma in [0.0, -0.2, f64::NAN, f64::INFINITY] {
            let err = base().volatility(sigma).build().unwrap_err();
            assert!(matches!(err, SchemeError::Configuration(_)), "σ = {sigma}");
        }
    }

    #[test]
    fn test_non_positive_strike_and_maturity_rejected() {
        assert!(base().strike(0.0).build().is_err());
        assert!(base().maturity(-1.0).build().is_err());
    }

    #[test]
    fn test_negative_rate_allowed() {
        assert!(base().rate(-0.01).build().is_ok());
        assert!(base().rate(f64::NAN).build().is_err());
    }

    #[test]
    fn test_inverted_domain_rejected() {
        let err = base().domain(1.0, -1.0).build().unwrap_err();
        assert!(err.to_string().contains("x_min must be < x_max"));
        assert!(base().domain(0.5, 0.5).build().is_err());
        assert!(base().domain(f64::NEG_INFINITY, 0.0).build().is_err());
    }

    #[test]
    fn test_with_variant_and_option_copy() {
        let p = base().build().unwrap();
        let q = p.with_variant(EquationVariant::W).with_option(OptionKind::Put);
        assert_eq!(q.variant(), EquationVariant::W);
        assert_eq!(q.option(), OptionKind::Put);
        assert_eq!(q.volatility(), p.volatility());
        assert_eq!(p.variant(), EquationVariant::H);
    }

    #[test]
    fn test_labels() {
        assert_eq!(EquationVariant::W.to_string(), "W");
        assert_eq!(OptionKind::Put.to_string(), "put");
    }
}
