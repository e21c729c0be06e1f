//! Maps between transformed and financial variables.

use crate::params::EquationVariant;

/// Calendar time `t = T − 2τ/σ²` for transformed time `tau`.
#[inline]
pub fn calendar_time(maturity: f64, tau: f64, volatility: f64) -> f64 {
    maturity - 2.0 * tau / (volatility * volatility)
}

/// Average-normalised ratio `R` at log-coordinate `x`.
///
/// `R = e^x·T` for H and `R = e^x/T` for W.
#[inline]
pub fn average_ratio(variant: EquationVariant, maturity: f64, x: f64) -> f64 {
    match variant {
        EquationVariant::H => x.exp() * maturity,
        EquationVariant::W => x.exp() / maturity,
    }
}

/// Rescales a normalised value by the strike.
#[inline]
pub fn monetary_value(strike: f64, u: f64) -> f64 {
    strike * u
}
