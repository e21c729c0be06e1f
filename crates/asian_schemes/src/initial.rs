//! Initial conditions (time level 0).

use asian_core::types::SchemeError;

use crate::grid::Grid;
use crate::params::{EquationVariant, OptionKind, ProblemParameters};

/// Values placed at time level 0.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum InitialCondition {
    /// Transformed payoff of the run's variant and option kind.
    #[default]
    Payoff,
    /// Explicit values, one per spatial node.
    Values(Vec<f64>),
}

impl InitialCondition {
    /// Materialises the level-0 slice for `grid`.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::Configuration` if explicit values do not have one
    /// entry per node or contain non-finite entries.
    pub fn resolve(&self, params: &ProblemParameters, grid: &Grid) -> Result<Vec<f64>, SchemeError> {
        match self {
            InitialCondition::Payoff => Ok(grid.x().iter().map(|&x| payoff(params, x)).collect()),
            InitialCondition::Values(values) => {
                if values.len() != grid.node_count() {
                    return Err(SchemeError::configuration(format!(
                        "initial condition has {} values, grid has {} nodes",
                        values.len(),
                        grid.node_count()
                    )));
                }
                if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                    return Err(SchemeError::configuration(format!(
                        "initial condition value {} at node {i} is not finite",
                        values[i]
                    )));
                }
                Ok(values.clone())
            }
        }
    }
}

/// Transformed payoff at `x`.
pub fn payoff(params: &ProblemParameters, x: f64) -> f64 {
    let ex = x.exp();
    match (params.variant(), params.option()) {
        (EquationVariant::H, OptionKind::Call) | (EquationVariant::W, OptionKind::Put) => {
            (1.0 - ex).max(0.0)
        }
        (EquationVariant::H, OptionKind::Put) | (EquationVariant::W, OptionKind::Call) => {
            (ex - 1.0).max(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridBuilder;

    fn setup(variant: EquationVariant, option: OptionKind) -> (ProblemParameters, Grid) {
        let p = ProblemParameters::builder()
            .variant(variant)
            .option(option)
            .volatility(0.2)
            .strike(1.0)
            .maturity(1.0)
            .domain(-1.0, 1.0)
            .build()
            .unwrap();
        let grid = GridBuilder::for_problem(&p).nodes(5).steps(2).build().unwrap();
        (p, grid)
    }

    #[test]
    fn test_h_call_payoff() {
        let (p, grid) = setup(EquationVariant::H, OptionKind::Call);
        let v = InitialCondition::Payoff.resolve(&p, &grid).unwrap();
        assert_eq!(v[0], 1.0 - (-1.0f64).exp());
        assert_eq!(v[2], 0.0);
        assert_eq!(v[4], 0.0);
    }

    #[test]
    fn test_w_call_mirrors_h_put() {
        let (ph, grid) = setup(EquationVariant::H, OptionKind::Put);
        let pw = ph.with_variant(EquationVariant::W).with_option(OptionKind::Call);
        let h = InitialCondition::Payoff.resolve(&ph, &grid).unwrap();
        let w = InitialCondition::Payoff.resolve(&pw, &grid).unwrap();
        assert_eq!(h, w);
        assert_eq!(w[0], 0.0);
        assert!(w[4] > 1.7);
    }

    #[test]
    fn test_payoff_is_non_negative() {
        for variant in [EquationVariant::H, EquationVariant::W] {
            for option in [OptionKind::Call, OptionKind::Put] {
                let (p, grid) = setup(variant, option);
                let v = InitialCondition::Payoff.resolve(&p, &grid).unwrap();
                assert!(v.iter().all(|&u| u >= 0.0));
            }
        }
    }

    #[test]
    fn test_explicit_values_copied_verbatim() {
        let (p, grid) = setup(EquationVariant::H, OptionKind::Call);
        let values = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        let v = InitialCondition::Values(values.clone()).resolve(&p, &grid).unwrap();
        assert_eq!(v, values);
    }

    #[test]
    fn test_explicit_values_length_mismatch() {
        let (p, grid) = setup(EquationVariant::H, OptionKind::Call);
        let err = InitialCondition::Values(vec![0.0; 4]).resolve(&p, &grid).unwrap_err();
        assert!(matches!(err, SchemeError::Configuration(_)));
    }

    #[test]
    fn test_explicit_values_non_finite() {
        let (p, grid) = setup(EquationVariant::H, OptionKind::Call);
        let err = InitialCondition::Values(vec![0.0, 0.0, f64::NAN, 0.0, 0.0])
            .resolve(&p, &grid)
            .unwrap_err();
        assert!(err.to_string().contains("node 2"));
    }
}
