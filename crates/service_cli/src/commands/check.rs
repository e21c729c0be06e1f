//! Check command implementation
//!
//! Validates the configuration and prints the planned runs without solving.

use std::path::Path;

use asian_schemes::driver::{plan, EquationConfig, RunSpec};
use asian_schemes::grid::GridBuilder;
use asian_schemes::schemes::{ExplicitScheme, SchemeKind};
use tracing::info;

use crate::Result;

/// Run the check command
pub fn run(config_path: &Path) -> Result<()> {
    let config = super::load_config(config_path)?;
    info!("Configuration OK: {}", config_path.display());

    let specs = plan(&config.study);
    println!("{} planned runs:", specs.len());
    for spec in &specs {
        let Some(eq) = config.study.equation(spec.variant) else {
            continue;
        };
        let note = if spec.scheme == SchemeKind::Explicit {
            stability_note(eq, spec)
        } else {
            String::new()
        };
        println!(
            "  {:<26} nodes={:<6} steps={:<8} {}",
            spec.label(),
            eq.nodes,
            eq.steps,
            note
        );
    }
    Ok(())
}

/// Explicit stability margin, or the reason the run cannot start.
fn stability_note(eq: &EquationConfig, spec: &RunSpec) -> String {
    let grid = eq.parameters(spec.variant, spec.option).and_then(|params| {
        let grid = GridBuilder::for_problem(&params)
            .nodes(eq.nodes)
            .steps(eq.steps)
            .build()?;
        Ok((ExplicitScheme::max_stable_step(&params, &grid), grid))
    });
    let (bound, grid) = match grid {
        Ok(pair) => pair,
        Err(e) => return format!("invalid: {e}"),
    };

    if grid.dt() <= bound {
        format!("stable (dt={:.3e} <= {:.3e})", grid.dt(), bound)
    } else if eq.refine_unstable_steps {
        format!("refines to {} steps", (grid.horizon() / bound).ceil())
    } else {
        format!("UNSTABLE (dt={:.3e} > {:.3e})", grid.dt(), bound)
    }
}
