//! Presentation-only post-processing of solution matrices.
//!
//! Nothing here modifies the input matrix. Numerical checks should always
//! run against the unclipped [`SolutionMatrix`].

use asian_core::types::SchemeError;

use crate::grid::Grid;
use crate::solution::SolutionMatrix;

/// Clamps solution values into `[lower, upper]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolutionBounder {
    lower: f64,
    upper: f64,
}

/// A solution matrix after clamping.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundedResult {
    /// Lower clamp bound.
    pub lower: f64,
    /// Upper clamp bound.
    pub upper: f64,
    /// Clamped copy of the input.
    pub matrix: SolutionMatrix,
    /// Number of entries that were moved into range.
    pub clipped: usize,
}

impl SolutionBounder {
    /// Creates a bounder over `[lower, upper]`.
    ///
    /// Infinite bounds are allowed and leave that side open.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::Configuration` if either bound is NaN or
    /// `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, SchemeError> {
        if lower.is_nan() || upper.is_nan() {
            return Err(SchemeError::configuration("clamp bounds must not be NaN"));
        }
        if lower > upper {
            return Err(SchemeError::configuration(format!(
                "clamp lower bound {lower} exceeds upper bound {upper}"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// Lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Clamps every entry of `matrix`.
    pub fn clamp(&self, matrix: &SolutionMatrix) -> BoundedResult {
        let (lower, upper) = (self.lower, self.upper);
        let clipped = matrix
            .as_slice()
            .iter()
            .filter(|&&v| v < lower || v > upper)
            .count();
        BoundedResult {
            lower,
            upper,
            matrix: matrix.map(|v| v.clamp(lower, upper)),
            clipped,
        }
    }
}

/// Sub-grid of the nodes inside a spatial window.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialWindow {
    /// First node index (inclusive) in the source grid.
    pub start: usize,
    /// Last node index (exclusive) in the source grid.
    pub end: usize,
    /// Coordinates of the retained nodes.
    pub x: Vec<f64>,
    /// Retained columns over all time levels.
    pub matrix: SolutionMatrix,
}

/// Restricts `matrix` to the nodes of `grid` with `x_lo <= x <= x_hi`.
///
/// # Errors
///
/// Returns `SchemeError::Configuration` if the bounds are NaN or inverted,
/// the matrix does not match the grid, or no node falls in the window.
pub fn window(
    grid: &Grid,
    matrix: &SolutionMatrix,
    x_lo: f64,
    x_hi: f64,
) -> Result<SpatialWindow, SchemeError> {
    if x_lo.is_nan() || x_hi.is_nan() || x_lo > x_hi {
        return Err(SchemeError::configuration(format!(
            "invalid window [{x_lo}, {x_hi}]"
        )));
    }
    if matrix.nodes() != grid.node_count() {
        return Err(SchemeError::configuration(format!(
            "matrix has {} nodes, grid has {}",
            matrix.nodes(),
            grid.node_count()
        )));
    }

    let x = grid.x();
    let start = x.partition_point(|&v| v < x_lo);
    let end = x.partition_point(|&v| v <= x_hi);
    if start >= end {
        return Err(SchemeError::configuration(format!(
            "window [{x_lo}, {x_hi}] contains no grid nodes"
        )));
    }

    Ok(SpatialWindow {
        start,
        end,
        x: x[start..end].to_vec(),
        matrix: matrix.node_range(start, end),
    })
}
