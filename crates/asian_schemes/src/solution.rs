//! Solution storage and the stepping state machine shared by both schemes.

use asian_core::types::SchemeError;

use crate::grid::Grid;
use crate::params::{EquationVariant, OptionKind};
use crate::schemes::SchemeKind;

/// Values `u(x_i, τ_n)` in one contiguous, time-major buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct SolutionMatrix {
    nodes: usize,
    levels: usize,
    data: Vec<f64>,
}

impl SolutionMatrix {
    /// Builds a matrix from time-major data.
    ///
    /// # Errors
    ///
    /// Returns `SchemeError::Configuration` if `data.len() != nodes * levels`
    /// or either dimension is zero.
    pub fn from_time_major(nodes: usize, levels: usize, data: Vec<f64>) -> Result<Self, SchemeError> {
        if nodes == 0 || levels == 0 || data.len() != nodes * levels {
            return Err(SchemeError::configuration(format!(
                "solution data of length {} does not match {nodes} nodes x {levels} levels",
                data.len()
            )));
        }
        Ok(Self { nodes, levels, data })
    }

    /// Number of spatial nodes.
    #[inline]
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// Number of time levels.
    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Value at spatial index `node` and time index `level`.
    #[inline]
    pub fn value(&self, node: usize, level: usize) -> f64 {
        assert!(node < self.nodes, "node {node} out of range");
        self.data[level * self.nodes + node]
    }

    /// All nodes at one time level.
    #[inline]
    pub fn level(&self, level: usize) -> &[f64] {
        &self.data[level * self.nodes..(level + 1) * self.nodes]
    }

    /// One node across all time levels.
    pub fn column(&self, node: usize) -> Vec<f64> {
        assert!(node < self.nodes, "node {node} out of range");
        self.data.iter().skip(node).step_by(self.nodes).copied().collect()
    }

    /// Time-major backing buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Final time level.
    #[inline]
    pub fn last_level(&self) -> &[f64] {
        self.level(self.levels - 1)
    }

    /// Largest absolute entry-wise difference to `other`.
    ///
    /// Returns `None` if the shapes differ.
    pub fn max_abs_diff(&self, other: &SolutionMatrix) -> Option<f64> {
        if self.nodes != other.nodes || self.levels != other.levels {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
        )
    }

    pub(crate) fn map(&self, f: impl Fn(f64) -> f64) -> SolutionMatrix {
        SolutionMatrix {
            nodes: self.nodes,
            levels: self.levels,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    pub(crate) fn node_range(&self, start: usize, end: usize) -> SolutionMatrix {
        let width = end - start;
        let mut data = Vec::with_capacity(width * self.levels);
        for n in 0..self.levels {
            data.extend_from_slice(&self.level(n)[start..end]);
        }
        SolutionMatrix {
            nodes: width,
            levels: self.levels,
            data,
        }
    }
}

/// Lifecycle of one scheme run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemeState {
    /// Level 0 populated, no step taken.
    Initialized,
    /// `level` is the last level computed.
    Stepping {
        /// Last completed time index.
        level: usize,
    },
    /// All levels computed and finite.
    Complete,
    /// A step failed; the matrix is incomplete.
    Failed,
}

/// Drives a [`SolutionMatrix`] through [`SchemeState`].
///
/// Levels are filled strictly in order. Each new level is checked for
/// non-finite entries before the next one may be computed.
#[derive(Debug)]
pub(crate) struct Stepper {
    nodes: usize,
    levels: usize,
    data: Vec<f64>,
    state: SchemeState,
}

impl Stepper {
    /// Allocates the full matrix and copies `initial` into level 0.
    pub(crate) fn new(grid: &Grid, initial: &[f64]) -> Self {
        let nodes = grid.node_count();
        let levels = grid.level_count();
        debug_assert_eq!(initial.len(), nodes);
        let mut data = vec![0.0; nodes * levels];
        data[..nodes].copy_from_slice(initial);
        Self {
            nodes,
            levels,
            data,
            state: SchemeState::Initialized,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> SchemeState {
        self.state
    }

    /// Index of the next level to compute, if any.
    fn next_level(&self) -> Option<usize> {
        match self.state {
            SchemeState::Initialized => Some(1),
            SchemeState::Stepping { level } => Some(level + 1),
            SchemeState::Complete | SchemeState::Failed => None,
        }
    }

    /// Computes the next level with `fill(level, previous, next)`.
    ///
    /// `fill` must write every entry of `next`. A fill error or a non-finite
    /// entry moves the run to [`SchemeState::Failed`].
    pub(crate) fn advance<F>(&mut self, fill: F) -> Result<(), SchemeError>
    where
        F: FnOnce(usize, &[f64], &mut [f64]) -> Result<(), SchemeError>,
    {
        let level = self
            .next_level()
            .filter(|&l| l < self.levels)
            .ok_or_else(|| SchemeError::configuration("no remaining time levels to compute"))?;

        let (done, rest) = self.data.split_at_mut(level * self.nodes);
        let previous = &done[(level - 1) * self.nodes..];
        let next = &mut rest[..self.nodes];

        if let Err(err) = fill(level, previous, next) {
            self.state = SchemeState::Failed;
            return Err(err);
        }
        if let Some(node) = next.iter().position(|v| !v.is_finite()) {
            self.state = SchemeState::Failed;
            return Err(SchemeError::NumericalDivergence {
                node,
                level,
                value: next[node],
            });
        }

        self.state = if level + 1 == self.levels {
            SchemeState::Complete
        } else {
            SchemeState::Stepping { level }
        };
        Ok(())
    }

    /// Runs `fill` until every level is computed.
    pub(crate) fn run<F>(mut self, mut fill: F) -> Result<SolutionMatrix, SchemeError>
    where
        F: FnMut(usize, &[f64], &mut [f64]) -> Result<(), SchemeError>,
    {
        while self.state != SchemeState::Complete {
            self.advance(&mut fill)?;
        }
        self.finish()
    }

    /// Releases the matrix of a completed run.
    pub(crate) fn finish(self) -> Result<SolutionMatrix, SchemeError> {
        if self.state != SchemeState::Complete {
            return Err(SchemeError::configuration(format!(
                "solution requested in state {:?}",
                self.state
            )));
        }
        SolutionMatrix::from_time_major(self.nodes, self.levels, self.data)
    }
}

/// Output of one completed run.
#[derive(Clone, Debug)]
pub struct SolveResult {
    /// Equation formulation.
    pub variant: EquationVariant,
    /// Option kind.
    pub option: OptionKind,
    /// Time-stepping scheme.
    pub scheme: SchemeKind,
    /// Grid the matrix is defined on.
    pub grid: Grid,
    /// Unclipped solution.
    pub matrix: SolutionMatrix,
}
