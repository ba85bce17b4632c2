//! Error types shared by the localization stack

use thiserror::Error;

use crate::lifecycle::State;

/// Errors raised while building grids or updating beliefs
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocalizationError {
    #[error("Degenerate grid: {height}x{width} (both dimensions must be positive)")]
    DegenerateGrid { height: usize, width: usize },

    #[error("Grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Grid of {height}x{width} needs {expected} cells, got {found}")]
    CellCount {
        height: usize,
        width: usize,
        expected: usize,
        found: usize,
    },

    #[error("Cell ({row}, {col}) is outside the {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("Shape mismatch: expected {}x{}, found {}x{}", .expected.0, .expected.1, .found.0, .found.1)]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Zero evidence: total weight {total} is not positive")]
    ZeroEvidence { total: f64 },

    #[error("Negative weight {value} at cell ({row}, {col})")]
    NegativeWeight { row: usize, col: usize, value: f64 },

    #[error("Non-finite evidence: total weight is {total}")]
    NonFiniteEvidence { total: f64 },

    #[error("Invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Component is not active (state: {state:?})")]
    NotActive { state: State },

    #[error("Invalid lifecycle transition from {from:?} to {to:?}")]
    InvalidTransition { from: State, to: State },
}

/// Result alias for localization operations
pub type Result<T> = std::result::Result<T, LocalizationError>;
