use thiserror::Error;

/// Errors raised by the world model and its observation inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("agent not found: the agent grid has no occupied cell")]
    AgentNotFound,

    #[error("agent grid has {0} occupied cells, expected exactly one")]
    MultipleAgents(usize),

    #[error("grid has no cells")]
    EmptyGrid,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{grid} grid is {found_height}x{found_width}, expected {height}x{width}")]
    GridShapeMismatch {
        grid: &'static str,
        height: usize,
        width: usize,
        found_height: usize,
        found_width: usize,
    },

    #[error("invalid level character {ch:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, ch: char },

    #[error("cell ({row}, {col}) lies outside the grid")]
    OutOfBounds { row: isize, col: isize },

    #[error("invalid outcome value: {0}")]
    InvalidOutcome(i8),
}

/// Convenience Result type for world model operations
pub type Result<T> = std::result::Result<T, PlannerError>;
