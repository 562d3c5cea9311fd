use mazemind_core::CellCoord;
use mazemind_graph::GraphError;

/// Errors raised by maze topology operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("maze size must be at least 1x1 (got {width}x{height})")]
    InvalidSize { width: u32, height: u32 },

    #[error("cell {0} is outside the maze")]
    OutOfBounds(CellCoord),

    #[error("the exit has not been placed yet")]
    ExitNotPlaced,

    #[error("the maze has no leaf cell to start from")]
    NoLeaf,

    #[error("cell {0} has no interior path edge to rewire (already at the exit)")]
    NoInteriorEdge(CellCoord),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}
