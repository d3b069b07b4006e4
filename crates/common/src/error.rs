use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The weight matrix cannot hold both a start and an end vertex.
    #[error("Weight matrix needs at least 2 vertices, got {0}.")]
    MatrixTooSmall(usize),

    #[error("Weight matrix is not square: row {row} has {len} entries, expected {expected}.")]
    NonSquareMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },

    /// Indicates an attempt to access a vertex index that exceeds the graph size (V).
    #[error("Node index {0} is out of bounds.")]
    NodeIndexOutOfBounds(usize),

    /// Indicates a structural inconsistency found during graph processing.
    #[error("Graph structure is invalid or inconsistent.")]
    InvalidGraph,

    /// Failed to trace the full cycle, usually due to a broken predecessor chain.
    #[error("Cycle path reconstruction failed due to broken predecessor chain.")]
    CycleReconstructionFailed,

    /// The predecessor chain towards a vertex never reached the source.
    #[error("Path reconstruction to vertex {0} failed: predecessor chain does not reach the source.")]
    PathReconstructionFailed(usize),

    #[error("No path from vertex {from} to vertex {to}.")]
    Unreachable { from: usize, to: usize },

    #[error("Path cost fell below the minimum of the weight type.")]
    CostOverflow,

    /// The search clock ran out before the given subset size was examined.
    #[error("Search deadline exceeded before subsets of size {0} were examined.")]
    DeadlineExceeded(usize),
}
