use super::graph::CorridorGraph;
use super::solver::ShortestPathTree;
use common::error::Error;

/// Trait for single-source shortest-path solvers that tolerate negative weights.
pub trait ShortestPathSolver {
    /// Computes shortest distances from `source` over `graph`.
    ///
    /// A negative cycle is not an error: it is recorded on the returned tree
    /// and ends the computation. `Err(e)` is reserved for malformed input.
    fn shortest_paths<'g>(
        &self,
        graph: &'g CorridorGraph,
        source: usize,
    ) -> Result<ShortestPathTree<'g>, Error>;
}
