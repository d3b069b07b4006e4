use super::graph::CorridorGraph;
use common::error::Error;

/// The predecessor table of a shortest-path run, viewed as a graph.
///
/// Each predecessor edge `u -> v` is filed under its source `u`, so the
/// structure is a forest of shortest-path trees unless relaxation has closed
/// a loop. Any loop in this graph is a negative cycle of the underlying graph.
pub struct PredecessorGraph<'g> {
    graph: &'g CorridorGraph,
    children: Vec<Vec<usize>>,
}

impl<'g> PredecessorGraph<'g> {
    /// Builds the predecessor graph from a table of CSR edge indices, one
    /// optional incoming edge per vertex.
    pub fn from_predecessors(
        graph: &'g CorridorGraph,
        pred_edge_idx: &[Option<usize>],
    ) -> Result<Self, Error> {
        let mut children = vec![Vec::new(); graph.num_nodes];
        for &edge_idx in pred_edge_idx.iter().flatten() {
            let u = graph.get_edge_source_node(edge_idx)?;
            children[u].push(edge_idx);
        }

        Ok(PredecessorGraph { graph, children })
    }

    /// Finds one directed cycle, if any, using an explicit-stack depth-first search.
    ///
    /// Returns the CSR edge indices of the cycle in forward order. The search
    /// stops at the first cycle found.
    ///
    /// # Errors
    /// Returns `Error::CycleReconstructionFailed` if the traversal's
    /// back-pointers do not lead around the detected cycle.
    pub fn find_cycle(&self) -> Result<Option<Vec<usize>>, Error> {
        let num_nodes = self.graph.num_nodes;
        let mut marked = vec![false; num_nodes];
        let mut on_stack = vec![false; num_nodes];
        let mut edge_to: Vec<Option<usize>> = vec![None; num_nodes];

        for root in 0..num_nodes {
            if marked[root] {
                continue;
            }

            marked[root] = true;
            on_stack[root] = true;
            // Frames are (vertex, position of the next child edge to explore).
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

            while let Some(frame) = stack.last_mut() {
                let (v, next) = *frame;

                let Some(&edge_idx) = self.children[v].get(next) else {
                    on_stack[v] = false;
                    stack.pop();
                    continue;
                };
                frame.1 += 1;

                let w = self.graph.edge_targets[edge_idx];
                if !marked[w] {
                    marked[w] = true;
                    on_stack[w] = true;
                    edge_to[w] = Some(edge_idx);
                    stack.push((w, 0));
                } else if on_stack[w] {
                    return self.trace_cycle(&edge_to, edge_idx, w).map(Some);
                }
            }
        }

        Ok(None)
    }

    /// Walks `edge_to` back from the tail of `closing_edge` until `cycle_start`
    /// is reached, then reverses into forward order.
    fn trace_cycle(
        &self,
        edge_to: &[Option<usize>],
        closing_edge: usize,
        cycle_start: usize,
    ) -> Result<Vec<usize>, Error> {
        let mut cycle = vec![closing_edge];
        let mut current = self.graph.get_edge_source_node(closing_edge)?;

        while current != cycle_start {
            if cycle.len() > self.graph.num_nodes {
                return Err(Error::CycleReconstructionFailed);
            }
            let edge_idx = edge_to[current].ok_or(Error::CycleReconstructionFailed)?;
            cycle.push(edge_idx);
            current = self.graph.get_edge_source_node(edge_idx)?;
        }

        cycle.reverse();
        Ok(cycle)
    }
}

/// Convenience wrapper: builds the predecessor graph and searches it for a cycle.
pub fn find_predecessor_cycle(
    graph: &CorridorGraph,
    pred_edge_idx: &[Option<usize>],
) -> Result<Option<Vec<usize>>, Error> {
    PredecessorGraph::from_predecessors(graph, pred_edge_idx)?.find_cycle()
}
