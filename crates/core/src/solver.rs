use super::cycle::find_predecessor_cycle;
use super::graph::CorridorGraph;
use super::traits::ShortestPathSolver;
use common::{
    error::Error,
    types::{DirectedEdge, NegativeCycle, Weight},
};
use std::collections::VecDeque;

/// Result of one single-source shortest-path run.
///
/// `distance[v]` is `None` while `v` is unreachable. `pred_edge_idx[v]` holds
/// the CSR index of the edge that produced the current best distance to `v`.
/// Once a negative cycle has been witnessed the distances are no longer
/// meaningful and only `negative_cycle()` should be consulted.
#[derive(Debug, Clone)]
pub struct ShortestPathTree<'g> {
    graph: &'g CorridorGraph,
    source: usize,
    distance: Vec<Option<Weight>>,
    pred_edge_idx: Vec<Option<usize>>,
    negative_cycle: Option<NegativeCycle>,
}

impl<'g> ShortestPathTree<'g> {
    pub fn source(&self) -> usize {
        self.source
    }

    pub fn distance_to(&self, v: usize) -> Option<Weight> {
        self.distance.get(v).copied().flatten()
    }

    pub fn has_path_to(&self, v: usize) -> bool {
        self.distance_to(v).is_some()
    }

    pub fn predecessor_edges(&self) -> &[Option<usize>] {
        &self.pred_edge_idx
    }

    pub fn has_negative_cycle(&self) -> bool {
        self.negative_cycle.is_some()
    }

    pub fn negative_cycle(&self) -> Option<&NegativeCycle> {
        self.negative_cycle.as_ref()
    }

    pub fn into_negative_cycle(self) -> Option<NegativeCycle> {
        self.negative_cycle
    }

    /// Reconstructs the shortest path from the source to `v`.
    ///
    /// Returns `Ok(None)` if `v` is unreachable and an empty path for the
    /// source itself.
    ///
    /// # Errors
    /// Returns `Error::NodeIndexOutOfBounds` for an unknown vertex, or
    /// `Error::PathReconstructionFailed` if the predecessor chain does not end
    /// at the source within `V` steps.
    pub fn path_to(&self, v: usize) -> Result<Option<Vec<DirectedEdge>>, Error> {
        if v >= self.graph.num_nodes {
            return Err(Error::NodeIndexOutOfBounds(v));
        }
        if !self.has_path_to(v) {
            return Ok(None);
        }

        let mut path = Vec::new();
        let mut current = v;
        while let Some(edge_idx) = self.pred_edge_idx[current] {
            if path.len() >= self.graph.num_nodes {
                return Err(Error::PathReconstructionFailed(v));
            }
            let edge = self.graph.edge(edge_idx)?;
            current = edge.from;
            path.push(edge);
        }

        if current != self.source {
            return Err(Error::PathReconstructionFailed(v));
        }

        path.reverse();
        Ok(Some(path))
    }
}

/// Queue-based Bellman-Ford (the "shortest path faster" variant) with
/// periodic negative-cycle checks over the predecessor table.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueBellmanFord;

impl QueueBellmanFord {
    /// Turns the CSR edge indices of a detected cycle into a `NegativeCycle`.
    fn reconstruct_cycle(
        &self,
        graph: &CorridorGraph,
        cycle_edge_indices: &[usize],
    ) -> Result<NegativeCycle, Error> {
        let path = cycle_edge_indices
            .iter()
            .map(|&edge_idx| graph.edge(edge_idx))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NegativeCycle::from_edges(path))
    }
}

impl ShortestPathSolver for QueueBellmanFord {
    /// Computes shortest distances from `source`, stopping at the first negative cycle.
    ///
    /// Every examined edge counts as one relaxation step. Whenever the step
    /// count is a multiple of `V` the predecessor table is searched for a
    /// cycle; if one exists, relaxation stops and the cycle is recorded.
    ///
    /// # Returns
    /// - `Ok(tree)` with exact distances, or with `negative_cycle` set.
    /// - `Err(e)` → malformed input, or a distance below `Weight::MIN`.
    fn shortest_paths<'g>(
        &self,
        graph: &'g CorridorGraph,
        source: usize,
    ) -> Result<ShortestPathTree<'g>, Error> {
        if source >= graph.num_nodes {
            return Err(Error::NodeIndexOutOfBounds(source));
        }

        let num_nodes = graph.num_nodes;
        let mut distance: Vec<Option<Weight>> = vec![None; num_nodes];
        let mut in_queue = vec![false; num_nodes];
        let mut pred_edge_idx: Vec<Option<usize>> = vec![None; num_nodes];
        let mut queue = VecDeque::with_capacity(num_nodes);
        let mut relaxations: usize = 0;

        distance[source] = Some(0);
        queue.push_back(source);
        in_queue[source] = true;

        while let Some(u) = queue.pop_front() {
            in_queue[u] = false;
            let Some(distance_u) = distance[u] else {
                continue;
            };

            // 'i' is the CSR index of the edge (u, v)
            for i in graph.out_edges(u) {
                let v = graph.edge_targets[i];
                let weight = graph.edge_weights[i];
                // A sum past Weight::MAX can never beat a stored distance.
                let candidate = match distance_u.checked_add(weight) {
                    Some(candidate) => Some(candidate),
                    None if weight > 0 => None,
                    None => return Err(Error::CostOverflow),
                };

                if candidate.is_some_and(|c| distance[v].is_none_or(|current| c < current)) {
                    distance[v] = candidate;
                    pred_edge_idx[v] = Some(i);

                    if !in_queue[v] {
                        queue.push_back(v);
                        in_queue[v] = true;
                    }
                }

                if relaxations % num_nodes == 0 {
                    if let Some(cycle_edges) = find_predecessor_cycle(graph, &pred_edge_idx)? {
                        let cycle = self.reconstruct_cycle(graph, &cycle_edges)?;
                        tracing::trace!(
                            source,
                            length = cycle.len(),
                            weight = cycle.total_weight,
                            "negative cycle detected"
                        );
                        return Ok(ShortestPathTree {
                            graph,
                            source,
                            distance,
                            pred_edge_idx,
                            negative_cycle: Some(cycle),
                        });
                    }
                }
                relaxations += 1;
            }
        }

        Ok(ShortestPathTree {
            graph,
            source,
            distance,
            pred_edge_idx,
            negative_cycle: None,
        })
    }
}
