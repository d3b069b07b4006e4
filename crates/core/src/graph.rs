use std::ops::Range;

use common::error::Error;
use common::types::{DirectedEdge, Weight};

/// Square matrix of edge costs: `weights[i][j]` is the cost of `i -> j`.
///
/// Vertex `0` is the fixed start, vertex `dim - 1` the fixed end and every
/// vertex in between is an optional waypoint. The diagonal is never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightMatrix {
    rows: Vec<Vec<Weight>>,
}

impl WeightMatrix {
    /// Validates that `rows` is square and large enough to hold a start/end pair.
    pub fn new(rows: Vec<Vec<Weight>>) -> Result<Self, Error> {
        let dim = rows.len();
        if dim < 2 {
            return Err(Error::MatrixTooSmall(dim));
        }

        if let Some((row, entries)) = rows.iter().enumerate().find(|(_, r)| r.len() != dim) {
            return Err(Error::NonSquareMatrix {
                row,
                len: entries.len(),
                expected: dim,
            });
        }

        Ok(WeightMatrix { rows })
    }

    pub fn from_rows(rows: &[Vec<Weight>]) -> Result<Self, Error> {
        Self::new(rows.to_vec())
    }

    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    pub fn weight(&self, from: usize, to: usize) -> Weight {
        self.rows[from][to]
    }

    pub fn start(&self) -> usize {
        0
    }

    pub fn end(&self) -> usize {
        self.dim() - 1
    }

    /// Graph vertex ids of the optional waypoints, in ascending order.
    pub fn waypoints(&self) -> Range<usize> {
        1..self.end()
    }
}

/// Corridor graph in Compressed Sparse Row (CSR) format.
///
/// CSR format stores outgoing edges of each vertex contiguously in memory:
/// - `node_pointers[u]..node_pointers[u+1]` → edges from vertex `u`
/// - `edge_targets[i]` -> target vertex of edge `i`
/// - `edge_weights[i]` -> weight of edge `i`
/// - `edge_source_by_index[i]` -> source vertex of edge `i`
///
/// `num_nodes` is always the full vertex count of the originating matrix;
/// vertices outside the corridor simply have no outgoing or incoming edges.
#[derive(Debug, Clone)]
pub struct CorridorGraph {
    pub num_nodes: usize,
    pub node_pointers: Vec<usize>,
    pub edge_targets: Vec<usize>,
    pub edge_weights: Vec<Weight>,
    pub edge_source_by_index: Vec<usize>,
}

impl CorridorGraph {
    /// Builds the complete digraph over `corridor`, taking weights from `matrix`.
    ///
    /// Every corridor vertex gets one edge to every other corridor vertex, in
    /// corridor order. Self-loops are never created.
    ///
    /// # Errors
    /// Returns `Error::NodeIndexOutOfBounds` if a corridor vertex is not a
    /// vertex of `matrix`.
    pub fn from_matrix(matrix: &WeightMatrix, corridor: &[usize]) -> Result<Self, Error> {
        let num_nodes = matrix.dim();
        if let Some(&v) = corridor.iter().find(|&&v| v >= num_nodes) {
            return Err(Error::NodeIndexOutOfBounds(v));
        }

        let mut edges: Vec<DirectedEdge> =
            Vec::with_capacity(corridor.len() * corridor.len().saturating_sub(1));
        for &v in corridor {
            for &w in corridor.iter().filter(|&&w| w != v) {
                edges.push(DirectedEdge::new(v, w, matrix.weight(v, w)));
            }
        }

        Ok(Self::from_edges(num_nodes, &mut edges))
    }

    /// Creates a CSR graph from a list of edges.
    ///
    /// Edges are stable-sorted by source vertex, so edges sharing a source
    /// keep their relative input order.
    pub fn from_edges(num_nodes: usize, edges: &mut [DirectedEdge]) -> Self {
        edges.sort_by_key(|edge| edge.from);

        let (node_pointers, edge_targets, edge_weights, edge_source_by_index) =
            Self::build_csr_from_edges(num_nodes, edges);

        Self {
            num_nodes,
            node_pointers,
            edge_targets,
            edge_weights,
            edge_source_by_index,
        }
    }

    /// Two-pass counting construction of the CSR arrays.
    ///
    /// Returns `(node_pointers, edge_targets, edge_weights, edge_source_by_index)`.
    /// The last array gives O(1) edge-to-source lookups during path and cycle
    /// reconstruction.
    fn build_csr_from_edges(
        num_nodes: usize,
        edges: &[DirectedEdge],
    ) -> (Vec<usize>, Vec<usize>, Vec<Weight>, Vec<usize>) {
        let m = edges.len();
        let mut node_pointers = vec![0; num_nodes + 1];

        for edge in edges {
            node_pointers[edge.from + 1] += 1;
        }

        for i in 1..=num_nodes {
            node_pointers[i] += node_pointers[i - 1];
        }

        let mut edge_targets = vec![0; m];
        let mut edge_weights = vec![0; m];
        let mut edge_source_by_index = vec![0; m];

        let mut cursor = node_pointers.clone();

        for edge in edges {
            let pos = cursor[edge.from];
            edge_weights[pos] = edge.weight;
            edge_targets[pos] = edge.to;
            edge_source_by_index[pos] = edge.from;

            cursor[edge.from] += 1;
        }

        (
            node_pointers,
            edge_targets,
            edge_weights,
            edge_source_by_index,
        )
    }

    pub fn num_edges(&self) -> usize {
        self.edge_targets.len()
    }

    /// CSR indices of the edges leaving `v`.
    pub fn out_edges(&self, v: usize) -> Range<usize> {
        self.node_pointers[v]..self.node_pointers[v + 1]
    }

    /// O(1) lookup for the source vertex of a given edge index.
    ///
    /// # Errors
    /// Returns `Error::InvalidGraph` if `edge_idx` is out of bounds.
    pub fn get_edge_source_node(&self, edge_idx: usize) -> Result<usize, Error> {
        self.edge_source_by_index
            .get(edge_idx)
            .copied()
            .ok_or(Error::InvalidGraph)
    }

    /// Materializes the edge stored at CSR index `edge_idx`.
    pub fn edge(&self, edge_idx: usize) -> Result<DirectedEdge, Error> {
        let from = self.get_edge_source_node(edge_idx)?;
        Ok(DirectedEdge::new(
            from,
            self.edge_targets[edge_idx],
            self.edge_weights[edge_idx],
        ))
    }
}
