/// Signed edge cost. Walk totals are accumulated with checked arithmetic.
pub type Weight = i64;

/// A single directed edge `from -> to` carrying its cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectedEdge {
    pub from: usize,
    pub to: usize,
    pub weight: Weight,
}

impl DirectedEdge {
    pub fn new(from: usize, to: usize, weight: Weight) -> Self {
        DirectedEdge { from, to, weight }
    }
}

/// A negative cycle witnessed by the shortest-path engine.
///
/// `path` holds the edges in forward order, so `path[i].to == path[i + 1].from`
/// and the last edge returns to the first edge's source.
///
/// Fields:
/// - `path`: The sequence of edges forming the cycle.
/// - `total_weight`: Sum of the edge weights along the cycle, saturating at the
///   `Weight` bounds. A genuine witness is always negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeCycle {
    pub path: Vec<DirectedEdge>,
    pub total_weight: Weight,
}

impl NegativeCycle {
    pub fn from_edges(path: Vec<DirectedEdge>) -> Self {
        let total_weight = path
            .iter()
            .fold(0 as Weight, |sum, edge| sum.saturating_add(edge.weight));

        NegativeCycle { path, total_weight }
    }

    /// Returns the vertices visited by the cycle, starting at the source of its first edge.
    pub fn vertices(&self) -> Vec<usize> {
        self.path.iter().map(|edge| edge.from).collect()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns true if walking the cycle strictly lowers the accumulated cost.
    pub fn is_negative(&self) -> bool {
        self.total_weight < 0
    }
}
