use super::graph::{CorridorGraph, WeightMatrix};
use super::traits::ShortestPathSolver;
use common::{
    error::Error,
    types::{DirectedEdge, NegativeCycle, Weight},
};

/// Sums the weights along `path`, failing on overflow.
pub fn path_weight(path: &[DirectedEdge]) -> Result<Weight, Error> {
    path.iter().try_fold(0 as Weight, |sum, edge| {
        sum.checked_add(edge.weight).ok_or(Error::CostOverflow)
    })
}

/// All-pairs shortest distances between the vertices of one corridor.
///
/// Indexed by graph vertex id; entries are stored densely by corridor
/// position. The diagonal keeps its default of `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricClosure {
    corridor: Vec<usize>,
    position: Vec<Option<usize>>,
    distances: Vec<Weight>,
}

impl MetricClosure {
    fn new(num_nodes: usize, corridor: &[usize]) -> Self {
        let mut position = vec![None; num_nodes];
        for (pos, &v) in corridor.iter().enumerate() {
            position[v] = Some(pos);
        }

        MetricClosure {
            corridor: corridor.to_vec(),
            position,
            distances: vec![0; corridor.len() * corridor.len()],
        }
    }

    fn index(&self, from: usize, to: usize) -> Result<usize, Error> {
        let lookup = |v: usize| {
            self.position
                .get(v)
                .copied()
                .flatten()
                .ok_or(Error::NodeIndexOutOfBounds(v))
        };
        Ok(lookup(from)? * self.corridor.len() + lookup(to)?)
    }

    fn set(&mut self, from: usize, to: usize, distance: Weight) -> Result<(), Error> {
        let idx = self.index(from, to)?;
        self.distances[idx] = distance;
        Ok(())
    }

    pub fn corridor(&self) -> &[usize] {
        &self.corridor
    }

    /// Shortest distance from `from` to `to` within the corridor.
    ///
    /// # Errors
    /// Returns `Error::NodeIndexOutOfBounds` if either vertex is not part of the corridor.
    pub fn distance(&self, from: usize, to: usize) -> Result<Weight, Error> {
        Ok(self.distances[self.index(from, to)?])
    }

    /// Total cost of the walk `start -> stops[0] -> stops[1] -> ...`.
    ///
    /// Legs are summed in `i128`, so intermediate sums never wrap. A total
    /// above `Weight::MAX` exceeds every budget and is returned as `Ok(None)`.
    ///
    /// # Errors
    /// Returns `Error::CostOverflow` for a total below `Weight::MIN`.
    pub fn walk_cost<I>(&self, start: usize, stops: I) -> Result<Option<Weight>, Error>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut cost: i128 = 0;
        let mut current = start;
        for next in stops {
            cost += i128::from(self.distance(current, next)?);
            current = next;
        }

        match Weight::try_from(cost) {
            Ok(cost) => Ok(Some(cost)),
            Err(_) if cost > 0 => Ok(None),
            Err(_) => Err(Error::CostOverflow),
        }
    }
}

/// Outcome of a closure build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Closure {
    Metric(MetricClosure),
    /// Some corridor vertex reaches a negative cycle; distances are unbounded.
    Unbounded(NegativeCycle),
}

/// Builds metric closures by running a shortest-path solver from every corridor vertex.
#[derive(Debug, Clone, Default)]
pub struct MetricClosureBuilder<S> {
    solver: S,
}

impl<S> MetricClosureBuilder<S>
where
    S: ShortestPathSolver,
{
    pub fn new(solver: S) -> Self {
        MetricClosureBuilder { solver }
    }

    /// Computes the metric closure of `matrix` restricted to `corridor`.
    ///
    /// Solver runs happen in corridor order; the first run that witnesses a
    /// negative cycle aborts the build with `Closure::Unbounded`.
    ///
    /// # Errors
    /// Returns `Error::Unreachable` if a corridor vertex cannot reach another,
    /// plus any error raised while building the graph or solving.
    pub fn build(&self, matrix: &WeightMatrix, corridor: &[usize]) -> Result<Closure, Error> {
        let graph = CorridorGraph::from_matrix(matrix, corridor)?;
        let mut closure = MetricClosure::new(graph.num_nodes, corridor);

        for &from in corridor {
            let tree = self.solver.shortest_paths(&graph, from)?;
            if let Some(cycle) = tree.negative_cycle() {
                tracing::debug!(
                    ?corridor,
                    source = from,
                    cycle = ?cycle.vertices(),
                    "negative cycle in corridor"
                );
                return Ok(Closure::Unbounded(cycle.clone()));
            }

            for &to in corridor.iter().filter(|&&to| to != from) {
                let path = tree
                    .path_to(to)?
                    .ok_or(Error::Unreachable { from, to })?;
                closure.set(from, to, path_weight(&path)?)?;
            }
        }

        Ok(Closure::Metric(closure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::QueueBellmanFord;

    fn builder() -> MetricClosureBuilder<QueueBellmanFord> {
        MetricClosureBuilder::new(QueueBellmanFord)
    }

    fn metric(closure: Closure) -> MetricClosure {
        match closure {
            Closure::Metric(metric) => metric,
            Closure::Unbounded(cycle) => panic!("unexpected negative cycle: {:?}", cycle),
        }
    }

    #[test]
    fn path_weight_sums_edges() {
        let path = vec![
            DirectedEdge::new(0, 1, 4),
            DirectedEdge::new(1, 2, -6),
            DirectedEdge::new(2, 3, 1),
        ];
        assert_eq!(path_weight(&path), Ok(-1));
        assert_eq!(path_weight(&[]), Ok(0));
    }

    #[test]
    fn path_weight_reports_overflow() {
        let path = vec![DirectedEdge::new(0, 1, Weight::MIN), DirectedEdge::new(1, 2, -1)];
        assert_eq!(path_weight(&path), Err(Error::CostOverflow));
    }

    #[test]
    fn closure_uses_shorter_indirect_routes() {
        let matrix = WeightMatrix::new(vec![
            vec![0, 1, 10],
            vec![1, 0, 1],
            vec![10, 1, 0],
        ])
        .unwrap();

        let closure = metric(builder().build(&matrix, &[0, 1, 2]).unwrap());
        assert_eq!(closure.distance(0, 2), Ok(2));
        assert_eq!(closure.distance(2, 0), Ok(2));
        assert_eq!(closure.distance(0, 1), Ok(1));
        assert_eq!(closure.distance(1, 1), Ok(0));
    }

    #[test]
    fn closure_is_restricted_to_corridor() {
        let matrix = WeightMatrix::new(vec![
            vec![0, 1, 10],
            vec![1, 0, 1],
            vec![10, 1, 0],
        ])
        .unwrap();

        // Vertex 1 is left out, so the cheap detour is not available.
        let closure = metric(builder().build(&matrix, &[0, 2]).unwrap());
        assert_eq!(closure.corridor(), &[0, 2]);
        assert_eq!(closure.distance(0, 2), Ok(10));
        assert_eq!(
            closure.distance(0, 1),
            Err(Error::NodeIndexOutOfBounds(1))
        );
    }

    #[test]
    fn walk_cost_follows_closure_distances() {
        let matrix = WeightMatrix::new(vec![
            vec![0, 2, 2, 2, -1],
            vec![9, 0, 2, 2, -1],
            vec![9, 3, 0, 2, -1],
            vec![9, 3, 2, 0, -1],
            vec![9, 3, 2, 2, 0],
        ])
        .unwrap();

        let closure = metric(builder().build(&matrix, &[0, 2, 3, 4]).unwrap());
        // 0 -> 4 -> 2 costs 1, 2 -> 4 -> 3 costs 1, 3 -> 4 costs -1.
        assert_eq!(closure.distance(0, 2), Ok(1));
        assert_eq!(closure.distance(2, 3), Ok(1));
        assert_eq!(closure.walk_cost(0, [2, 3, 4]), Ok(Some(1)));
        assert_eq!(closure.walk_cost(0, [3, 2, 4]), Ok(Some(1)));
        assert_eq!(closure.walk_cost(0, []), Ok(Some(0)));
    }

    #[test]
    fn walk_cost_past_weight_max_is_unaffordable() {
        let max = Weight::MAX;
        let matrix = WeightMatrix::new(vec![
            vec![0, max, 5],
            vec![max, 0, max],
            vec![5, max, 0],
        ])
        .unwrap();

        let closure = metric(builder().build(&matrix, &[0, 1, 2]).unwrap());
        assert_eq!(closure.distance(2, 1), Ok(max));
        assert_eq!(closure.walk_cost(0, [1, 2]), Ok(None));
        assert_eq!(closure.walk_cost(0, [2]), Ok(Some(5)));
    }

    #[test]
    fn walk_cost_recovers_from_large_intermediate_sums() {
        let max = Weight::MAX;
        let mut weights = vec![vec![max; 4]; 4];
        weights[2][3] = -max;
        let matrix = WeightMatrix::new(weights).unwrap();

        // max + max overflows before the -max leg brings the total back in range.
        let closure = metric(builder().build(&matrix, &[0, 1, 2, 3]).unwrap());
        assert_eq!(closure.distance(2, 3), Ok(-max));
        assert_eq!(closure.walk_cost(0, [1, 2, 3]), Ok(Some(max)));
    }

    #[test]
    fn walk_cost_below_weight_min_is_error() {
        let mut closure = MetricClosure::new(3, &[0, 1, 2]);
        closure.set(0, 1, Weight::MIN).unwrap();
        closure.set(1, 2, -1).unwrap();

        assert_eq!(closure.walk_cost(0, [1, 2]), Err(Error::CostOverflow));
    }

    #[test]
    fn negative_cycle_aborts_build() {
        let matrix = WeightMatrix::new(vec![
            vec![0, 5, 5],
            vec![5, 0, -3],
            vec![5, 1, 0],
        ])
        .unwrap();

        match builder().build(&matrix, &[0, 1, 2]).unwrap() {
            Closure::Unbounded(cycle) => {
                assert!(cycle.is_negative());
                let mut vertices = cycle.vertices();
                vertices.sort();
                assert_eq!(vertices, vec![1, 2]);
            }
            Closure::Metric(_) => panic!("expected a negative cycle"),
        }
    }

    #[test]
    fn negative_cycle_outside_corridor_is_ignored() {
        let matrix = WeightMatrix::new(vec![
            vec![0, 5, 5],
            vec![5, 0, -3],
            vec![5, 1, 0],
        ])
        .unwrap();

        let closure = metric(builder().build(&matrix, &[0, 2]).unwrap());
        assert_eq!(closure.distance(0, 2), Ok(5));
    }
}
