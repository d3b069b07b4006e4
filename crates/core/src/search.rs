use std::collections::BTreeSet;
use std::iter;
use std::time::Instant;

use itertools::Itertools;

use super::closure::{Closure, MetricClosure, MetricClosureBuilder};
use super::graph::WeightMatrix;
use super::solver::QueueBellmanFord;
use super::traits::ShortestPathSolver;
use common::{
    error::Error,
    types::{NegativeCycle, Weight},
};

/// A waypoint ordering whose walk from start to end fits within the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeasibleRoute {
    /// Graph vertex ids of the rescued waypoints, in visiting order.
    pub order: Vec<usize>,
    /// Closure cost of `start -> order... -> end`.
    pub cost: Weight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Feasible(FeasibleRoute),
    /// A negative cycle allows unbounded cost reduction; every waypoint is rescuable.
    Unbounded {
        waypoint_count: usize,
        cycle: NegativeCycle,
    },
    /// Even the direct start-to-end walk exceeds the budget.
    Infeasible { direct_cost: Weight },
}

impl SearchOutcome {
    /// Zero-based waypoint indices (graph vertex id minus one) that can be rescued.
    pub fn rescued(&self) -> BTreeSet<usize> {
        match self {
            SearchOutcome::Feasible(route) => route.order.iter().map(|&v| v - 1).collect(),
            SearchOutcome::Unbounded { waypoint_count, .. } => (0..*waypoint_count).collect(),
            SearchOutcome::Infeasible { .. } => BTreeSet::new(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, SearchOutcome::Unbounded { .. })
    }
}

/// Exhaustive search for the largest waypoint subset that fits within a budget.
///
/// Subsets are tried from the largest size down, each size in lexicographic
/// order, and every subset's permutations in lexicographic order. The first
/// ordering whose cost is within budget ends the search, so the returned
/// subset always has maximum cardinality.
pub struct WaypointSearch<S> {
    closure_builder: MetricClosureBuilder<S>,
    deadline: Option<Instant>,
}

impl<S> WaypointSearch<S>
where
    S: ShortestPathSolver,
{
    pub fn new(solver: S) -> Self {
        WaypointSearch {
            closure_builder: MetricClosureBuilder::new(solver),
            deadline: None,
        }
    }

    /// Abort with `Error::DeadlineExceeded` if `deadline` passes before a subset size is started.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn run(&self, matrix: &WeightMatrix, budget: Weight) -> Result<SearchOutcome, Error> {
        let waypoints: Vec<usize> = matrix.waypoints().collect();

        for size in (1..=waypoints.len()).rev() {
            self.check_deadline(size)?;
            tracing::debug!(size, budget, "examining waypoint subsets");

            for subset in waypoints.iter().copied().combinations(size) {
                if let Some(outcome) = self.examine(matrix, &subset, budget)? {
                    return Ok(outcome);
                }
            }
        }

        self.check_deadline(0)?;
        self.examine_direct(matrix, budget)
    }

    /// Builds the closure for `start + subset + end` and scans its orderings.
    ///
    /// Returns `Some` for a terminal outcome (feasible ordering or negative
    /// cycle) and `None` when no ordering of `subset` fits the budget.
    fn examine(
        &self,
        matrix: &WeightMatrix,
        subset: &[usize],
        budget: Weight,
    ) -> Result<Option<SearchOutcome>, Error> {
        tracing::trace!(?subset, "building corridor closure");

        let closure = match self.closure_builder.build(matrix, &corridor(matrix, subset))? {
            Closure::Metric(closure) => closure,
            Closure::Unbounded(cycle) => return Ok(Some(unbounded(matrix, cycle))),
        };

        for order in subset.iter().copied().permutations(subset.len()) {
            if let Some(outcome) = feasible_order(&closure, matrix, order, budget)? {
                return Ok(Some(outcome));
            }
        }

        Ok(None)
    }

    /// Evaluates the empty subset, the walk straight from start to end.
    ///
    /// Always terminal: the direct walk either fits, or nothing does.
    fn examine_direct(&self, matrix: &WeightMatrix, budget: Weight) -> Result<SearchOutcome, Error> {
        let closure = match self.closure_builder.build(matrix, &corridor(matrix, &[]))? {
            Closure::Metric(closure) => closure,
            Closure::Unbounded(cycle) => return Ok(unbounded(matrix, cycle)),
        };

        let direct_cost = closure.distance(matrix.start(), matrix.end())?;
        if direct_cost > budget {
            tracing::debug!(direct_cost, budget, "no walk fits within budget");
            return Ok(SearchOutcome::Infeasible { direct_cost });
        }

        tracing::debug!(cost = direct_cost, budget, "direct walk fits within budget");
        Ok(SearchOutcome::Feasible(FeasibleRoute {
            order: Vec::new(),
            cost: direct_cost,
        }))
    }

    fn check_deadline(&self, size: usize) -> Result<(), Error> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                tracing::debug!(size, "search deadline exceeded");
                Err(Error::DeadlineExceeded(size))
            }
            _ => Ok(()),
        }
    }
}

impl Default for WaypointSearch<QueueBellmanFord> {
    fn default() -> Self {
        WaypointSearch::new(QueueBellmanFord)
    }
}

fn unbounded(matrix: &WeightMatrix, cycle: NegativeCycle) -> SearchOutcome {
    SearchOutcome::Unbounded {
        waypoint_count: matrix.waypoints().len(),
        cycle,
    }
}

fn corridor(matrix: &WeightMatrix, subset: &[usize]) -> Vec<usize> {
    iter::once(matrix.start())
        .chain(subset.iter().copied())
        .chain(iter::once(matrix.end()))
        .collect()
}

fn feasible_order(
    closure: &MetricClosure,
    matrix: &WeightMatrix,
    order: Vec<usize>,
    budget: Weight,
) -> Result<Option<SearchOutcome>, Error> {
    let stops = order.iter().copied().chain(iter::once(matrix.end()));
    // `None` means the walk costs more than `Weight::MAX`.
    let cost = match closure.walk_cost(matrix.start(), stops)? {
        Some(cost) if cost <= budget => cost,
        _ => return Ok(None),
    };

    tracing::debug!(?order, cost, budget, "feasible route found");
    Ok(Some(SearchOutcome::Feasible(FeasibleRoute { order, cost })))
}

/// Finds a maximum set of waypoints rescuable within `budget`.
///
/// `weights[i][j]` is the cost of moving from vertex `i` to vertex `j`.
/// Vertex `0` is the start and the last vertex the end; the returned indices
/// number the waypoints in between from zero.
///
/// # Errors
/// Returns `Error::MatrixTooSmall` or `Error::NonSquareMatrix` for malformed
/// input, and `Error::CostOverflow` if a cost falls below `Weight::MIN`.
/// Walks costing more than `Weight::MAX` are treated as over budget.
pub fn solve(weights: &[Vec<Weight>], budget: Weight) -> Result<BTreeSet<usize>, Error> {
    let matrix = WeightMatrix::from_rows(weights)?;
    let outcome = WaypointSearch::default().run(&matrix, budget)?;
    Ok(outcome.rescued())
}
