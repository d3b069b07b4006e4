pub mod closure;
pub mod cycle;
pub mod graph;
pub mod search;
pub mod solver;
pub mod traits;

pub use closure::{Closure, MetricClosure, MetricClosureBuilder};
pub use graph::{CorridorGraph, WeightMatrix};
pub use search::{FeasibleRoute, SearchOutcome, WaypointSearch, solve};
pub use solver::{QueueBellmanFord, ShortestPathTree};
