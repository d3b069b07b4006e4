use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;
use tokio::sync::mpsc::Sender;

use super::error::Error;
use common::types::Weight;
use rescue_core::SearchOutcome;

/// Where scenarios come from.
#[derive(Debug, Clone, Subcommand)]
pub enum DataSource {
    /// Stream randomly generated scenarios.
    Sim,
    /// Stream scenarios from a CSV file with header `scenario,budget,from,to,weight`.
    Csv {
        #[arg(value_name = "path")]
        path: PathBuf,
    },
}

/// One rescue query: a weight matrix and the budget to fit the walk into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub id: u64,
    pub weights: Vec<Vec<Weight>>,
    pub budget: Weight,
}

impl Scenario {
    pub fn waypoint_count(&self) -> usize {
        self.weights.len().saturating_sub(2)
    }
}

/// A trait defining the contract for any source that generates and streams
/// scenarios into the processing pipeline.
///
/// This decouples the Producer task from the specific data source (CSV file
/// vs. simulated data). The `Send + Sync + 'static` bounds let the streamer
/// run on the multi-threaded Tokio runtime.
#[async_trait::async_trait]
pub trait ScenarioStreamer: Send + Sync + 'static {
    async fn run_stream(self, sender: Sender<Scenario>) -> Result<(), Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Feasible,
    Unbounded,
    Infeasible,
    Skipped,
    Failed,
}

/// One row of the CSV report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub scenario: u64,
    pub vertices: usize,
    pub budget: Weight,
    pub outcome: OutcomeKind,
    /// `;`-separated zero-based waypoint indices.
    pub rescued: String,
    pub cost: Option<Weight>,
}

impl Report {
    fn empty(scenario: &Scenario, outcome: OutcomeKind) -> Self {
        Report {
            scenario: scenario.id,
            vertices: scenario.weights.len(),
            budget: scenario.budget,
            outcome,
            rescued: String::new(),
            cost: None,
        }
    }

    pub fn skipped(scenario: &Scenario) -> Self {
        Self::empty(scenario, OutcomeKind::Skipped)
    }

    pub fn failed(scenario: &Scenario) -> Self {
        Self::empty(scenario, OutcomeKind::Failed)
    }

    pub fn from_outcome(scenario: &Scenario, outcome: &SearchOutcome) -> Self {
        let (kind, cost) = match outcome {
            SearchOutcome::Feasible(route) => (OutcomeKind::Feasible, Some(route.cost)),
            SearchOutcome::Unbounded { cycle, .. } => {
                (OutcomeKind::Unbounded, Some(cycle.total_weight))
            }
            SearchOutcome::Infeasible { direct_cost } => {
                (OutcomeKind::Infeasible, Some(*direct_cost))
            }
        };

        Report {
            rescued: join_indices(&outcome.rescued()),
            cost,
            ..Self::empty(scenario, kind)
        }
    }
}

fn join_indices(indices: &BTreeSet<usize>) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(";")
}
