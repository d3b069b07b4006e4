use std::time::Instant;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::Duration;

use super::config::SearchConfig;
use super::error::Error;
use super::types::{Report, Scenario};
use common::types::Weight;
use rescue_core::{SearchOutcome, WaypointSearch, WeightMatrix};

/// Consumes scenarios, runs the waypoint search on each and forwards a report.
///
/// The search is CPU-bound, so every scenario is solved on Tokio's blocking
/// pool. A failing scenario produces a `failed` report; the stream continues.
pub struct RescueSearcher {
    receiver: Receiver<Scenario>,
    reports: Sender<Report>,
    config: SearchConfig,
}

impl RescueSearcher {
    pub fn new(receiver: Receiver<Scenario>, reports: Sender<Report>, config: SearchConfig) -> Self {
        RescueSearcher {
            receiver,
            reports,
            config,
        }
    }

    pub async fn search_for_rescues(mut self) -> Result<(), Error> {
        tracing::info!("Searcher ready.");

        while let Some(scenario) = self.receiver.recv().await {
            let report = if scenario.waypoint_count() > self.config.max_waypoints {
                tracing::warn!(
                    scenario = scenario.id,
                    waypoints = scenario.waypoint_count(),
                    max_waypoints = self.config.max_waypoints,
                    "Searcher: too many waypoints for exhaustive search. Skipping."
                );
                Report::skipped(&scenario)
            } else {
                match self.evaluate(&scenario).await {
                    Ok(outcome) => {
                        tracing::info!(
                            scenario = scenario.id,
                            rescued = ?outcome.rescued(),
                            unbounded = outcome.is_unbounded(),
                            "Search complete"
                        );
                        Report::from_outcome(&scenario, &outcome)
                    }
                    Err(e) => {
                        tracing::warn!(
                            scenario = scenario.id,
                            error = %e,
                            "Searcher: scenario failed. Continuing."
                        );
                        Report::failed(&scenario)
                    }
                }
            };

            if self.reports.send(report).await.is_err() {
                tracing::warn!("Searcher shutting down: writer receiver dropped.");
                return Err(Error::ChannelSendFailed);
            }
        }

        tracing::info!("Scenario stream closed, shutting down searcher.");
        Ok(())
    }

    async fn evaluate(&self, scenario: &Scenario) -> Result<SearchOutcome, Error> {
        let deadline = self
            .config
            .deadline_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));
        let weights = scenario.weights.clone();
        let budget = scenario.budget;

        let outcome =
            tokio::task::spawn_blocking(move || run_search(&weights, budget, deadline)).await??;
        Ok(outcome)
    }

    /// Public method that spawns the searcher task onto the Tokio runtime.
    pub fn spawn_task(self) -> tokio::task::JoinHandle<Result<(), Error>> {
        tokio::spawn(self.search_for_rescues())
    }
}

fn run_search(
    weights: &[Vec<Weight>],
    budget: Weight,
    deadline: Option<Instant>,
) -> Result<SearchOutcome, common::error::Error> {
    let matrix = WeightMatrix::from_rows(weights)?;
    let search = match deadline {
        Some(deadline) => WaypointSearch::default().with_deadline(deadline),
        None => WaypointSearch::default(),
    };
    search.run(&matrix, budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OutcomeKind;
    use tokio::sync::mpsc;

    fn search_config(max_waypoints: usize, deadline_ms: Option<u64>) -> SearchConfig {
        SearchConfig {
            max_waypoints,
            deadline_ms,
        }
    }

    async fn run_scenarios(config: SearchConfig, scenarios: Vec<Scenario>) -> Vec<Report> {
        let (scenario_tx, scenario_rx) = mpsc::channel(8);
        let (report_tx, mut report_rx) = mpsc::channel(8);

        let handle = RescueSearcher::new(scenario_rx, report_tx, config).spawn_task();
        for scenario in scenarios {
            scenario_tx.send(scenario).await.expect("searcher alive");
        }
        drop(scenario_tx);

        let mut reports = Vec::new();
        while let Some(report) = report_rx.recv().await {
            reports.push(report);
        }
        handle
            .await
            .expect("searcher task panicked")
            .expect("searcher failed");
        reports
    }

    fn hub_scenario(id: u64) -> Scenario {
        Scenario {
            id,
            weights: vec![
                vec![0, 2, 2, 2, -1],
                vec![9, 0, 2, 2, -1],
                vec![9, 3, 0, 2, -1],
                vec![9, 3, 2, 0, -1],
                vec![9, 3, 2, 2, 0],
            ],
            budget: 1,
        }
    }

    #[tokio::test]
    async fn test_reports_each_scenario_in_order() {
        let negative = Scenario {
            id: 2,
            weights: vec![vec![0, -3, 1], vec![1, 0, 1], vec![1, 1, 0]],
            budget: -10,
        };

        let reports =
            run_scenarios(search_config(8, None), vec![hub_scenario(1), negative]).await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].scenario, 1);
        assert_eq!(reports[0].outcome, OutcomeKind::Feasible);
        assert_eq!(reports[0].rescued, "1;2");
        assert_eq!(reports[0].cost, Some(1));

        assert_eq!(reports[1].outcome, OutcomeKind::Unbounded);
        assert_eq!(reports[1].rescued, "0");
    }

    #[tokio::test]
    async fn test_large_scenario_is_skipped() {
        let reports = run_scenarios(search_config(2, None), vec![hub_scenario(5)]).await;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, OutcomeKind::Skipped);
    }

    #[tokio::test]
    async fn test_malformed_scenario_fails_without_stopping_stream() {
        let ragged = Scenario {
            id: 3,
            weights: vec![vec![0, 1], vec![1]],
            budget: 1,
        };

        let reports =
            run_scenarios(search_config(8, Some(1_000)), vec![ragged, hub_scenario(4)]).await;

        assert_eq!(reports[0].outcome, OutcomeKind::Failed);
        assert_eq!(reports[1].outcome, OutcomeKind::Feasible);
    }

    #[tokio::test]
    async fn test_expired_deadline_fails_scenario() {
        let reports = run_scenarios(search_config(8, Some(0)), vec![hub_scenario(9)]).await;

        assert_eq!(reports[0].outcome, OutcomeKind::Failed);
    }

    #[test]
    fn test_run_search_matches_solve() {
        let scenario = hub_scenario(0);
        let outcome = run_search(&scenario.weights, scenario.budget, None).unwrap();

        assert_eq!(
            outcome.rescued(),
            rescue_core::solve(&scenario.weights, scenario.budget).unwrap()
        );
    }
}
