use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::Sender;
use tokio::time::{self, Duration};

use super::config::SimulatorConfig;
use super::error::Error;
use super::types::{Scenario, ScenarioStreamer};
use common::types::Weight;

/// Produces random rescue scenarios for simulation purposes.
///
/// Generates `scenario_count` dense weight matrices with entries drawn from
/// `[min_weight, max_weight]` and budgets drawn from `[min_budget, max_budget]`,
/// sending one scenario per tick over a Tokio bounded channel.
pub struct SimulatorStreamer {
    config: SimulatorConfig,
}

impl SimulatorStreamer {
    pub fn new(config: SimulatorConfig) -> Self {
        SimulatorStreamer { config }
    }

    fn rng(&self) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }

    fn generate_scenario(&self, id: u64, rng: &mut SmallRng) -> Scenario {
        let n = self.config.total_vertices;
        let weight_range = self.config.min_weight..=self.config.max_weight;

        let weights: Vec<Vec<Weight>> = (0..n)
            .map(|from| {
                (0..n)
                    .map(|to| {
                        if from == to {
                            0
                        } else {
                            rng.random_range(weight_range.clone())
                        }
                    })
                    .collect()
            })
            .collect();

        Scenario {
            id,
            weights,
            budget: rng.random_range(self.config.min_budget..=self.config.max_budget),
        }
    }
}

#[async_trait]
impl ScenarioStreamer for SimulatorStreamer {
    /// Runs the simulation asynchronously.
    ///
    /// Backpressure is handled naturally via awaiting on `sender.send()`.
    /// Exits early if the receiver is dropped.
    async fn run_stream(self, sender: Sender<Scenario>) -> Result<(), Error> {
        let mut interval = time::interval(Duration::from_millis(self.config.interval_ms.max(1)));
        let mut rng = self.rng();

        for id in 0..self.config.scenario_count {
            interval.tick().await;

            let scenario = self.generate_scenario(id, &mut rng);
            tracing::debug!(
                scenario = id,
                vertices = scenario.weights.len(),
                budget = scenario.budget,
                "Simulator generated scenario"
            );

            if sender.send(scenario).await.is_err() {
                tracing::warn!("Simulator shutting down: searcher receiver dropped.");
                return Err(Error::ChannelSendFailed);
            }
        }

        tracing::info!(
            count = self.config.scenario_count,
            "Simulator finished generating scenarios"
        );
        Ok(())
    }
}
