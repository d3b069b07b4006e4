use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use tokio::sync::mpsc::Sender;

use super::error::Error;
use super::types::{Scenario, ScenarioStreamer};
use common::types::Weight;

// Helper struct for CSV parsing
#[derive(Debug, Deserialize, Default)]
pub struct CsvRecord {
    pub scenario: u64,

    pub budget: Weight,

    #[serde(rename = "from")]
    pub from_node: usize,

    #[serde(rename = "to")]
    pub to_node: usize,

    pub weight: Weight,
}

/// Streams scenarios described as edge lists in a CSV file.
///
/// Rows are grouped by their `scenario` column. Each group must cover every
/// off-diagonal entry of a square matrix whose size is one more than the
/// largest vertex id mentioned.
pub struct CsvStreamer {
    path: PathBuf,
}

impl CsvStreamer {
    pub fn new(path: PathBuf) -> Self {
        CsvStreamer { path }
    }

    fn parse_csv_to_scenarios(&self) -> Result<Vec<Scenario>, Error> {
        let file = File::open(&self.path).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to read scenario file");
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(file);

        let mut grouped: BTreeMap<u64, Vec<CsvRecord>> = BTreeMap::new();
        for result in rdr.deserialize() {
            let record: CsvRecord = result?;
            grouped.entry(record.scenario).or_default().push(record);
        }

        grouped
            .into_iter()
            .map(|(id, records)| assemble_scenario(id, &records))
            .collect()
    }
}

/// Turns the edge rows of one scenario into a dense weight matrix.
fn assemble_scenario(id: u64, records: &[CsvRecord]) -> Result<Scenario, Error> {
    let budget = records.first().map_or(0, |record| record.budget);
    if let Some(record) = records.iter().find(|record| record.budget != budget) {
        return Err(Error::InconsistentBudget {
            scenario: id,
            expected: budget,
            found: record.budget,
        });
    }

    let max_id = records
        .iter()
        .map(|record| record.from_node.max(record.to_node))
        .max()
        .unwrap_or(0);

    let entries: BTreeMap<(usize, usize), Weight> = records
        .iter()
        .map(|record| ((record.from_node, record.to_node), record.weight))
        .collect();

    // At most `records.len()` cells are filled, so a missing off-diagonal
    // cell, if any, shows up within the first `records.len() + 1` probed.
    // Nothing is allocated for the matrix until it is known to be complete.
    if let Some((from, to)) = off_diagonal_cells(max_id)
        .take(records.len().saturating_add(1))
        .find(|cell| !entries.contains_key(cell))
    {
        return Err(Error::IncompleteMatrix {
            scenario: id,
            from,
            to,
        });
    }

    let weights: Vec<Vec<Weight>> = (0..=max_id)
        .map(|from| {
            (0..=max_id)
                .map(|to| entries.get(&(from, to)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    Ok(Scenario {
        id,
        weights,
        budget,
    })
}

/// Row-major `(from, to)` pairs of an `(max_id + 1)`-square matrix, diagonal excluded.
fn off_diagonal_cells(max_id: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..=max_id).flat_map(move |from| {
        (0..=max_id)
            .filter(move |&to| to != from)
            .map(move |to| (from, to))
    })
}

#[async_trait::async_trait]
impl ScenarioStreamer for CsvStreamer {
    async fn run_stream(self, sender: Sender<Scenario>) -> Result<(), Error> {
        let scenarios = self.parse_csv_to_scenarios()?;
        let total = scenarios.len();

        tracing::info!(total, path = %self.path.display(), "CsvStreamer: starting transfer");

        for scenario in scenarios {
            if let Err(e) = sender.send(scenario).await {
                tracing::error!(
                    error = %e,
                    "CsvStreamer shutting down: searcher receiver dropped during send"
                );
                return Err(Error::ChannelSendFailed);
            }
        }

        tracing::info!(total, "CsvStreamer: all scenarios transferred");
        Ok(())
    }
}
