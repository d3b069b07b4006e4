use thiserror::Error;

use common::error::Error as SolverError;
use common::types::Weight;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Channel sender failed: Receiver has been dropped.")]
    ChannelSendFailed,

    #[error("Solver error: {0}")]
    SolverError(#[from] SolverError),

    #[error("Configuration error: {0}")]
    ConfigLoadError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Scenario {scenario}: missing weight for edge {from} -> {to}.")]
    IncompleteMatrix {
        scenario: u64,
        from: usize,
        to: usize,
    },

    #[error("Scenario {scenario}: budget {found} disagrees with earlier budget {expected}.")]
    InconsistentBudget {
        scenario: u64,
        expected: Weight,
        found: Weight,
    },

    #[error("Background task failed: {0}")]
    TaskJoinError(#[from] tokio::task::JoinError),
}
