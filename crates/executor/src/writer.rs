use std::io::Write;
use tokio::sync::mpsc::Receiver;

use super::error::Error;
use super::types::Report;

/// Async consumer that writes search reports as CSV rows.
pub struct ReportWriter<W: Write> {
    receiver: Receiver<Report>,
    writer: csv::Writer<W>,
}

impl<W> ReportWriter<W>
where
    W: Write + Send + 'static,
{
    pub fn new(receiver: Receiver<Report>, sink: W) -> Self {
        Self {
            receiver,
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Run the writer asynchronously.
    ///
    /// Writes and flushes one row per report so partial results are visible
    /// while the pipeline is still running. Exits when the receiver is closed
    /// and hands back the underlying sink.
    pub async fn process_reports(mut self) -> Result<W, Error> {
        tracing::info!("Writer ready.");

        let mut written = 0usize;
        while let Some(report) = self.receiver.recv().await {
            self.writer.serialize(&report)?;
            self.writer.flush()?;
            written += 1;
        }

        tracing::info!(written, "Receiver closed, shutting down writer.");
        self.writer
            .into_inner()
            .map_err(|e| Error::IoError(e.into_error()))
    }

    /// Public method that spawns the Writer task onto the Tokio runtime.
    ///
    /// This function consumes the Writer instance (`self`) and returns a JoinHandle,
    /// allowing the pipeline orchestrator to monitor the task.
    pub fn spawn_task(self) -> tokio::task::JoinHandle<Result<W, Error>> {
        tokio::spawn(self.process_reports())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OutcomeKind;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_writes_header_and_rows() {
        let (tx, rx) = mpsc::channel(4);
        let handle = ReportWriter::new(rx, Vec::new()).spawn_task();

        tx.send(Report {
            scenario: 1,
            vertices: 5,
            budget: 1,
            outcome: OutcomeKind::Feasible,
            rescued: "1;2".to_string(),
            cost: Some(1),
        })
        .await
        .unwrap();
        tx.send(Report {
            scenario: 2,
            vertices: 3,
            budget: 0,
            outcome: OutcomeKind::Skipped,
            rescued: String::new(),
            cost: None,
        })
        .await
        .unwrap();
        drop(tx);

        let bytes = handle.await.unwrap().unwrap();
        let output = String::from_utf8(bytes).unwrap();
        assert_eq!(
            output,
            "scenario,vertices,budget,outcome,rescued,cost\n\
             1,5,1,feasible,1;2,1\n\
             2,3,0,skipped,,\n"
        );
    }

    #[tokio::test]
    async fn test_no_reports_writes_nothing() {
        let (tx, rx) = mpsc::channel::<Report>(1);
        drop(tx);

        let bytes = ReportWriter::new(rx, Vec::new())
            .process_reports()
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }
}
