pub mod config;
pub mod csv_streamer;
pub mod error;
pub mod producer;
pub mod searcher;
pub mod simulator;
pub mod types;
pub mod writer;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tokio::sync::{mpsc, mpsc::Sender};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use csv_streamer::CsvStreamer;
use error::Error;
use producer::Producer;
use searcher::RescueSearcher;
use simulator::SimulatorStreamer;
use types::{DataSource, Report, Scenario};
use writer::ReportWriter;

/// Run the waypoint rescue solver over a stream of scenarios and print a CSV report.
#[derive(Debug, Parser)]
#[command(name = "executor", version)]
struct Cli {
    /// Configuration file (defaults to crates/executor/Config.toml).
    #[arg(long, value_name = "path", global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    source: DataSource,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Pipeline failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so stdout carries only the CSV report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = config::load_config(cli.config.as_deref())?;

    let (scenario_tx, scenario_rx) = mpsc::channel::<Scenario>(config.channel.buffer_size);
    let (report_tx, report_rx) = mpsc::channel::<Report>(config.channel.buffer_size);

    // Spawn tasks
    let producer_handle = spawn_producer(&cli.source, scenario_tx, &config);
    let searcher_handle =
        RescueSearcher::new(scenario_rx, report_tx, config.search.clone()).spawn_task();
    let writer_handle = ReportWriter::new(report_rx, std::io::stdout()).spawn_task();

    let (producer, searcher, writer) =
        tokio::join!(producer_handle, searcher_handle, writer_handle);
    producer??;
    searcher??;
    writer??;

    tracing::info!("Pipeline shut down.");
    Ok(())
}

pub fn spawn_producer(
    source: &DataSource,
    sender: Sender<Scenario>,
    config: &config::Config,
) -> JoinHandle<Result<(), Error>> {
    match source {
        DataSource::Sim => {
            tracing::info!("Starting SimulatorStreamer producer task...");
            let streamer = SimulatorStreamer::new(config.simulator.clone());
            Producer::new(streamer).spawn(sender)
        }
        DataSource::Csv { path } => {
            tracing::info!(path = %path.display(), "Starting CsvStreamer producer task...");
            let streamer = CsvStreamer::new(path.clone());
            Producer::new(streamer).spawn(sender)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_csv_source_with_global_flags() {
        let cli = Cli::try_parse_from(["executor", "csv", "scenarios.csv", "--config", "c.toml", "-vv"])
            .expect("arguments should parse");

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(cli.source, DataSource::Csv { ref path } if path == &PathBuf::from("scenarios.csv")));
    }

    #[test]
    fn cli_requires_a_source() {
        assert!(Cli::try_parse_from(["executor"]).is_err());
        assert!(matches!(
            Cli::try_parse_from(["executor", "sim"]).map(|cli| cli.source),
            Ok(DataSource::Sim)
        ));
    }
}
