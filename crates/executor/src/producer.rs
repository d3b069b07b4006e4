use tokio::sync::mpsc::Sender;

use super::{
    error::Error,
    types::{Scenario, ScenarioStreamer},
};

pub struct Producer<S: ScenarioStreamer> {
    streamer: S,
}

impl<S> Producer<S>
where
    S: ScenarioStreamer,
{
    pub fn new(streamer: S) -> Self {
        Producer { streamer }
    }

    pub fn spawn(self, sender: Sender<Scenario>) -> tokio::task::JoinHandle<Result<(), Error>> {
        tracing::info!("Producer ready.");
        tokio::spawn(async move { self.streamer.run_stream(sender).await })
    }
}
