// src/feeds/traits.rs
use crate::types::{DecisionSignal, MarketSnapshot};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Source of per-tick market snapshots. Implementations spawn their own
/// producer task and push into the channel; a dropped sender ends the
/// session.
#[async_trait]
pub trait SnapshotProducer: Send + Sync {
    async fn subscribe(&mut self, sender: mpsc::Sender<MarketSnapshot>) -> Result<()>;
}

/// Source of per-tick decision signals. Called synchronously by the
/// orchestrator once per snapshot.
pub trait SignalProducer: Send {
    fn name(&self) -> &str;

    fn next_signal(&mut self, snapshot: &MarketSnapshot) -> DecisionSignal;
}
