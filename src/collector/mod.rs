//! Snapshot collector.
//!
//! Responsibilities:
//! • Fetch the exchange directory.
//! • Fetch one ticker snapshot per directory entry, pausing between batches.
//! • Skip and log exchanges whose fetch fails instead of aborting the cycle.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::Result;
use crate::models::{ExchangeDirectoryEntry, ExchangeSnapshot};

pub mod coingecko;
pub mod throttle;

pub use coingecko::CoinGeckoClient;
pub use throttle::BatchThrottle;

/// Upstream that lists exchanges and serves their ticker snapshots.
#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn exchange_directory(&self) -> Result<Vec<ExchangeDirectoryEntry>>;

    async fn exchange_snapshot(&self, exchange_id: &str) -> Result<ExchangeSnapshot>;
}

/// Outcome of one collection pass.
#[derive(Debug, Default)]
pub struct CollectReport {
    pub snapshots: Vec<ExchangeSnapshot>,
    /// Ids of exchanges whose snapshot could not be fetched.
    pub failed: Vec<String>,
}

/// Fetch every listed exchange's snapshot, in directory order.
///
/// A directory failure is returned as an error. Per-exchange failures are logged and
/// recorded in [`CollectReport::failed`].
pub async fn collect<S>(source: &S, throttle: &mut BatchThrottle) -> Result<CollectReport>
where
    S: TickerSource + ?Sized,
{
    info!("[COLLECT] collection started");
    let start = Instant::now();

    let directory = source.exchange_directory().await?;
    info!(exchanges = directory.len(), "[COLLECT] directory fetched");

    let mut report = CollectReport {
        snapshots: Vec::with_capacity(directory.len()),
        failed: Vec::new(),
    };

    for entry in &directory {
        match source.exchange_snapshot(&entry.id).await {
            Ok(snapshot) => report.snapshots.push(snapshot),
            Err(e) => {
                warn!(
                    exchange = %entry.id,
                    name = %entry.name,
                    error = %e,
                    "[COLLECT] snapshot fetch failed, skipping"
                );
                report.failed.push(entry.id.clone());
            }
        }
        throttle.tick().await;
    }

    info!(
        snapshots = report.snapshots.len(),
        failed = report.failed.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "[COLLECT] collection finished"
    );
    Ok(report)
}
