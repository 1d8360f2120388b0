//! Cycle orchestration: collect, reconcile, detect, notify.

use std::time::Duration;

use crate::{
    arbitrage::detect,
    collector::{BatchThrottle, TickerSource, collect},
    config::{DetectionConfig, FetchConfig},
    errors::Result,
    notifier::Notifier,
    reconciler::reconcile,
};
use tracing::{error, info, warn};

/// Counters describing one completed cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub exchanges: usize,
    pub failed_exchanges: usize,
    pub pairs: usize,
    pub signals: usize,
    pub failed_notifications: usize,
}

/// Run one full pass. All intermediate state is local to the call.
///
/// Fails only when the exchange directory cannot be fetched.
pub async fn run_cycle<S, N>(
    source: &S,
    notifier: &N,
    detection: &DetectionConfig,
    fetch: &FetchConfig,
) -> Result<CycleReport>
where
    S: TickerSource + ?Sized,
    N: Notifier + ?Sized,
{
    let mut throttle = BatchThrottle::new(fetch.batch_size, fetch.batch_pause);
    let collected = collect(source, &mut throttle).await?;

    let reconciled = reconcile(
        &collected.snapshots,
        &detection.quote_symbol,
        detection.min_volume,
        &detection.enabled_markets,
    );
    let signals = detect(&reconciled, detection.ratio_threshold);

    let mut report = CycleReport {
        exchanges: collected.snapshots.len(),
        failed_exchanges: collected.failed.len(),
        pairs: reconciled.len(),
        signals: signals.len(),
        failed_notifications: 0,
    };

    for signal in &signals {
        info!(
            pair = %signal.pair,
            high_market = %signal.high_market,
            high_price = signal.high_price,
            low_market = %signal.low_market,
            low_price = signal.low_price,
            ratio = signal.ratio,
            "[OPP] arbitrage found"
        );
        if let Err(e) = notifier.notify(signal).await {
            report.failed_notifications += 1;
            warn!(pair = %signal.pair, error = %e, "[NOTIFY] delivery failed");
        }
    }

    Ok(report)
}

/// Repeat [`run_cycle`] every `interval` until Ctrl-C.
///
/// A directory failure on the first cycle is returned; later ones are logged and the
/// cycle is skipped.
pub async fn run_forever<S, N>(
    source: &S,
    notifier: &N,
    detection: &DetectionConfig,
    fetch: &FetchConfig,
    interval: Duration,
) -> Result<()>
where
    S: TickerSource + ?Sized,
    N: Notifier + ?Sized,
{
    let mut cycles: u64 = 0;
    loop {
        cycles += 1;
        let outcome = tokio::select! {
            outcome = run_cycle(source, notifier, detection, fetch) => outcome,
            _ = tokio::signal::ctrl_c() => {
                info!("[CYCLE] interrupted, shutting down");
                return Ok(());
            }
        };

        match outcome {
            Ok(report) => info!(
                cycle = cycles,
                exchanges = report.exchanges,
                failed_exchanges = report.failed_exchanges,
                pairs = report.pairs,
                signals = report.signals,
                failed_notifications = report.failed_notifications,
                "[CYCLE] completed"
            ),
            Err(e) if cycles == 1 => return Err(e),
            Err(e) => error!(cycle = cycles, error = %e, "[CYCLE] aborted"),
        }

        info!(sleep_secs = interval.as_secs(), "[CYCLE] sleeping");
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("[CYCLE] interrupted, shutting down");
                return Ok(());
            }
        }
    }
}
