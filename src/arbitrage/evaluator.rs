use std::collections::HashSet;

use super::types::{ArbitrageSignal, PriceExtreme, PriceSpread};
use crate::models::{MarketPrice, ReconciledPairs};
use tracing::debug;

/// Single pass over `entries` keeping the first price for which no later one `beats`.
///
/// A recorded price of exactly zero counts as unset and is replaced by the next entry.
fn scan_extreme(entries: &[MarketPrice], beats: fn(f64, f64) -> bool) -> Option<PriceExtreme> {
    let mut best: Option<PriceExtreme> = None;
    for entry in entries {
        let replace = match &best {
            None => true,
            Some(current) => current.price == 0.0 || beats(entry.price, current.price),
        };
        if replace {
            best = Some(PriceExtreme {
                market: entry.market_name.clone(),
                price: entry.price,
            });
        }
    }
    best
}

/// Highest price; on ties the earliest market wins.
pub fn find_high(entries: &[MarketPrice]) -> Option<PriceExtreme> {
    scan_extreme(entries, |candidate, current| candidate > current)
}

/// Lowest price; on ties the earliest market wins.
pub fn find_low(entries: &[MarketPrice]) -> Option<PriceExtreme> {
    scan_extreme(entries, |candidate, current| candidate < current)
}

/// High and low extremes for one pair, `None` for an empty sequence.
pub fn price_spread(entries: &[MarketPrice]) -> Option<PriceSpread> {
    Some(PriceSpread {
        high: find_high(entries)?,
        low: find_low(entries)?,
    })
}

/// Emit one signal per pair whose high/low ratio is strictly above `ratio_threshold`.
///
/// Pairs quoted by fewer than two distinct markets never signal, nor do pairs whose
/// low price is zero.
pub fn detect(reconciled: &ReconciledPairs, ratio_threshold: f64) -> Vec<ArbitrageSignal> {
    let mut signals = Vec::new();

    for (pair, entries) in reconciled {
        let markets: HashSet<&str> = entries.iter().map(|e| e.market_name.as_str()).collect();
        if markets.len() < 2 {
            continue;
        }
        let Some(spread) = price_spread(entries) else {
            continue;
        };
        let Some(ratio) = spread.ratio() else {
            debug!(pair = %pair, "[DETECT] zero low price, ratio undefined");
            continue;
        };
        if ratio > ratio_threshold {
            signals.push(ArbitrageSignal {
                pair: pair.clone(),
                high_market: spread.high.market,
                high_price: spread.high.price,
                low_market: spread.low.market,
                low_price: spread.low.price,
                ratio,
            });
        }
    }

    signals
}
