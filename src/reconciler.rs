//! Reconciliation of per-exchange snapshots into per-pair price lists.

use std::collections::HashSet;

use crate::models::{ExchangeSnapshot, MarketPrice, ReconciledPairs, TickerObservation};

/// Exchange allow-list. Entries are stored lower-cased and lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledMarkets {
    names: HashSet<String>,
}

impl EnabledMarkets {
    pub fn contains(&self, exchange_name: &str) -> bool {
        self.names.contains(&exchange_name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for EnabledMarkets {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let names = iter
            .into_iter()
            .map(|name| name.as_ref().trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self { names }
    }
}

/// Quote match is exact and case-sensitive.
fn quote_matches(observation: &TickerObservation, quote_symbol: &str) -> bool {
    observation.quote_symbol == quote_symbol
}

/// Inclusive lower bound.
fn has_liquidity(observation: &TickerObservation, min_volume: f64) -> bool {
    observation.volume >= min_volume
}

/// Merge snapshots into `pair -> [(market, price)]`.
///
/// Snapshots with an empty exchange name are skipped. An observation survives only if
/// its quote equals `quote_symbol`, its volume is at least `min_volume` and its
/// exchange is in `enabled_markets`. Entries keep snapshot order, then observation
/// order. Pairs with no surviving observation are absent from the result.
pub fn reconcile(
    snapshots: &[ExchangeSnapshot],
    quote_symbol: &str,
    min_volume: f64,
    enabled_markets: &EnabledMarkets,
) -> ReconciledPairs {
    let mut pairs = ReconciledPairs::new();

    for snapshot in snapshots {
        if snapshot.exchange_name.is_empty() {
            continue;
        }
        if !enabled_markets.contains(&snapshot.exchange_name) {
            continue;
        }
        for observation in &snapshot.observations {
            if !quote_matches(observation, quote_symbol) || !has_liquidity(observation, min_volume)
            {
                continue;
            }
            pairs
                .entry(observation.pair_key())
                .or_default()
                .push(MarketPrice::new(&snapshot.exchange_name, observation.last_price));
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(base: &str, quote: &str, last: f64, volume: f64) -> TickerObservation {
        TickerObservation {
            base_symbol: base.into(),
            quote_symbol: quote.into(),
            last_price: last,
            volume,
            trust_score: None,
        }
    }

    fn snap(name: &str, observations: Vec<TickerObservation>) -> ExchangeSnapshot {
        ExchangeSnapshot {
            exchange_name: name.into(),
            observations,
        }
    }

    fn markets(names: &[&str]) -> EnabledMarkets {
        names.iter().collect()
    }

    #[test]
    fn allow_list_is_case_insensitive() {
        let enabled = markets(&["binance", " Gate "]);
        assert!(enabled.contains("Binance"));
        assert!(enabled.contains("BINANCE"));
        assert!(enabled.contains("gate"));
        assert!(!enabled.contains("kraken"));
        assert_eq!(enabled.len(), 2);
    }

    #[test]
    fn volume_bound_is_inclusive() {
        let snapshots = vec![snap(
            "binance",
            vec![obs("BTC", "USDT", 100.0, 29_999.0), obs("ETH", "USDT", 10.0, 30_000.0)],
        )];
        let pairs = reconcile(&snapshots, "USDT", 30_000.0, &markets(&["binance"]));
        assert!(!pairs.contains_key("BTC/USDT"));
        assert_eq!(pairs["ETH/USDT"], vec![MarketPrice::new("binance", 10.0)]);
    }

    #[test]
    fn quote_match_is_case_sensitive() {
        let snapshots = vec![snap(
            "binance",
            vec![obs("BTC", "usdt", 100.0, 1.0), obs("BTC", "BTC", 1.0, 1.0)],
        )];
        let pairs = reconcile(&snapshots, "USDT", 0.0, &markets(&["binance"]));
        assert!(pairs.is_empty());
    }

    #[test]
    fn exchange_name_kept_as_reported() {
        let snapshots = vec![snap("Binance", vec![obs("BTC", "USDT", 100.0, 1.0)])];
        let pairs = reconcile(&snapshots, "USDT", 0.0, &markets(&["binance"]));
        assert_eq!(pairs["BTC/USDT"][0].market_name, "Binance");
    }

    #[test]
    fn skips_unnamed_and_disabled_exchanges() {
        let snapshots = vec![
            snap("", vec![obs("BTC", "USDT", 1.0, 1.0)]),
            snap("kraken", vec![obs("BTC", "USDT", 2.0, 1.0)]),
            snap("gate", vec![obs("BTC", "USDT", 3.0, 1.0)]),
        ];
        let pairs = reconcile(&snapshots, "USDT", 0.0, &markets(&["gate", ""]));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs["BTC/USDT"], vec![MarketPrice::new("gate", 3.0)]);
    }

    #[test]
    fn preserves_arrival_order_and_duplicates() {
        let snapshots = vec![
            snap("gate", vec![obs("BTC", "USDT", 300.0, 1.0)]),
            snap(
                "binance",
                vec![obs("BTC", "USDT", 100.0, 1.0), obs("BTC", "USDT", 200.0, 1.0)],
            ),
        ];
        let pairs = reconcile(&snapshots, "USDT", 0.0, &markets(&["gate", "binance"]));
        assert_eq!(
            pairs["BTC/USDT"],
            vec![
                MarketPrice::new("gate", 300.0),
                MarketPrice::new("binance", 100.0),
                MarketPrice::new("binance", 200.0),
            ]
        );
    }

    #[test]
    fn defaulted_observation_fails_filters() {
        let snapshots = vec![snap("binance", vec![TickerObservation::default()])];
        let pairs = reconcile(&snapshots, "USDT", 30_000.0, &markets(&["binance"]));
        assert!(pairs.is_empty());
    }
}
