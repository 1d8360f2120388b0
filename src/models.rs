//! Shared data structures used throughout the application.

use std::collections::BTreeMap;

/// One exchange listed by the directory endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeDirectoryEntry {
    pub id: String,
    pub name: String,
}

/// A single tradable pair as reported by one exchange at snapshot time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerObservation {
    pub base_symbol: String,
    pub quote_symbol: String,
    pub last_price: f64,
    pub volume: f64,
    /// Upstream trust rating ("green", "yellow", ...), when reported.
    pub trust_score: Option<String>,
}

impl TickerObservation {
    /// Canonical `BASE/QUOTE` key for this observation.
    pub fn pair_key(&self) -> String {
        format!("{}/{}", self.base_symbol, self.quote_symbol)
    }
}

/// Full ticker set for one exchange at snapshot time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeSnapshot {
    pub exchange_name: String,
    pub observations: Vec<TickerObservation>,
}

/// One market's last price for a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketPrice {
    pub market_name: String,
    pub price: f64,
}

impl MarketPrice {
    pub fn new(market_name: impl Into<String>, price: f64) -> Self {
        Self {
            market_name: market_name.into(),
            price,
        }
    }
}

/// Pair key -> market prices in arrival order.
pub type ReconciledPairs = BTreeMap<String, Vec<MarketPrice>>;
