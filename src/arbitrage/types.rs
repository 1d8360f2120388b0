/// Extremal price for a pair together with the market that reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceExtreme {
    pub market: String,
    pub price: f64,
}

/// Highest and lowest price observed for one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSpread {
    pub high: PriceExtreme,
    pub low: PriceExtreme,
}

impl PriceSpread {
    /// `high / low`, or `None` when the low price cannot be divided by.
    pub fn ratio(&self) -> Option<f64> {
        if self.low.price <= 0.0 {
            return None;
        }
        let ratio = self.high.price / self.low.price;
        ratio.is_finite().then_some(ratio)
    }
}

/// Pair whose high/low price ratio exceeded the configured threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrageSignal {
    pub pair: String,
    pub high_market: String,
    pub high_price: f64,
    pub low_market: String,
    pub low_price: f64,
    pub ratio: f64,
}
