//! Configuration loader and application settings.

use std::str::FromStr;
use std::time::Duration;

use crate::collector::coingecko::COINGECKO_API_URL;
use crate::errors::{AppError, Result};
use crate::notifier::TelegramConfig;
use crate::reconciler::EnabledMarkets;

pub const DEFAULT_ENABLED_MARKETS: &[&str] = &[
    "huobi",
    "binance",
    "ftx",
    "mxc",
    "gate",
    "okex",
    "kucoin",
    "hotbit",
    "bittrex",
    "bithumb global",
    "cointiger",
    "bkex",
    "bitforex",
    "bitmax",
    "gemini",
    "bitfinex",
    "poloniex",
    "coinxpro",
    "bilaxy",
];

/// Thresholds consumed by reconciliation and detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Quote currency every pair must be denominated in (e.g., "USDT").
    pub quote_symbol: String,
    /// Minimum ticker volume, inclusive.
    pub min_volume: f64,
    /// Signal when `high / low` is strictly above this.
    pub ratio_threshold: f64,
    pub enabled_markets: EnabledMarkets,
}

/// Rate limiting for the per-exchange fetch loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchConfig {
    pub batch_size: usize,
    pub batch_pause: Duration,
    pub request_timeout: Option<Duration>,
}

/// Consolidated application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the exchange directory / ticker API.
    pub api_url: String,
    pub detection: DetectionConfig,
    pub fetch: FetchConfig,
    /// Delay between the end of one cycle and the start of the next.
    pub cycle_interval: Duration,
    /// Telegram delivery; `None` means log-only alerts.
    pub telegram: Option<TelegramConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = get("COINGECKO_API_URL").unwrap_or_else(|| COINGECKO_API_URL.into());
        let quote_symbol = get("QUOTE_SYMBOL").unwrap_or_else(|| "USDT".into());
        let min_volume: f64 = parse_or(get("MIN_VOLUME"), "MIN_VOLUME", 30_000.0)?;
        let ratio_threshold: f64 = parse_or(get("RATIO_THRESHOLD"), "RATIO_THRESHOLD", 1.1)?;
        let enabled_markets: EnabledMarkets = match get("ENABLED_MARKETS") {
            Some(list) => list.split(',').collect(),
            None => DEFAULT_ENABLED_MARKETS.iter().collect(),
        };
        let cycle_secs: u64 = parse_or(get("CYCLE_INTERVAL_SECS"), "CYCLE_INTERVAL_SECS", 300)?;
        let batch_size: usize = parse_or(get("FETCH_BATCH_SIZE"), "FETCH_BATCH_SIZE", 9)?;
        let pause_ms: u64 = parse_or(get("FETCH_PAUSE_MS"), "FETCH_PAUSE_MS", 1_000)?;
        let timeout_secs: Option<u64> = get("HTTP_TIMEOUT_SECS")
            .map(|raw| parse_value(&raw, "HTTP_TIMEOUT_SECS"))
            .transpose()?;

        let telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            (None, None) => None,
            _ => {
                return Err(AppError::Config(
                    "TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set together".into(),
                ));
            }
        };

        let config = Self {
            api_url,
            detection: DetectionConfig {
                quote_symbol,
                min_volume,
                ratio_threshold,
                enabled_markets,
            },
            fetch: FetchConfig {
                batch_size,
                batch_pause: Duration::from_millis(pause_ms),
                request_timeout: timeout_secs.map(Duration::from_secs),
            },
            cycle_interval: Duration::from_secs(cycle_secs),
            telegram,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let detection = &self.detection;
        if !detection.ratio_threshold.is_finite() || detection.ratio_threshold <= 1.0 {
            return Err(AppError::Config(format!(
                "RATIO_THRESHOLD must be greater than 1, got {}",
                detection.ratio_threshold
            )));
        }
        if !detection.min_volume.is_finite() || detection.min_volume < 0.0 {
            return Err(AppError::Config(format!(
                "MIN_VOLUME must be a non-negative number, got {}",
                detection.min_volume
            )));
        }
        if detection.enabled_markets.is_empty() {
            return Err(AppError::Config("ENABLED_MARKETS is empty".into()));
        }
        if self.fetch.batch_size == 0 {
            return Err(AppError::Config("FETCH_BATCH_SIZE must be at least 1".into()));
        }
        if self.fetch.request_timeout == Some(Duration::ZERO) {
            return Err(AppError::Config("HTTP_TIMEOUT_SECS must be positive".into()));
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(raw: &str, key: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AppError::Config(format!("{key} has invalid value {raw:?}")))
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T> {
    match raw {
        Some(raw) => parse_value(&raw, key),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_reference_setup() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url, COINGECKO_API_URL);
        assert_eq!(config.detection.quote_symbol, "USDT");
        assert_eq!(config.detection.min_volume, 30_000.0);
        assert_eq!(config.detection.ratio_threshold, 1.1);
        assert_eq!(config.detection.enabled_markets.len(), DEFAULT_ENABLED_MARKETS.len());
        assert!(config.detection.enabled_markets.contains("Bithumb Global"));
        assert_eq!(config.fetch.batch_size, 9);
        assert_eq!(config.fetch.batch_pause, Duration::from_secs(1));
        assert_eq!(config.fetch.request_timeout, None);
        assert_eq!(config.cycle_interval, Duration::from_secs(300));
        assert!(config.telegram.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("QUOTE_SYMBOL", "BTC"),
            ("MIN_VOLUME", "10.5"),
            ("RATIO_THRESHOLD", "1.25"),
            ("ENABLED_MARKETS", "Binance, KuCoin,,"),
            ("CYCLE_INTERVAL_SECS", "60"),
            ("FETCH_BATCH_SIZE", "3"),
            ("FETCH_PAUSE_MS", "250"),
            ("HTTP_TIMEOUT_SECS", "15"),
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "@arb"),
        ])
        .unwrap();
        assert_eq!(config.detection.quote_symbol, "BTC");
        assert_eq!(config.detection.min_volume, 10.5);
        assert_eq!(config.detection.ratio_threshold, 1.25);
        assert_eq!(config.detection.enabled_markets.len(), 2);
        assert!(config.detection.enabled_markets.contains("kucoin"));
        assert_eq!(config.cycle_interval, Duration::from_secs(60));
        assert_eq!(config.fetch.batch_size, 3);
        assert_eq!(config.fetch.batch_pause, Duration::from_millis(250));
        assert_eq!(config.fetch.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(
            config.telegram,
            Some(TelegramConfig {
                bot_token: "123:abc".into(),
                chat_id: "@arb".into(),
            })
        );
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(load(&[("MIN_VOLUME", "lots")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("RATIO_THRESHOLD", "1.0")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("RATIO_THRESHOLD", "NaN")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("FETCH_BATCH_SIZE", "0")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("ENABLED_MARKETS", " , ")]), Err(AppError::Config(_))));
        assert!(matches!(load(&[("HTTP_TIMEOUT_SECS", "0")]), Err(AppError::Config(_))));
    }

    #[test]
    fn telegram_needs_both_values() {
        assert!(load(&[("TELEGRAM_BOT_TOKEN", "123:abc")]).is_err());
        assert!(load(&[("TELEGRAM_CHAT_ID", "42")]).is_err());
    }
}
