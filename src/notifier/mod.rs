//! Outbound alerts for detected arbitrage signals.

use async_trait::async_trait;
use tracing::info;

use crate::arbitrage::ArbitrageSignal;
use crate::errors::Result;

pub mod telegram;

pub use telegram::{TelegramConfig, TelegramNotifier};

/// Delivers one alert per signal.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, signal: &ArbitrageSignal) -> Result<()>;
}

/// Notifier used when no chat channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, signal: &ArbitrageSignal) -> Result<()> {
        info!(message = %format_signal_message(signal), "[NOTIFY] log only");
        Ok(())
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Telegram-flavoured HTML alert text.
pub fn format_signal_message(signal: &ArbitrageSignal) -> String {
    format!(
        "ARBITRAGE FOUND!\n<b><i>{pair}</i></b>\nhighest: <b>{high_market}</b>: {high_price}\nlowest: <b>{low_market}</b>: {low_price}\nratio: {ratio:.4}",
        pair = escape_html(&signal.pair),
        high_market = escape_html(&signal.high_market),
        high_price = signal.high_price,
        low_market = escape_html(&signal.low_market),
        low_price = signal.low_price,
        ratio = signal.ratio,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal() -> ArbitrageSignal {
        ArbitrageSignal {
            pair: "BTC/USDT".into(),
            high_market: "Gate<io>".into(),
            high_price: 56_000.0,
            low_market: "B&B".into(),
            low_price: 50_000.0,
            ratio: 1.12,
        }
    }

    #[test]
    fn message_names_pair_and_both_legs() {
        let msg = format_signal_message(&signal());
        assert!(msg.starts_with("ARBITRAGE FOUND!"));
        assert!(msg.contains("<b><i>BTC/USDT</i></b>"));
        assert!(msg.contains("highest: <b>Gate&lt;io&gt;</b>: 56000"));
        assert!(msg.contains("lowest: <b>B&amp;B</b>: 50000"));
        assert!(msg.contains("ratio: 1.1200"));
    }

    #[tokio::test]
    async fn log_notifier_never_fails() {
        assert!(LogNotifier.notify(&signal()).await.is_ok());
    }
}
