use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::{Notifier, format_signal_message};
use crate::arbitrage::ArbitrageSignal;
use crate::errors::{AppError, Result};

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Bot credentials and destination chat.
#[derive(Debug, Clone, PartialEq)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Numeric id or `@channel` name.
    pub chat_id: String,
}

/// Sends alerts through the Bot API `sendMessage` method.
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    config: TelegramConfig,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            api_url: TELEGRAM_API_URL.to_string(),
            config,
        })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.config.bot_token
        )
    }
}

fn send_message_payload(chat_id: &str, text: &str) -> serde_json::Value {
    json!({
        "chat_id": chat_id,
        "text": text,
        "parse_mode": "HTML",
    })
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, signal: &ArbitrageSignal) -> Result<()> {
        let text = format_signal_message(signal);
        let response = self
            .client
            .post(self.send_message_url())
            .json(&send_message_payload(&self.config.chat_id, &text))
            .send()
            .await
            .map_err(|e| AppError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // URL embeds the bot token.
            return Err(AppError::HttpStatus {
                status,
                url: "telegram sendMessage".into(),
                body,
            });
        }
        debug!(pair = %signal.pair, "[NOTIFY] telegram message sent");
        Ok(())
    }
}
