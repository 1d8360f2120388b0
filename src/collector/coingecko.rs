use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::debug;
use url::Url;

use super::TickerSource;
use crate::errors::{AppError, Result};
use crate::models::{ExchangeDirectoryEntry, ExchangeSnapshot, TickerObservation};

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Treat JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct DirectoryMsg {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExchangeMsg {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    tickers: Vec<TickerMsg>,
}

#[derive(Debug, Default, Deserialize)]
struct TickerMsg {
    #[serde(default, deserialize_with = "null_as_default")]
    base: String,
    #[serde(default, deserialize_with = "null_as_default")]
    target: String,
    #[serde(default, deserialize_with = "null_as_default")]
    last: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    volume: f64,
    #[serde(default)]
    trust_score: Option<String>,
}

impl From<DirectoryMsg> for ExchangeDirectoryEntry {
    fn from(msg: DirectoryMsg) -> Self {
        Self {
            id: msg.id,
            name: msg.name,
        }
    }
}

impl From<ExchangeMsg> for ExchangeSnapshot {
    fn from(msg: ExchangeMsg) -> Self {
        Self {
            exchange_name: msg.name,
            observations: msg
                .tickers
                .into_iter()
                .map(|t| TickerObservation {
                    base_symbol: t.base,
                    quote_symbol: t.target,
                    last_price: t.last,
                    volume: t.volume,
                    trust_score: t.trust_score,
                })
                .collect(),
        }
    }
}

/// HTTP client for the CoinGecko `/exchanges` endpoints.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: Url,
}

impl CoinGeckoClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!("not a base URL: {base_url}")));
        }
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// `{base}/exchanges/list`
    pub fn directory_url(&self) -> Url {
        self.endpoint(&["exchanges", "list"])
    }

    /// `{base}/exchanges/{id}`
    pub fn exchange_url(&self, exchange_id: &str) -> Url {
        self.endpoint(&["exchanges", exchange_id])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can carry path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "[HTTP] GET");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::HttpStatus {
                status,
                url: url.to_string(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl TickerSource for CoinGeckoClient {
    async fn exchange_directory(&self) -> Result<Vec<ExchangeDirectoryEntry>> {
        let entries: Vec<DirectoryMsg> = self.get_json(self.directory_url()).await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    async fn exchange_snapshot(&self, exchange_id: &str) -> Result<ExchangeSnapshot> {
        let msg: ExchangeMsg = self.get_json(self.exchange_url(exchange_id)).await?;
        Ok(msg.into())
    }
}
