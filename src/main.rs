use anyhow::Result;
use ticker_arbitrage::{
    aggregator,
    collector::CoinGeckoClient,
    config::AppConfig,
    notifier::{LogNotifier, Notifier, TelegramNotifier},
    utils,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    tracing::info!(
        api_url = %config.api_url,
        quote = %config.detection.quote_symbol,
        min_volume = config.detection.min_volume,
        ratio_threshold = config.detection.ratio_threshold,
        enabled_markets = config.detection.enabled_markets.len(),
        interval_secs = config.cycle_interval.as_secs(),
        "[INIT] ticker-arbitrage starting"
    );

    let source = CoinGeckoClient::new(&config.api_url, config.fetch.request_timeout)?;

    let notifier: Box<dyn Notifier> = match config.telegram.clone() {
        Some(telegram) => {
            tracing::info!(chat_id = %telegram.chat_id, "[INIT] telegram notifications enabled");
            Box::new(TelegramNotifier::new(telegram, config.fetch.request_timeout)?)
        }
        None => {
            tracing::info!("[INIT] telegram not configured, alerts go to the log");
            Box::new(LogNotifier)
        }
    };

    aggregator::run_forever(
        &source,
        notifier.as_ref(),
        &config.detection,
        &config.fetch,
        config.cycle_interval,
    )
    .await?;
    Ok(())
}
