use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use mercato_backend::app;
use mercato_backend::config::AppConfig;
use mercato_backend::external::market_data::MarketDataProvider;
use mercato_backend::external::yahoo::YahooProvider;
use mercato_backend::logging::{init_logging, LoggingConfig};
use mercato_backend::services::failure_cache::FailureCache;
use mercato_backend::services::ScoringService;
use mercato_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        "Benchmark {}, {} days of history, {} concurrent fetches",
        config.benchmark_ticker,
        config.history_days,
        config.scoring_concurrency
    );

    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooProvider::new());
    let failure_cache = FailureCache::new();
    let sweeper = failure_cache.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            tick.tick().await;
            sweeper.cleanup_expired();
        }
    });
    let scoring = ScoringService::new(provider, failure_cache, &config);

    let state = AppState {
        config: Arc::new(config.clone()),
        scoring,
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Mercato backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
