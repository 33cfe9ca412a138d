use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::models::{Fundamentals, PriceBar, SecurityMetrics};

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("provider rejected the session")]
    Unauthorized,

    #[error("ticker not found: {0}")]
    NotFound(String),
}

/// Source of per-ticker snapshots and index history.
///
/// Implementations own retries, rate limits and field mapping; the scorer
/// only sees the resulting [`SecurityMetrics`].
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars, oldest first, covering roughly the last `days` days.
    async fn fetch_history(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<Vec<PriceBar>, MarketDataError>;

    /// Company profile and financial ratios.
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, MarketDataError>;

    /// Full scoring snapshot. Only a failed history fetch is an error; when
    /// fundamentals are unavailable the snapshot keeps its defaults and
    /// reports `has_fundamentals == false`.
    async fn fetch_metrics(
        &self,
        ticker: &str,
        days: u32,
    ) -> Result<SecurityMetrics, MarketDataError> {
        let history = self.fetch_history(ticker, days).await?;
        let mut metrics = SecurityMetrics::from_history(ticker, history);

        match self.fetch_fundamentals(ticker).await {
            Ok(fundamentals) => fundamentals.apply_to(&mut metrics),
            Err(e) => warn!("No fundamentals for {}, scoring with defaults: {}", ticker, e),
        }

        Ok(metrics)
    }
}
