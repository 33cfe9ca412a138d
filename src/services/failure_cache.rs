use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::external::market_data::MarketDataError;

/// A ticker whose last fetch failed, and for how long to believe it.
#[derive(Debug, Clone)]
pub struct FailureInfo {
    pub failed_at: DateTime<Utc>,
    pub kind: FailureKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    RateLimited,
    ProviderError,
}

impl FailureKind {
    pub fn ttl(self) -> Duration {
        match self {
            FailureKind::NotFound => Duration::hours(24),
            FailureKind::RateLimited => Duration::hours(1),
            FailureKind::ProviderError => Duration::hours(6),
        }
    }
}

impl From<&MarketDataError> for FailureKind {
    fn from(err: &MarketDataError) -> Self {
        match err {
            MarketDataError::NotFound(_) => FailureKind::NotFound,
            MarketDataError::RateLimited => FailureKind::RateLimited,
            _ => FailureKind::ProviderError,
        }
    }
}

impl FailureInfo {
    fn expires_at(&self) -> DateTime<Utc> {
        self.failed_at + self.kind.ttl()
    }
}

/// Shared record of tickers the market data provider recently failed on,
/// so a batch does not hammer the provider with requests known to fail.
#[derive(Clone, Default)]
pub struct FailureCache {
    cache: Arc<DashMap<String, FailureInfo>>,
}

impl FailureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recorded failure for `ticker`, if it has not expired yet.
    pub fn is_failed(&self, ticker: &str) -> Option<FailureInfo> {
        let info = self.cache.get(ticker)?.value().clone();
        if Utc::now() < info.expires_at() {
            return Some(info);
        }
        self.cache.remove(ticker);
        None
    }

    pub fn record_failure(&self, ticker: &str, kind: FailureKind) {
        self.record_failure_at(ticker, kind, Utc::now());
    }

    fn record_failure_at(&self, ticker: &str, kind: FailureKind, failed_at: DateTime<Utc>) {
        self.cache
            .insert(ticker.to_string(), FailureInfo { failed_at, kind });
    }

    pub fn clear(&self, ticker: &str) {
        self.cache.remove(ticker);
    }

    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        self.cache.retain(|_, info| now < info.expires_at());
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
