#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use mercato_backend::config::AppConfig;
use mercato_backend::external::market_data::{MarketDataError, MarketDataProvider};
use mercato_backend::models::{Fundamentals, PriceBar, SecurityMetrics};
use mercato_backend::services::failure_cache::FailureCache;
use mercato_backend::services::ScoringService;

pub fn bars(closes: &[f64]) -> Vec<PriceBar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar {
            timestamp: start + Duration::days(i as i64),
            open: c,
            high: c * 1.01,
            low: c * 0.99,
            close: c,
        })
        .collect()
}

/// Closes growing by `daily` fraction each day from `start`.
pub fn trend(start: f64, daily: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start * (1.0 + daily).powi(i as i32)).collect()
}

pub fn quality_metrics(ticker: &str, sector: &str, closes: &[f64]) -> SecurityMetrics {
    let mut m = SecurityMetrics::from_history(ticker, bars(closes));
    m.name = Some(format!("{} Corp", ticker));
    m.sector = sector.to_string();
    m.market_cap = 1_000.0;
    m.total_debt = 100.0;
    m.total_cash = 100.0;
    m.free_cash_flow = 60.0;
    m.profit_margin = 0.22;
    m.operating_margin = 0.28;
    m.roe = 0.2;
    m.revenue_growth = 0.12;
    m.earnings_growth = 0.08;
    m.beta = 0.9;
    m.fifty_two_week_high = 130.0;
    m.fifty_two_week_low = 100.0;
    m.has_fundamentals = true;
    m
}

pub fn weak_metrics(ticker: &str, sector: &str, closes: &[f64]) -> SecurityMetrics {
    let mut m = SecurityMetrics::from_history(ticker, bars(closes));
    m.sector = sector.to_string();
    m.market_cap = 1_000.0;
    m.total_debt = 2_000.0;
    m.free_cash_flow = -50.0;
    m.profit_margin = -0.1;
    m.operating_margin = -0.05;
    m.roe = -0.2;
    m.revenue_growth = -0.1;
    m.earnings_growth = -0.3;
    m.beta = 1.9;
    m.fifty_two_week_high = 40.0;
    m.fifty_two_week_low = 10.0;
    m.has_fundamentals = true;
    m
}

/// In-memory market data keyed by ticker, counting every history fetch for
/// a security. Snapshots are split back into history and fundamentals so
/// scoring goes through the provider's default `fetch_metrics`.
#[derive(Default)]
pub struct StaticProvider {
    pub securities: HashMap<String, SecurityMetrics>,
    pub benchmark: Option<Vec<PriceBar>>,
    pub fundamentals_offline: bool,
    pub metric_fetches: AtomicUsize,
}

impl StaticProvider {
    pub fn with(mut self, metrics: SecurityMetrics) -> Self {
        self.securities.insert(metrics.ticker.clone(), metrics);
        self
    }

    pub fn with_benchmark(mut self, closes: &[f64]) -> Self {
        self.benchmark = Some(bars(closes));
        self
    }

    /// Every fundamentals call fails the way an expired session does.
    pub fn without_fundamentals(mut self) -> Self {
        self.fundamentals_offline = true;
        self
    }

    pub fn fetches(&self) -> usize {
        self.metric_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    async fn fetch_history(&self, ticker: &str, _days: u32) -> Result<Vec<PriceBar>, MarketDataError> {
        if ticker == "SPY" {
            return self
                .benchmark
                .clone()
                .ok_or_else(|| MarketDataError::Network("benchmark offline".into()));
        }
        self.metric_fetches.fetch_add(1, Ordering::SeqCst);
        self.securities
            .get(ticker)
            .map(|m| m.price_history.clone())
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, MarketDataError> {
        if self.fundamentals_offline {
            return Err(MarketDataError::Unauthorized);
        }
        let m = self
            .securities
            .get(ticker)
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))?;
        if !m.has_fundamentals {
            return Err(MarketDataError::BadResponse("no fundamentals".into()));
        }
        Ok(Fundamentals {
            name: m.name.clone(),
            logo_url: m.logo_url.clone(),
            sector: Some(m.sector.clone()),
            market_cap: Some(m.market_cap),
            beta: Some(m.beta),
            fifty_two_week_high: Some(m.fifty_two_week_high),
            fifty_two_week_low: Some(m.fifty_two_week_low),
            total_debt: Some(m.total_debt),
            total_cash: Some(m.total_cash),
            free_cash_flow: Some(m.free_cash_flow),
            profit_margin: Some(m.profit_margin),
            operating_margin: Some(m.operating_margin),
            roe: Some(m.roe),
            revenue_growth: Some(m.revenue_growth),
            earnings_growth: Some(m.earnings_growth),
        })
    }
}

pub fn service(provider: Arc<StaticProvider>) -> ScoringService {
    ScoringService::new(provider, FailureCache::new(), &AppConfig::default())
}
