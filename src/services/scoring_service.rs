use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::external::market_data::MarketDataProvider;
use crate::models::{
    BenchmarkHistory, Holding, Leaderboard, PortfolioReport, RankedScore, ScoredBatch,
    SecurityScore,
};
use crate::services::failure_cache::{FailureCache, FailureKind};
use crate::services::insight_service::generate_insights;
use crate::services::portfolio_service::{score_portfolio, value_holdings};
use crate::services::security_scorer::score_security;

/// Fetches market data and runs the scoring engine over batches of tickers.
///
/// Tickers are scored independently and concurrently; the batch is only
/// joined again for portfolio aggregation and insights.
#[derive(Clone)]
pub struct ScoringService {
    provider: Arc<dyn MarketDataProvider>,
    failure_cache: FailureCache,
    benchmark_ticker: String,
    history_days: u32,
    concurrency: usize,
}

/// Trim, uppercase, drop empties and duplicates (first occurrence kept).
pub fn normalize_tickers<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|t| t.as_ref().trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

impl ScoringService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        failure_cache: FailureCache,
        config: &AppConfig,
    ) -> Self {
        Self {
            provider,
            failure_cache,
            benchmark_ticker: config.benchmark_ticker.clone(),
            history_days: config.history_days,
            concurrency: config.scoring_concurrency.max(1),
        }
    }

    /// Benchmark history, or `None` when the index is unavailable. Momentum
    /// degrades to its neutral score in that case.
    async fn fetch_benchmark(&self) -> Option<BenchmarkHistory> {
        match self
            .provider
            .fetch_history(&self.benchmark_ticker, self.history_days)
            .await
        {
            Ok(bars) if !bars.is_empty() => Some(BenchmarkHistory::new(&self.benchmark_ticker, bars)),
            Ok(_) => {
                warn!("Benchmark {} returned no history; momentum will be neutral", self.benchmark_ticker);
                None
            }
            Err(e) => {
                warn!("Benchmark {} unavailable ({}); momentum will be neutral", self.benchmark_ticker, e);
                None
            }
        }
    }

    async fn score_one(
        &self,
        ticker: &str,
        benchmark: Option<&BenchmarkHistory>,
    ) -> Result<SecurityScore, AppError> {
        if let Some(failure) = self.failure_cache.is_failed(ticker) {
            debug!("Skipping {} (cached {:?} failure)", ticker, failure.kind);
            return Err(match failure.kind {
                FailureKind::NotFound => AppError::NotFound,
                FailureKind::RateLimited => AppError::RateLimited,
                FailureKind::ProviderError => {
                    AppError::External(format!("recent provider failure for {}", ticker))
                }
            });
        }

        let metrics = match self.provider.fetch_metrics(ticker, self.history_days).await {
            Ok(m) => m,
            Err(e) => {
                self.failure_cache.record_failure(ticker, FailureKind::from(&e));
                return Err(e.into());
            }
        };

        let score = score_security(&metrics, benchmark).map_err(|e| {
            self.failure_cache.record_failure(ticker, FailureKind::NotFound);
            AppError::from(e)
        })?;

        self.failure_cache.clear(ticker);
        info!("Scored {}: {:.1}/100", ticker, score.final_score);
        Ok(score)
    }

    /// Score a single ticker against the configured benchmark.
    pub async fn score_ticker(&self, ticker: &str) -> Result<SecurityScore, AppError> {
        let ticker = normalize_tickers(&[ticker])
            .pop()
            .ok_or_else(|| AppError::Validation("Ticker cannot be empty".into()))?;
        let benchmark = self.fetch_benchmark().await;
        self.score_one(&ticker, benchmark.as_ref()).await
    }

    /// Score every ticker, at most `concurrency` at a time. Results keep the
    /// input order; tickers that fail are reported in `failed`.
    pub async fn score_tickers<S: AsRef<str>>(&self, tickers: &[S]) -> ScoredBatch {
        let tickers = normalize_tickers(tickers);
        if tickers.is_empty() {
            return ScoredBatch { scores: Vec::new(), failed: Vec::new() };
        }

        let benchmark = self.fetch_benchmark().await;
        let benchmark = benchmark.as_ref();

        let outcomes: Vec<(String, Result<SecurityScore, AppError>)> = stream::iter(tickers)
            .map(|ticker| async move {
                let outcome = self.score_one(&ticker, benchmark).await;
                (ticker, outcome)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut scores = Vec::with_capacity(outcomes.len());
        let mut failed = Vec::new();
        for (ticker, outcome) in outcomes {
            match outcome {
                Ok(score) => scores.push(score),
                Err(e) => {
                    warn!("Skipping ticker {} due to data error: {}", ticker, e);
                    failed.push(ticker);
                }
            }
        }

        ScoredBatch { scores, failed }
    }

    /// Score the holdings, then aggregate whatever could be scored.
    pub async fn portfolio_report(&self, holdings: &[Holding]) -> PortfolioReport {
        let holdings = merge_holdings(holdings);
        let tickers: Vec<&str> = holdings.iter().map(|h| h.ticker.as_str()).collect();
        let ScoredBatch { scores, failed } = self.score_tickers(tickers.as_slice()).await;

        let portfolio = score_portfolio(&scores);
        let insights = generate_insights(&scores);
        let value = value_holdings(&scores, &holdings);

        info!(
            "Portfolio of {} holdings scored {:.1} ({} failed, {} sectors)",
            holdings.len(),
            portfolio.score,
            failed.len(),
            portfolio.sector_count
        );

        PortfolioReport {
            portfolio,
            securities: scores,
            insights,
            value,
            failed,
        }
    }

    /// Highest composite first; equal scores keep input order.
    pub async fn leaderboard<S: AsRef<str>>(&self, tickers: &[S], limit: usize) -> Leaderboard {
        let ScoredBatch { mut scores, failed } = self.score_tickers(tickers).await;
        scores.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

        let entries = scores
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, score)| RankedScore { rank: i + 1, score })
            .collect();

        Leaderboard { entries, failed }
    }
}

/// Normalized tickers with the first share count seen for each.
fn merge_holdings(holdings: &[Holding]) -> Vec<Holding> {
    let mut seen = HashSet::new();
    holdings
        .iter()
        .filter_map(|h| {
            let ticker = normalize_tickers(&[h.ticker.as_str()]).pop()?;
            seen.insert(ticker.clone())
                .then(|| Holding::new(ticker, h.shares))
        })
        .collect()
}
