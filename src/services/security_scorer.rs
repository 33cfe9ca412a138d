use crate::errors::ScoringError;
use crate::models::{BenchmarkHistory, SecurityMetrics, SecurityScore, SubScores};
use crate::services::normalizers::{self, SUB_SCORE_SCALE};

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn clamp_sub_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, SUB_SCORE_SCALE)
}

/// Score one security against an optional benchmark.
///
/// Fails only when the snapshot carries no price history. Sub-scores are
/// clamped to [0, 20] and rounded to one decimal; `final_score` is the
/// rounded sum of the unrounded sub-scores.
pub fn score_security(
    metrics: &SecurityMetrics,
    benchmark: Option<&BenchmarkHistory>,
) -> Result<SecurityScore, ScoringError> {
    if metrics.price_history.is_empty() {
        return Err(ScoringError::NoPriceHistory {
            ticker: metrics.ticker.clone(),
        });
    }

    let raw = SubScores {
        financial_health: clamp_sub_score(normalizers::financial_health(metrics) * SUB_SCORE_SCALE),
        profitability: clamp_sub_score(normalizers::profitability(metrics) * SUB_SCORE_SCALE),
        growth: clamp_sub_score(normalizers::growth(metrics) * SUB_SCORE_SCALE),
        momentum: clamp_sub_score(normalizers::momentum(metrics, benchmark).sub_score()),
        stability: clamp_sub_score(normalizers::stability(metrics) * SUB_SCORE_SCALE),
    };

    let sub_scores = SubScores {
        financial_health: round1(raw.financial_health),
        profitability: round1(raw.profitability),
        growth: round1(raw.growth),
        momentum: round1(raw.momentum),
        stability: round1(raw.stability),
    };

    Ok(SecurityScore {
        ticker: metrics.ticker.clone(),
        name: metrics.name.clone(),
        logo_url: metrics.logo_url.clone(),
        sector: metrics.sector.clone(),
        price: metrics.price,
        price_change_pct: price_change_pct(metrics.price, metrics.previous_close),
        sub_scores,
        final_score: round1(raw.total()),
        has_fundamentals: metrics.has_fundamentals,
    })
}

/// Signed percentage move from `previous_close` to `price`; 0 when the
/// previous close is not positive.
pub fn price_change_pct(price: f64, previous_close: f64) -> f64 {
    if previous_close > 0.0 {
        (price - previous_close) / previous_close * 100.0
    } else {
        0.0
    }
}
