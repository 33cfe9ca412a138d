//! Category normalizers.
//!
//! Each function maps one category of raw metrics onto a fraction in [0, 1]
//! through the threshold tables in [`bands`](super::bands). The security
//! scorer multiplies these fractions by [`SUB_SCORE_SCALE`].

use crate::models::{BenchmarkHistory, SecurityMetrics};
use crate::services::bands::{self, BandTable};
use crate::services::indicators::{max_drawdown, trailing_return, ONE_MONTH, THREE_MONTHS};

/// Points available to each category in the 0-100 composite.
pub const SUB_SCORE_SCALE: f64 = 20.0;

/// Momentum sub-score used when relative momentum cannot be measured.
/// Already on the 0-20 scale.
pub const NEUTRAL_MOMENTUM_SCORE: f64 = 12.0;

/// Constant stand-in for forward growth, averaged into the growth category.
pub const FORWARD_GROWTH_PLACEHOLDER: f64 = 0.65;

/// Drawdown term used when the price history cannot produce a drawdown.
pub const UNUSABLE_DRAWDOWN_SCORE: f64 = 0.7;

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn ratio_to_market_cap(value: f64, market_cap: f64, degenerate: f64) -> f64 {
    if market_cap > 0.0 {
        value / market_cap
    } else {
        degenerate
    }
}

/// Leverage, liquidity and cash generation, each relative to market cap.
pub fn financial_health(metrics: &SecurityMetrics) -> f64 {
    let debt_ratio = ratio_to_market_cap(metrics.total_debt, metrics.market_cap, 1.0);
    let cash_ratio = ratio_to_market_cap(metrics.total_cash, metrics.market_cap, 0.0);
    let fcf_ratio = ratio_to_market_cap(metrics.free_cash_flow, metrics.market_cap, 0.0);

    let cash_score = (cash_ratio * 5.0 + 0.3).min(1.0);

    mean(&[
        bands::DEBT_RATIO.score(debt_ratio),
        cash_score,
        bands::FREE_CASH_FLOW_RATIO.score(fcf_ratio),
    ])
}

pub fn profitability(metrics: &SecurityMetrics) -> f64 {
    mean(&[
        bands::PROFIT_MARGIN.score(metrics.profit_margin),
        bands::OPERATING_MARGIN.score(metrics.operating_margin),
        bands::RETURN_ON_EQUITY.score(metrics.roe),
    ])
}

pub fn growth(metrics: &SecurityMetrics) -> f64 {
    mean(&[
        bands::REVENUE_GROWTH.score(metrics.revenue_growth),
        bands::EARNINGS_GROWTH.score(metrics.earnings_growth),
        FORWARD_GROWTH_PLACEHOLDER,
    ])
}

/// Outcome of the momentum normalizer.
///
/// `Neutral` carries no fraction: its sub-score is the fixed
/// [`NEUTRAL_MOMENTUM_SCORE`] and is not passed through the x20 scaling the
/// other categories get.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Momentum {
    Relative(f64),
    Neutral,
}

impl Momentum {
    pub fn sub_score(self) -> f64 {
        match self {
            Momentum::Relative(fraction) => fraction * SUB_SCORE_SCALE,
            Momentum::Neutral => NEUTRAL_MOMENTUM_SCORE,
        }
    }
}

const MOMENTUM_TERMS: [(usize, BandTable); 2] = [
    (ONE_MONTH, bands::RELATIVE_MOMENTUM_1M),
    (THREE_MONTHS, bands::RELATIVE_MOMENTUM_3M),
];

/// Trailing return relative to the benchmark over one and three months.
///
/// A window enters the average only when both series are long enough for
/// it. With no usable window, or no benchmark at all, the result is
/// [`Momentum::Neutral`].
pub fn momentum(metrics: &SecurityMetrics, benchmark: Option<&BenchmarkHistory>) -> Momentum {
    let Some(benchmark) = benchmark else {
        return Momentum::Neutral;
    };

    let closes = metrics.closes();
    let benchmark_closes = benchmark.closes();

    let terms: Vec<f64> = MOMENTUM_TERMS
        .iter()
        .filter_map(|(window, table)| {
            let own = trailing_return(&closes, *window)?;
            let reference = trailing_return(&benchmark_closes, *window)?;
            Some(table.score(own - reference))
        })
        .collect();

    if terms.is_empty() {
        Momentum::Neutral
    } else {
        Momentum::Relative(mean(&terms))
    }
}

/// Beta, 52-week range width and worst drawdown over the supplied history.
///
/// The range term is skipped unless both 52-week bounds are positive.
pub fn stability(metrics: &SecurityMetrics) -> f64 {
    let mut terms = vec![bands::BETA.score(metrics.beta)];

    let high = metrics.fifty_two_week_high;
    let low = metrics.fifty_two_week_low;
    if high > 0.0 && low > 0.0 && metrics.price > 0.0 {
        terms.push(bands::RANGE_VOLATILITY.score((high - low) / low));
    }

    let drawdown_score = max_drawdown(&metrics.closes())
        .map(|dd| bands::MAX_DRAWDOWN.score(dd))
        .unwrap_or(UNUSABLE_DRAWDOWN_SCORE);
    terms.push(drawdown_score);

    mean(&terms)
}
