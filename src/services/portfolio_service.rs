use std::collections::{HashMap, HashSet};

use crate::models::{Holding, PortfolioScore, PortfolioValue, PositionValue, SecurityScore};
use crate::services::normalizers::SUB_SCORE_SCALE;
use crate::services::security_scorer::round1;

const SINGLE_SECTOR_ADJUSTMENT: f64 = 0.88;
const PER_EXTRA_SECTOR: f64 = 0.03;
const FULLY_DIVERSIFIED_SECTORS: usize = 5;
const STABILITY_ADJUSTMENT_BASE: f64 = 0.92;
const STABILITY_ADJUSTMENT_RANGE: f64 = 0.08;

// Summed in sorted order so the result does not depend on input order.
fn order_independent_mean(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    values.iter().sum::<f64>() / values.len() as f64
}

/// Multiplier for the number of distinct sectors held: 0.88 for one sector,
/// +0.03 per additional sector, 1.00 from five sectors on.
pub fn diversification_adjustment(sector_count: usize) -> f64 {
    if sector_count <= 1 {
        SINGLE_SECTOR_ADJUSTMENT
    } else if sector_count >= FULLY_DIVERSIFIED_SECTORS {
        1.0
    } else {
        SINGLE_SECTOR_ADJUSTMENT + (sector_count - 1) as f64 * PER_EXTRA_SECTOR
    }
}

/// Multiplier in [0.92, 1.00] driven by mean stability on the 0-20 scale.
pub fn stability_adjustment(mean_stability: f64) -> f64 {
    STABILITY_ADJUSTMENT_BASE + (mean_stability / SUB_SCORE_SCALE) * STABILITY_ADJUSTMENT_RANGE
}

/// Average composite, penalised multiplicatively for sector concentration
/// and low stability. An empty collection scores 0.
pub fn score_portfolio(scores: &[SecurityScore]) -> PortfolioScore {
    if scores.is_empty() {
        return PortfolioScore::empty();
    }

    let average_score = order_independent_mean(scores.iter().map(|s| s.final_score).collect());
    let mean_stability = order_independent_mean(scores.iter().map(|s| s.sub_scores.stability).collect());

    let sector_count = scores
        .iter()
        .map(|s| s.sector.as_str())
        .collect::<HashSet<_>>()
        .len();

    let div_adj = diversification_adjustment(sector_count);
    let stab_adj = stability_adjustment(mean_stability);

    PortfolioScore {
        score: round1(average_score * div_adj * stab_adj),
        average_score,
        sector_count,
        mean_stability,
        diversification_adjustment: div_adj,
        stability_adjustment: stab_adj,
    }
}

/// Market value and today's move for every holding with a positive share
/// count. `None` when nothing is held.
pub fn value_holdings(scores: &[SecurityScore], holdings: &[Holding]) -> Option<PortfolioValue> {
    let by_ticker: HashMap<&str, &SecurityScore> =
        scores.iter().map(|s| (s.ticker.as_str(), s)).collect();

    let positions: Vec<PositionValue> = holdings
        .iter()
        .filter_map(|h| {
            let shares = h.held_shares()?;
            let score = by_ticker.get(h.ticker.as_str())?;
            let change_per_share = score.price_change_pct / 100.0 * score.price;
            Some(PositionValue {
                ticker: score.ticker.clone(),
                shares,
                value: score.price * shares,
                daily_change: change_per_share * shares,
            })
        })
        .collect();

    if positions.is_empty() {
        return None;
    }

    let total_value: f64 = positions.iter().map(|p| p.value).sum();
    let total_daily_change: f64 = positions.iter().map(|p| p.daily_change).sum();
    let opening_value = total_value - total_daily_change;
    let daily_change_pct = if opening_value != 0.0 {
        total_daily_change / opening_value * 100.0
    } else {
        0.0
    };

    Some(PortfolioValue {
        total_value,
        total_daily_change,
        daily_change_pct,
        positions,
    })
}
