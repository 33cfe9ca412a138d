use serde::{Deserialize, Serialize};

use crate::models::{Holding, PortfolioScore, PortfolioValue, RankedScore, SecurityScore};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// POST body for the portfolio scoring endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioRequest {
    pub holdings: Vec<Holding>,
}

/// POST body for the leaderboard endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardRequest {
    pub tickers: Vec<String>,

    /// Maximum entries to return (default 500)
    #[serde(default = "default_leaderboard_limit")]
    pub limit: usize,
}

fn default_leaderboard_limit() -> usize {
    500
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Scores for a batch of tickers; tickers that could not be scored are listed
/// in `failed` and left out of `scores`.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredBatch {
    pub scores: Vec<SecurityScore>,
    pub failed: Vec<String>,
}

/// Response returned by `POST /api/portfolio/score`.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    pub portfolio: PortfolioScore,
    pub securities: Vec<SecurityScore>,
    pub insights: Vec<String>,
    pub value: Option<PortfolioValue>,
    pub failed: Vec<String>,
}

/// Response returned by `POST /api/scores/leaderboard`.
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<RankedScore>,
    pub failed: Vec<String>,
}
