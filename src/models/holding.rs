use serde::{Deserialize, Serialize};

// A ticker the user follows, optionally with a share count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    #[serde(default)]
    pub shares: Option<f64>,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, shares: Option<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            shares,
        }
    }

    /// Share count when the position is actually held, `None` when only tracked.
    pub fn held_shares(&self) -> Option<f64> {
        self.shares.filter(|s| *s > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionValue {
    pub ticker: String,
    pub shares: f64,
    pub value: f64,
    pub daily_change: f64,
}

/// Market value summary over the holdings that carry a share count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValue {
    pub total_value: f64,
    pub total_daily_change: f64,
    pub daily_change_pct: f64,
    pub positions: Vec<PositionValue>,
}
