use serde::{Deserialize, Serialize};

/// The five category scores of one security, each in [0, 20].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub financial_health: f64,
    pub profitability: f64,
    pub growth: f64,
    pub momentum: f64,
    pub stability: f64,
}

impl SubScores {
    pub fn total(&self) -> f64 {
        self.financial_health + self.profitability + self.growth + self.momentum + self.stability
    }
}

// Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityScore {
    pub ticker: String,
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub sector: String,
    pub price: f64,
    /// Signed percentage move since the previous close.
    pub price_change_pct: f64,
    #[serde(flatten)]
    pub sub_scores: SubScores,
    /// Sum of the sub-scores, 0-100.
    pub final_score: f64,
    /// False when the provider had no fundamentals and the financial
    /// categories were scored from defaults.
    pub has_fundamentals: bool,
}

impl SecurityScore {
    /// Company name when known, ticker otherwise.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.ticker)
    }
}

/// Portfolio composite together with the inputs that shaped it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioScore {
    /// 0-100, rounded to one decimal.
    pub score: f64,
    pub average_score: f64,
    pub sector_count: usize,
    pub mean_stability: f64,
    pub diversification_adjustment: f64,
    pub stability_adjustment: f64,
}

impl PortfolioScore {
    pub fn empty() -> Self {
        Self {
            score: 0.0,
            average_score: 0.0,
            sector_count: 0,
            mean_stability: 0.0,
            diversification_adjustment: 0.0,
            stability_adjustment: 0.0,
        }
    }
}

/// A security's position in a ranked list.
#[derive(Debug, Clone, Serialize)]
pub struct RankedScore {
    pub rank: usize,
    #[serde(flatten)]
    pub score: SecurityScore,
}
