use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// One daily OHLC sample as delivered by the market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Point-in-time snapshot of everything the scorer needs for one ticker.
///
/// Fundamental fields the provider could not supply fall back to neutral
/// defaults (0 for ratios and balances, 1 for beta and market cap) rather
/// than failing the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityMetrics {
    pub ticker: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default = "default_sector")]
    pub sector: String,
    pub price: f64,
    pub previous_close: f64,
    #[serde(default)]
    pub total_debt: f64,
    #[serde(default)]
    pub total_cash: f64,
    #[serde(default)]
    pub free_cash_flow: f64,
    #[serde(default = "default_one")]
    pub market_cap: f64,
    #[serde(default)]
    pub profit_margin: f64,
    #[serde(default)]
    pub operating_margin: f64,
    #[serde(default)]
    pub roe: f64,
    #[serde(default)]
    pub revenue_growth: f64,
    #[serde(default)]
    pub earnings_growth: f64,
    #[serde(default = "default_one")]
    pub beta: f64,
    #[serde(default)]
    pub fifty_two_week_high: f64,
    #[serde(default)]
    pub fifty_two_week_low: f64,
    /// Ascending by timestamp, ideally covering the trailing year.
    #[serde(default)]
    pub price_history: Vec<PriceBar>,
    /// False when every fundamental above is a default because the provider
    /// returned none.
    #[serde(default)]
    pub has_fundamentals: bool,
}

pub const UNKNOWN_SECTOR: &str = "Unknown";

fn default_sector() -> String {
    UNKNOWN_SECTOR.to_string()
}

fn default_one() -> f64 {
    1.0
}

impl SecurityMetrics {
    /// Snapshot with every fundamental at its default, priced off the last
    /// two closes of `price_history`.
    pub fn from_history(ticker: impl Into<String>, price_history: Vec<PriceBar>) -> Self {
        let price = price_history.last().map(|b| b.close).unwrap_or(0.0);
        let previous_close = match price_history.len() {
            0 | 1 => price,
            n => price_history[n - 2].close,
        };

        Self {
            ticker: ticker.into(),
            name: None,
            logo_url: None,
            sector: default_sector(),
            price,
            previous_close,
            total_debt: 0.0,
            total_cash: 0.0,
            free_cash_flow: 0.0,
            market_cap: 1.0,
            profit_margin: 0.0,
            operating_margin: 0.0,
            roe: 0.0,
            revenue_growth: 0.0,
            earnings_growth: 0.0,
            beta: 1.0,
            fifty_two_week_high: 0.0,
            fifty_two_week_low: 0.0,
            price_history,
            has_fundamentals: false,
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.price_history.iter().map(|b| b.close).collect()
    }
}

/// Company profile and balance-sheet figures reported by a provider.
///
/// `None` means the provider did not report the field; applying keeps the
/// snapshot's default for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub sector: Option<String>,
    pub market_cap: Option<f64>,
    pub beta: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub total_debt: Option<f64>,
    pub total_cash: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub roe: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
}

impl Fundamentals {
    /// Layer the reported fields over `metrics`. Non-finite numbers and blank
    /// sectors are ignored.
    pub fn apply_to(self, metrics: &mut SecurityMetrics) {
        let set = |slot: &mut f64, value: Option<f64>| {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                *slot = v;
            }
        };

        if self.name.is_some() {
            metrics.name = self.name;
        }
        if self.logo_url.is_some() {
            metrics.logo_url = self.logo_url;
        }
        if let Some(sector) = self.sector.filter(|s| !s.trim().is_empty()) {
            metrics.sector = sector;
        }

        set(&mut metrics.market_cap, self.market_cap);
        set(&mut metrics.beta, self.beta);
        set(&mut metrics.fifty_two_week_high, self.fifty_two_week_high);
        set(&mut metrics.fifty_two_week_low, self.fifty_two_week_low);
        set(&mut metrics.total_debt, self.total_debt);
        set(&mut metrics.total_cash, self.total_cash);
        set(&mut metrics.free_cash_flow, self.free_cash_flow);
        set(&mut metrics.profit_margin, self.profit_margin);
        set(&mut metrics.operating_margin, self.operating_margin);
        set(&mut metrics.roe, self.roe);
        set(&mut metrics.revenue_growth, self.revenue_growth);
        set(&mut metrics.earnings_growth, self.earnings_growth);

        metrics.has_fundamentals = true;
    }
}

/// Price history of the reference index used for relative momentum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkHistory {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
}

impl BenchmarkHistory {
    pub fn new(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}
