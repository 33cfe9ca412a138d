mod holding;
mod report;
mod score;
mod security;

pub use holding::{Holding, PortfolioValue, PositionValue};
pub use report::{Leaderboard, LeaderboardRequest, PortfolioReport, PortfolioRequest, ScoredBatch};
pub use score::{PortfolioScore, RankedScore, SecurityScore, SubScores};
pub use security::{BenchmarkHistory, Fundamentals, PriceBar, SecurityMetrics, UNKNOWN_SECTOR};
