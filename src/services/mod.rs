pub mod bands;
pub mod failure_cache;
pub mod indicators;
pub mod insight_service;
pub mod normalizers;
pub mod portfolio_service;
pub mod scoring_service;
pub mod security_scorer;

pub use insight_service::generate_insights;
pub use portfolio_service::{score_portfolio, value_holdings};
pub use scoring_service::ScoringService;
pub use security_scorer::score_security;
