//! Mercato scoring backend.
//!
//! Turns per-security fundamentals and price history into five 0-20
//! category scores, a 0-100 composite per security, a diversification- and
//! stability-adjusted portfolio score, and a handful of plain-text insights.
//! The engine itself (`services::normalizers`, `score_security`,
//! `score_portfolio`, `generate_insights`) is pure; fetching data and serving
//! HTTP live around it.

pub mod app;
pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
mod routes;
pub mod services;
pub mod state;
