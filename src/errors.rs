use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use thiserror::Error;

use crate::external::market_data::MarketDataError;

/// Failure to score a single security.
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("no price history available for {ticker}")]
    NoPriceHistory { ticker: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
    #[error("Rate limited by external provider")]
    RateLimited,
    #[error("External error: {0}")]
    External(String),
    #[error("Scoring error: {0}")]
    Scoring(ScoringError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (StatusCode::TOO_MANY_REQUESTS, headers, "Rate limited").into_response()
            },
            AppError::External(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
            AppError::Scoring(err @ ScoringError::NoPriceHistory { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string()).into_response()
            },
        }
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        AppError::Scoring(value)
    }
}

impl From<MarketDataError> for AppError {
    fn from(value: MarketDataError) -> Self {
        match value {
            MarketDataError::NotFound(_) => AppError::NotFound,
            MarketDataError::RateLimited => AppError::RateLimited,
            other => AppError::External(other.to_string()),
        }
    }
}
