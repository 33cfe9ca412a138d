use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{PortfolioReport, PortfolioRequest};
use crate::routes::validate_ticker_count;
use crate::services::scoring_service::normalize_tickers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/score", post(score_portfolio))
}

pub async fn score_portfolio(
    State(state): State<AppState>,
    Json(request): Json<PortfolioRequest>,
) -> Result<Json<PortfolioReport>, AppError> {
    let tickers: Vec<&str> = request.holdings.iter().map(|h| h.ticker.as_str()).collect();
    let distinct = normalize_tickers(tickers.as_slice()).len();
    info!("POST /portfolio/score - Scoring {} holdings", distinct);
    validate_ticker_count(distinct, state.config.max_tickers_per_request)?;

    let report = state.scoring.portfolio_report(&request.holdings).await;
    Ok(Json(report))
}
