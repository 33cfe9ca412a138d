use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{Leaderboard, LeaderboardRequest, SecurityScore};
use crate::routes::validate_ticker_count;
use crate::services::scoring_service::normalize_tickers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leaderboard", post(leaderboard))
        .route("/:ticker", get(get_score))
}

pub async fn get_score(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<SecurityScore>, AppError> {
    info!("GET /scores/{} - Scoring ticker", ticker);
    let score = state.scoring.score_ticker(&ticker).await.map_err(|e| {
        error!("Failed to score {}: {}", ticker, e);
        e
    })?;
    Ok(Json(score))
}

pub async fn leaderboard(
    State(state): State<AppState>,
    Json(request): Json<LeaderboardRequest>,
) -> Result<Json<Leaderboard>, AppError> {
    let tickers = normalize_tickers(request.tickers.as_slice());
    info!("POST /scores/leaderboard - Ranking {} tickers (limit {})", tickers.len(), request.limit);
    validate_ticker_count(tickers.len(), state.config.max_tickers_per_request)?;

    let board = state.scoring.leaderboard(tickers.as_slice(), request.limit).await;
    Ok(Json(board))
}
