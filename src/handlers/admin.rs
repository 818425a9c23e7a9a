// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    engine::rounds,
    error::AppError,
    models::quiz_status::RoundResponse,
    state::AppState,
    store::SharedStore,
};

/// Optional settings for starting a round.
#[derive(Debug, Default, Deserialize)]
pub struct StartParams {
    /// Round length in seconds; the configured default when absent.
    pub duration: Option<i64>,
}

/// Starts round `round`, wiping that round's previous results.
/// Admin action (unauthenticated).
pub async fn start_round(
    State(state): State<AppState>,
    Path(round): Path<i32>,
    Query(params): Query<StartParams>,
) -> Result<Json<RoundResponse>, AppError> {
    let duration = params.duration.unwrap_or(state.config.quiz_duration_secs);
    let status = rounds::start_round(state.store.as_ref(), &state.questions, round, duration).await?;

    Ok(Json(RoundResponse {
        message: format!("Round {} started", status.current_round),
        current_round: status.current_round,
        end_time: status.ends_at,
    }))
}

/// Stops the current round. Teams already playing may still submit.
pub async fn stop_round(State(store): State<SharedStore>) -> Result<Json<RoundResponse>, AppError> {
    let status = rounds::stop_round(store.as_ref()).await?;

    Ok(Json(RoundResponse {
        message: format!("Round {} stopped", status.current_round),
        current_round: status.current_round,
        end_time: status.ends_at,
    }))
}

/// Clears all rounds' scores and returns the quiz to idle.
pub async fn reset_quiz(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    rounds::reset_quiz(store.as_ref()).await?;

    Ok(Json(json!({
        "message": "Quiz and leaderboard have been reset.",
        "currentRound": 0,
    })))
}
