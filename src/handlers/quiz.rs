// src/handlers/quiz.rs

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    engine::{question_bank, ranking, rounds, scoring},
    error::AppError,
    handlers::admin::{self, StartParams},
    models::{
        question::PublicQuestion,
        quiz_status::StatusResponse,
        score::{DisqualifyRequest, LeaderboardResponse, SubmitResponse, SubmitScoreRequest},
    },
    state::AppState,
};

/// Query parameters for the `/api/quiz` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct QuizParams {
    pub action: Option<String>,
    pub round: Option<i32>,
    pub duration: Option<i64>,
}

/// Query parameters for the leaderboard.
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardParams {
    pub round: Option<i32>,
}

/// `GET /api/quiz?action=status|questions|leaderboard[&round=N]`
pub async fn quiz_query(
    State(state): State<AppState>,
    Query(params): Query<QuizParams>,
) -> Result<Response, AppError> {
    match params.action.as_deref() {
        Some("status") => Ok(get_status(State(state)).await.into_response()),
        Some("questions") => Ok(get_questions(State(state)).await.into_response()),
        Some("leaderboard") => {
            let params = LeaderboardParams { round: params.round };
            Ok(get_leaderboard(State(state), Query(params)).await?.into_response())
        }
        other => Err(unknown_action("GET", other)),
    }
}

/// `POST /api/quiz?action=start|stop|reset|submit|disqualify`
///
/// The body is read by `submit`, `disqualify` and optionally `start`.
pub async fn quiz_command(
    State(state): State<AppState>,
    Query(params): Query<QuizParams>,
    body: Bytes,
) -> Result<Response, AppError> {
    match params.action.as_deref() {
        Some("start") => {
            let round = params
                .round
                .ok_or_else(|| AppError::BadRequest("Missing round parameter".to_string()))?;
            // Duration may come as a query parameter or as `{"duration": N}` in the body.
            let duration = match params.duration {
                Some(duration) => Some(duration),
                None if body.is_empty() => None,
                None => serde_json::from_slice::<StartParams>(&body)?.duration,
            };
            let params = StartParams { duration };
            Ok(admin::start_round(State(state), Path(round), Query(params))
                .await?
                .into_response())
        }
        Some("stop") => Ok(admin::stop_round(State(state.store)).await?.into_response()),
        Some("reset") => Ok(admin::reset_quiz(State(state.store)).await?.into_response()),
        Some("submit") => {
            let req: SubmitScoreRequest = serde_json::from_slice(&body)?;
            Ok(submit_score(State(state), Json(req)).await?.into_response())
        }
        Some("disqualify") => {
            let req: DisqualifyRequest = serde_json::from_slice(&body)?;
            Ok(disqualify(State(state), Json(req)).await?.into_response())
        }
        other => Err(unknown_action("POST", other)),
    }
}

fn unknown_action(method: &str, action: Option<&str>) -> AppError {
    match action {
        Some(action) => AppError::BadRequest(format!("Unsupported action '{}' for {}", action, method)),
        None => AppError::BadRequest("Missing action parameter".to_string()),
    }
}

/// Current quiz status. Always 200; storage failures report an idle quiz.
pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = rounds::get_status(state.store.as_ref()).await;

    Json(StatusResponse {
        quiz_started: status.started,
        current_round: status.current_round,
        duration_seconds: status
            .window_seconds()
            .unwrap_or(state.config.quiz_duration_secs),
        start_time: status.started_at,
        end_time: status.ends_at,
    })
}

/// Questions of the current round without their answers.
pub async fn get_questions(State(state): State<AppState>) -> Json<Vec<PublicQuestion>> {
    Json(question_bank::current_questions(state.store.as_ref(), &state.questions).await)
}

/// Ranked standings for `round` (defaults to the current round).
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let board = ranking::get_leaderboard(state.store.as_ref(), &state.questions, params.round).await?;
    Ok(Json(board))
}

/// Scores a team's answers for the current round.
///
/// * Team name is trimmed and validated.
/// * A resubmission replaces the team's previous result.
pub async fn submit_score(
    State(state): State<AppState>,
    Json(mut req): Json<SubmitScoreRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    req.team_name = req.team_name.trim().to_string();
    req.validate()?;

    let receipt = scoring::submit_score(
        state.store.as_ref(),
        &state.questions,
        &state.config,
        scoring::Submission {
            team_name: req.team_name,
            answers: req.answers,
            enter_time: req.enter_time.and_then(|t| t.to_utc()),
            exit_time: req.exit_time.and_then(|t| t.to_utc()),
        },
    )
    .await?;

    Ok(Json(SubmitResponse {
        message: format!("Score submitted successfully: {}/{}", receipt.score, receipt.total_questions),
        score: receipt.score,
        total_questions: receipt.total_questions,
        round: receipt.round,
    }))
}

/// Marks a team as disqualified in the current round.
pub async fn disqualify(
    State(state): State<AppState>,
    Json(mut req): Json<DisqualifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.team_name = req.team_name.trim().to_string();
    req.validate()?;

    let round = scoring::disqualify(
        state.store.as_ref(),
        &state.config,
        &req.team_name,
        req.enter_time.and_then(|t| t.to_utc()),
    )
    .await?;

    Ok(Json(json!({
        "message": format!("Team '{}' disqualified", req.team_name),
        "round": round,
    })))
}
