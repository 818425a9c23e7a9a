// src/engine/rounds.rs

//! Round lifecycle: Idle -> Active(n) -> Finishing(n) -> Idle or Active(m).

use chrono::Duration;

use crate::{
    config::MAX_QUIZ_DURATION_SECS,
    engine::question_bank::QuestionBank,
    error::AppError,
    models::quiz_status::{QuizStatus, RoundPhase},
    store::QuizStore,
};

/// Current status. Never fails: storage errors read as idle.
pub async fn get_status(store: &dyn QuizStore) -> QuizStatus {
    match store.load_status().await {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!("Failed to read quiz status, reporting idle: {}", e);
            QuizStatus::idle()
        }
    }
}

/// Clears round `round`'s scores and makes it the active round for
/// `duration_secs` seconds.
///
/// Re-starting a round that already has results wipes them; other rounds keep theirs.
pub async fn start_round(
    store: &dyn QuizStore,
    bank: &QuestionBank,
    round: i32,
    duration_secs: i64,
) -> Result<QuizStatus, AppError> {
    if !bank.is_valid_round(round) {
        return Err(AppError::InvalidRound(round));
    }
    if !(1..=MAX_QUIZ_DURATION_SECS).contains(&duration_secs) {
        return Err(AppError::BadRequest(format!(
            "Duration must be between 1 and {} seconds",
            MAX_QUIZ_DURATION_SECS
        )));
    }

    let status = store
        .start_round(round, Duration::seconds(duration_secs))
        .await?;
    tracing::info!(
        "Round {} started for {}s",
        status.current_round,
        duration_secs
    );
    Ok(status)
}

/// Stops accepting new participants; the round stays selected.
pub async fn stop_round(store: &dyn QuizStore) -> Result<QuizStatus, AppError> {
    let status = store.stop_round().await?.ok_or(AppError::NoActiveRound)?;
    tracing::info!("Round {} stopped", status.current_round);
    Ok(status)
}

/// Deletes every score in every round and returns to idle.
pub async fn reset_quiz(store: &dyn QuizStore) -> Result<(), AppError> {
    store.reset().await?;
    tracing::info!("Quiz reset, all scores cleared");
    Ok(())
}

/// The round a team write should be attributed to.
///
/// Write path: storage errors propagate. With `accept_late` a stopped round
/// still takes entries.
pub(crate) async fn accepting_round(store: &dyn QuizStore, accept_late: bool) -> Result<i32, AppError> {
    let status = store.load_status().await?;
    match status.phase() {
        RoundPhase::Active(round) => Ok(round),
        RoundPhase::Finishing(round) if accept_late => Ok(round),
        RoundPhase::Finishing(_) | RoundPhase::Idle => Err(AppError::NoActiveRound),
    }
}
