// src/models/quiz_status.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Represents the single row of the 'quiz_status' table.
///
/// `started` implies `current_round >= 1`. The default value is the idle state,
/// which is also what status reads fall back to when storage fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRow, Serialize)]
pub struct QuizStatus {
    pub started: bool,
    pub current_round: i32,
    /// When the current round was last started. Cleared by a reset.
    pub started_at: Option<DateTime<Utc>>,
    /// Advertised end of the current round. Informational; submissions are not cut off by it.
    pub ends_at: Option<DateTime<Utc>>,
}

/// Lifecycle phase derived from a `QuizStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// No round selected.
    Idle,
    /// Round `n` is accepting participants.
    Active(i32),
    /// Round `n` was stopped; teams already in it may still finish.
    Finishing(i32),
}

impl QuizStatus {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Length of the current round's window, if one was recorded.
    pub fn window_seconds(&self) -> Option<i64> {
        match (self.started_at, self.ends_at) {
            (Some(start), Some(end)) => Some((end - start).num_seconds()),
            _ => None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        match (self.started, self.current_round) {
            (_, round) if round < 1 => RoundPhase::Idle,
            (true, round) => RoundPhase::Active(round),
            (false, round) => RoundPhase::Finishing(round),
        }
    }
}

/// Response body for `action=status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub quiz_started: bool,
    pub current_round: i32,
    pub duration_seconds: i64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// Acknowledgement for admin round transitions.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResponse {
    pub message: String,
    pub current_round: i32,
    pub end_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn active(round: i32) -> QuizStatus {
        let started_at = Utc::now();
        QuizStatus {
            started: true,
            current_round: round,
            started_at: Some(started_at),
            ends_at: Some(started_at + Duration::seconds(90)),
        }
    }

    #[test]
    fn phase_follows_started_and_round() {
        assert_eq!(QuizStatus::idle().phase(), RoundPhase::Idle);
        assert_eq!(active(2).phase(), RoundPhase::Active(2));
        assert_eq!(
            QuizStatus { started: false, ..active(2) }.phase(),
            RoundPhase::Finishing(2)
        );
        // A started flag without a round is still idle.
        assert_eq!(
            QuizStatus { current_round: 0, ..active(2) }.phase(),
            RoundPhase::Idle
        );
    }

    #[test]
    fn window_comes_from_the_recorded_times() {
        assert_eq!(active(1).window_seconds(), Some(90));
        assert_eq!(QuizStatus::idle().window_seconds(), None);
    }
}
