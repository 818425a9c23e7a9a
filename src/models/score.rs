// src/models/score.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::question::SubmittedAnswers;

/// Score written for a disqualified team.
pub const DISQUALIFIED_SCORE: i32 = -1;

/// Represents the 'scores' table in the database.
/// One row per team per round; resubmission overwrites it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub round: i32,
    pub team_name: String,

    /// Correct answers, or `DISQUALIFIED_SCORE`.
    pub score: i32,

    pub enter_time: Option<DateTime<Utc>>,
    pub exit_time: DateTime<Utc>,

    /// Whole seconds between enter and exit.
    pub time_taken: Option<i32>,

    /// Server-side write time.
    pub submitted_at: DateTime<Utc>,
}

impl ScoreEntry {
    pub fn is_disqualified(&self) -> bool {
        self.score < 0
    }
}

/// A score row as the engine hands it to the store. `submitted_at` is stamped by the store.
#[derive(Debug, Clone)]
pub struct NewScore {
    pub round: i32,
    pub team_name: String,
    pub score: i32,
    pub enter_time: Option<DateTime<Utc>>,
    pub exit_time: DateTime<Utc>,
    pub time_taken: Option<i32>,
}

/// Result of an upsert into the score ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Written,
    /// The existing row is a disqualification and was left untouched.
    KeptDisqualified,
    /// The round is no longer the current one; nothing was written.
    RoundChanged,
}

/// One row of the leaderboard as sent to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub team_name: String,
    pub score: i32,
    pub enter_time: Option<DateTime<Utc>>,
    pub exit_time: DateTime<Utc>,
    pub time_taken: Option<i32>,
}

impl From<ScoreEntry> for LeaderboardEntry {
    fn from(entry: ScoreEntry) -> Self {
        LeaderboardEntry {
            team_name: entry.team_name,
            score: entry.score,
            enter_time: entry.enter_time,
            exit_time: entry.exit_time,
            time_taken: entry.time_taken,
        }
    }
}

/// Response body for `action=leaderboard`.
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub data: Vec<LeaderboardEntry>,
    pub round: i32,
}

/// A client-supplied instant: epoch milliseconds or an RFC 3339 string.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum ClientTimestamp {
    Millis(i64),
    Rfc3339(DateTime<Utc>),
}

impl ClientTimestamp {
    /// `None` when the millisecond value is outside chrono's range.
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        match self {
            ClientTimestamp::Millis(ms) => DateTime::from_timestamp_millis(ms),
            ClientTimestamp::Rfc3339(dt) => Some(dt),
        }
    }
}

/// DTO for submitting a round's answers.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    #[validate(length(min = 1, max = 64, message = "Team name must be between 1 and 64 characters."))]
    pub team_name: String,

    #[serde(default)]
    pub answers: SubmittedAnswers,

    pub enter_time: Option<ClientTimestamp>,
    pub exit_time: Option<ClientTimestamp>,
}

/// DTO for reporting a team that left the quiz view.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DisqualifyRequest {
    #[validate(length(min = 1, max = 64, message = "Team name must be between 1 and 64 characters."))]
    pub team_name: String,

    pub enter_time: Option<ClientTimestamp>,
}

/// Response body for a scored submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub message: String,
    pub score: i32,
    pub total_questions: usize,
    pub round: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_accept_millis_and_rfc3339() {
        let millis: ClientTimestamp = serde_json::from_str("1700000000000").unwrap();
        let iso: ClientTimestamp = serde_json::from_str(r#""2023-11-14T22:13:20Z""#).unwrap();
        assert_eq!(millis.to_utc(), iso.to_utc());
    }

    #[test]
    fn submit_request_uses_camel_case() {
        let req: SubmitScoreRequest = serde_json::from_str(
            r#"{"teamName": "Alpha", "answers": ["4", null], "enterTime": 1000}"#,
        )
        .unwrap();
        assert_eq!(req.team_name, "Alpha");
        assert!(req.exit_time.is_none());
        assert!(matches!(req.answers, SubmittedAnswers::List(ref l) if l.len() == 2));
    }
}
