// src/engine/ranking.rs

use std::cmp::Ordering;

use crate::{
    engine::question_bank::QuestionBank,
    error::AppError,
    models::score::{LeaderboardEntry, LeaderboardResponse, ScoreEntry},
    store::QuizStore,
};

/// Standings order: qualified before disqualified, then score descending,
/// then `time_taken` ascending (missing last), then `submitted_at` ascending,
/// then team name.
pub fn compare_entries(a: &ScoreEntry, b: &ScoreEntry) -> Ordering {
    a.is_disqualified()
        .cmp(&b.is_disqualified())
        .then_with(|| b.score.cmp(&a.score))
        .then_with(|| match (a.time_taken, b.time_taken) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.submitted_at.cmp(&b.submitted_at))
        .then_with(|| a.team_name.cmp(&b.team_name))
}

pub fn rank_entries(mut entries: Vec<ScoreEntry>) -> Vec<ScoreEntry> {
    entries.sort_by(compare_entries);
    entries
}

/// Ranked standings for `round`, or for the current round when `round` is absent or 0.
///
/// Read path: storage failures produce an empty board. An explicit round that
/// the question bank does not know is `InvalidRound`.
pub async fn get_leaderboard(
    store: &dyn QuizStore,
    bank: &QuestionBank,
    round: Option<i32>,
) -> Result<LeaderboardResponse, AppError> {
    let round = match round {
        Some(r) if r != 0 => {
            if !bank.is_valid_round(r) {
                return Err(AppError::InvalidRound(r));
            }
            r
        }
        _ => match store.load_status().await {
            Ok(status) => status.current_round,
            Err(e) => {
                tracing::warn!("Failed to resolve current round for leaderboard: {}", e);
                0
            }
        },
    };

    if round < 1 {
        return Ok(LeaderboardResponse {
            data: Vec::new(),
            round: 0,
        });
    }

    let entries = match store.round_scores(round).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to load scores for round {}, returning empty board: {}", round, e);
            Vec::new()
        }
    };

    let data = rank_entries(entries)
        .into_iter()
        .map(LeaderboardEntry::from)
        .collect();

    Ok(LeaderboardResponse { data, round })
}
