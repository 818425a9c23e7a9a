// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::{
    models::{
        quiz_status::QuizStatus,
        score::{NewScore, ScoreEntry, UpsertOutcome},
    },
    store::{QuizStore, StoreResult},
};

#[derive(Debug, Default)]
struct Ledger {
    status: QuizStatus,
    scores: HashMap<(i32, String), ScoreEntry>,
    last_write: Option<DateTime<Utc>>,
}

impl Ledger {
    /// Write clock that never repeats, so `submitted_at` always orders writes.
    fn next_write_time(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_write {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_write = Some(stamp);
        stamp
    }
}

/// Single-process store. One lock guards the status and the ledger, so every
/// operation is atomic with respect to the others.
#[derive(Debug, Default)]
pub struct MemoryQuizStore {
    inner: Mutex<Ledger>,
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizStore for MemoryQuizStore {
    async fn load_status(&self) -> StoreResult<QuizStatus> {
        Ok(self.inner.lock().await.status)
    }

    async fn start_round(&self, round: i32, duration: Duration) -> StoreResult<QuizStatus> {
        let mut ledger = self.inner.lock().await;
        ledger.scores.retain(|(r, _), _| *r != round);
        let started_at = Utc::now();
        ledger.status = QuizStatus {
            started: true,
            current_round: round,
            started_at: Some(started_at),
            ends_at: Some(started_at + duration),
        };
        Ok(ledger.status)
    }

    async fn stop_round(&self) -> StoreResult<Option<QuizStatus>> {
        let mut ledger = self.inner.lock().await;
        if ledger.status.current_round < 1 {
            return Ok(None);
        }
        ledger.status.started = false;
        Ok(Some(ledger.status))
    }

    async fn reset(&self) -> StoreResult<()> {
        let mut ledger = self.inner.lock().await;
        ledger.scores.clear();
        ledger.status = QuizStatus::idle();
        Ok(())
    }

    async fn upsert_score(&self, score: NewScore, keep_disqualified: bool) -> StoreResult<UpsertOutcome> {
        let mut ledger = self.inner.lock().await;
        if ledger.status.current_round != score.round {
            return Ok(UpsertOutcome::RoundChanged);
        }

        let key = (score.round, score.team_name.clone());

        if keep_disqualified
            && ledger
                .scores
                .get(&key)
                .is_some_and(ScoreEntry::is_disqualified)
        {
            return Ok(UpsertOutcome::KeptDisqualified);
        }

        let submitted_at = ledger.next_write_time();
        ledger.scores.insert(
            key,
            ScoreEntry {
                round: score.round,
                team_name: score.team_name,
                score: score.score,
                enter_time: score.enter_time,
                exit_time: score.exit_time,
                time_taken: score.time_taken,
                submitted_at,
            },
        );
        Ok(UpsertOutcome::Written)
    }

    async fn round_scores(&self, round: i32) -> StoreResult<Vec<ScoreEntry>> {
        let ledger = self.inner.lock().await;
        Ok(ledger
            .scores
            .values()
            .filter(|entry| entry.round == round)
            .cloned()
            .collect())
    }
}
