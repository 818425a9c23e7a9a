// src/store/mod.rs

//! Persistence for the quiz status row and the score ledger.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;

use crate::models::{
    quiz_status::QuizStatus,
    score::{NewScore, ScoreEntry, UpsertOutcome},
};

pub use memory::MemoryQuizStore;
pub use postgres::PgQuizStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle used by the router state.
pub type SharedStore = Arc<dyn QuizStore>;

/// Repository over the status row and the per-round score ledger.
///
/// Every method is a short, independent unit of work; implementations must make
/// `start_round` and `reset` atomic and key score upserts on `(round, team_name)`.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Reads the status row. A missing row reads as idle.
    async fn load_status(&self) -> StoreResult<QuizStatus>;

    /// Deletes round `round`'s scores and activates it with a fresh
    /// `[now, now + duration]` window, in one transaction.
    async fn start_round(&self, round: i32, duration: Duration) -> StoreResult<QuizStatus>;

    /// Clears `started`, keeping the round. `None` when no round is selected.
    async fn stop_round(&self) -> StoreResult<Option<QuizStatus>>;

    /// Deletes every score and returns to idle, in one transaction.
    async fn reset(&self) -> StoreResult<()>;

    /// Inserts or overwrites the `(round, team_name)` row.
    ///
    /// Nothing is written unless `score.round` is still the current round, checked
    /// atomically with the write so a concurrent restart cannot be outrun. With
    /// `keep_disqualified`, an existing disqualified row is left as is.
    async fn upsert_score(&self, score: NewScore, keep_disqualified: bool) -> StoreResult<UpsertOutcome>;

    /// All rows for `round`, in no particular order.
    async fn round_scores(&self, round: i32) -> StoreResult<Vec<ScoreEntry>>;
}
