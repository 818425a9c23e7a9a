// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::{PgPool, migrate::Migrator};
use tokio::sync::OnceCell;

use crate::{
    models::{
        quiz_status::QuizStatus,
        score::{NewScore, ScoreEntry, UpsertOutcome},
    },
    store::{QuizStore, StoreResult},
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// PostgreSQL-backed store.
///
/// The schema is checked lazily before the first operation; a failed check is
/// retried on the next call.
pub struct PgQuizStore {
    pool: PgPool,
    ready: OnceCell<()>,
}

impl PgQuizStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            ready: OnceCell::new(),
        }
    }

    /// Runs pending migrations once per process.
    pub async fn migrate(&self) -> StoreResult<()> {
        self.ready
            .get_or_try_init(|| async {
                MIGRATOR.run(&self.pool).await?;
                tracing::info!("Quiz schema is up to date");
                Ok::<(), crate::store::StoreError>(())
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl QuizStore for PgQuizStore {
    async fn load_status(&self) -> StoreResult<QuizStatus> {
        self.migrate().await?;

        let status = sqlx::query_as::<_, QuizStatus>(
            "SELECT started, current_round, started_at, ends_at FROM quiz_status WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(status.unwrap_or_default())
    }

    async fn start_round(&self, round: i32, duration: Duration) -> StoreResult<QuizStatus> {
        self.migrate().await?;

        let mut tx = self.pool.begin().await?;

        // The status row doubles as the lock serialising concurrent starts.
        sqlx::query(
            "INSERT INTO quiz_status (id, started, current_round) VALUES (1, FALSE, 0)
             ON CONFLICT (id) DO NOTHING",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query("SELECT id FROM quiz_status WHERE id = 1 FOR UPDATE")
            .execute(&mut *tx)
            .await?;

        let cleared = sqlx::query("DELETE FROM scores WHERE round = $1")
            .bind(round)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let started_at = Utc::now();
        let status = sqlx::query_as::<_, QuizStatus>(
            r#"
            UPDATE quiz_status
            SET started = TRUE, current_round = $1, started_at = $2, ends_at = $3, updated_at = NOW()
            WHERE id = 1
            RETURNING started, current_round, started_at, ends_at
            "#,
        )
        .bind(round)
        .bind(started_at)
        .bind(started_at + duration)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Cleared {} score rows for round {}", cleared, round);
        Ok(status)
    }

    async fn stop_round(&self) -> StoreResult<Option<QuizStatus>> {
        self.migrate().await?;

        let status = sqlx::query_as::<_, QuizStatus>(
            r#"
            UPDATE quiz_status
            SET started = FALSE, updated_at = NOW()
            WHERE id = 1 AND current_round > 0
            RETURNING started, current_round, started_at, ends_at
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }

    async fn reset(&self) -> StoreResult<()> {
        self.migrate().await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM scores").execute(&mut *tx).await?;

        sqlx::query(
            r#"
            INSERT INTO quiz_status (id, started, current_round) VALUES (1, FALSE, 0)
            ON CONFLICT (id) DO UPDATE SET
                started = FALSE, current_round = 0, started_at = NULL, ends_at = NULL, updated_at = NOW()
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn upsert_score(&self, score: NewScore, keep_disqualified: bool) -> StoreResult<UpsertOutcome> {
        self.migrate().await?;

        let mut tx = self.pool.begin().await?;

        // Shares the status-row lock with start_round, so a restart cannot land between check and write.
        let current_round: Option<i32> =
            sqlx::query_scalar("SELECT current_round FROM quiz_status WHERE id = 1 FOR SHARE")
                .fetch_optional(&mut *tx)
                .await?;

        if current_round != Some(score.round) {
            tx.rollback().await?;
            return Ok(UpsertOutcome::RoundChanged);
        }

        // The WHERE on the update keeps the disqualification check in the same statement.
        let result = sqlx::query(
            r#"
            INSERT INTO scores (round, team_name, score, enter_time, exit_time, time_taken, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (round, team_name) DO UPDATE SET
                score = EXCLUDED.score,
                enter_time = EXCLUDED.enter_time,
                exit_time = EXCLUDED.exit_time,
                time_taken = EXCLUDED.time_taken,
                submitted_at = EXCLUDED.submitted_at
            WHERE NOT $7::BOOLEAN OR scores.score >= 0
            "#,
        )
        .bind(score.round)
        .bind(&score.team_name)
        .bind(score.score)
        .bind(score.enter_time)
        .bind(score.exit_time)
        .bind(score.time_taken)
        .bind(keep_disqualified)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if result.rows_affected() == 0 {
            Ok(UpsertOutcome::KeptDisqualified)
        } else {
            Ok(UpsertOutcome::Written)
        }
    }

    async fn round_scores(&self, round: i32) -> StoreResult<Vec<ScoreEntry>> {
        self.migrate().await?;

        let rows = sqlx::query_as::<_, ScoreEntry>(
            r#"
            SELECT round, team_name, score, enter_time, exit_time, time_taken, submitted_at
            FROM scores
            WHERE round = $1
            ORDER BY (score < 0), score DESC, time_taken ASC NULLS LAST, submitted_at ASC, team_name COLLATE "C" ASC
            "#,
        )
        .bind(round)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
