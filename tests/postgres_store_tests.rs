// tests/postgres_store_tests.rs
//
// Needs a running PostgreSQL at DATABASE_URL:
//     cargo test --test postgres_store_tests -- --ignored

use std::sync::Arc;

use chrono::{Duration, Utc};
use quiz_backend::{
    models::score::{NewScore, UpsertOutcome},
    store::{PgQuizStore, QuizStore},
};
use sqlx::postgres::PgPoolOptions;

async fn connect_store() -> PgQuizStore {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    let store = PgQuizStore::new(pool);
    store.migrate().await.expect("Failed to migrate database");
    store
}

fn score(round: i32, team: &str, value: i32, time_taken: i32) -> NewScore {
    let exit_time = Utc::now();
    NewScore {
        round,
        team_name: team.to_string(),
        score: value,
        enter_time: Some(exit_time - Duration::seconds(time_taken.into())),
        exit_time,
        time_taken: Some(time_taken),
    }
}

// The status row is global, so the whole lifecycle runs in one test.
#[tokio::test]
#[ignore = "requires a running Postgres at DATABASE_URL"]
async fn postgres_lifecycle() {
    let store = Arc::new(connect_store().await);
    let team = format!("t_{}", &uuid::Uuid::new_v4().to_string()[..8]);

    store.reset().await.unwrap();
    assert!(store.stop_round().await.unwrap().is_none());

    let status = store.start_round(1, Duration::seconds(90)).await.unwrap();
    assert!(status.started);
    assert_eq!(status.current_round, 1);
    assert_eq!(status.window_seconds(), Some(90));
    assert_eq!(store.load_status().await.unwrap().ends_at, status.ends_at);

    // Upsert keeps one row per (round, team)
    store.upsert_score(score(1, &team, 2, 40), false).await.unwrap();
    store.upsert_score(score(1, &team, 1, 35), false).await.unwrap();
    let outcome = store.upsert_score(score(2, &team, 3, 20), false).await.unwrap();
    assert_eq!(outcome, UpsertOutcome::RoundChanged);
    assert!(store.round_scores(2).await.unwrap().is_empty());
    let rows = store.round_scores(1).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].score, 1);

    // Terminal disqualification is checked inside the upsert
    store.upsert_score(score(1, &team, -1, 5), false).await.unwrap();
    let outcome = store.upsert_score(score(1, &team, 3, 10), true).await.unwrap();
    assert_eq!(outcome, UpsertOutcome::KeptDisqualified);
    assert_eq!(store.round_scores(1).await.unwrap()[0].score, -1);

    // Concurrent starts serialise on the status row
    let (a, b) = tokio::join!(
        store.start_round(1, Duration::seconds(60)),
        store.start_round(2, Duration::seconds(60))
    );
    a.unwrap();
    b.unwrap();
    let status = store.load_status().await.unwrap();
    assert!(status.started);
    assert!(status.current_round == 1 || status.current_round == 2);
    assert!(store.round_scores(1).await.unwrap().is_empty());
    assert!(store.round_scores(2).await.unwrap().is_empty());

    let stopped = store.stop_round().await.unwrap().expect("round was active");
    assert!(!stopped.started);
    assert_eq!(stopped.current_round, status.current_round);

    store.reset().await.unwrap();
    let status = store.load_status().await.unwrap();
    assert!(!status.started);
    assert_eq!(status.current_round, 0);
    assert!(status.ends_at.is_none());
}
