// tests/common/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use quiz_backend::{
    config::Config,
    engine::QuestionBank,
    models::{
        quiz_status::QuizStatus,
        score::{NewScore, ScoreEntry, UpsertOutcome},
    },
    routes,
    state::AppState,
    store::{MemoryQuizStore, QuizStore, SharedStore, StoreError, StoreResult},
};

pub const FIXTURE_QUESTIONS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/questions");

pub fn test_config() -> Config {
    Config {
        database_url: "unused".to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        questions_dir: FIXTURE_QUESTIONS.to_string(),
        static_dir: "does-not-exist".to_string(),
        quiz_duration_secs: 120,
        disqualification_terminal: false,
        accept_late_submissions: true,
    }
}

/// Spawns the app on a random port with the given store and configuration.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app_with(store: SharedStore, config: Config) -> String {
    let questions = QuestionBank::load_dir(&config.questions_dir).expect("Failed to load fixture questions");

    let state = AppState {
        store,
        questions: Arc::new(questions),
        config,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Spawns the app backed by a fresh in-memory store.
pub async fn spawn_app() -> String {
    spawn_app_with(Arc::new(MemoryQuizStore::new()), test_config()).await
}

/// A store whose every call fails, standing in for an unreachable database.
pub struct FailingStore;

fn outage<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("simulated outage".to_string()))
}

#[async_trait]
impl QuizStore for FailingStore {
    async fn load_status(&self) -> StoreResult<QuizStatus> {
        outage()
    }

    async fn start_round(&self, _round: i32, _duration: Duration) -> StoreResult<QuizStatus> {
        outage()
    }

    async fn stop_round(&self) -> StoreResult<Option<QuizStatus>> {
        outage()
    }

    async fn reset(&self) -> StoreResult<()> {
        outage()
    }

    async fn upsert_score(&self, _score: NewScore, _keep_disqualified: bool) -> StoreResult<UpsertOutcome> {
        outage()
    }

    async fn round_scores(&self, _round: i32) -> StoreResult<Vec<ScoreEntry>> {
        outage()
    }
}

/// Thin client over the `/api/quiz?action=…` endpoint.
pub struct QuizClient {
    pub address: String,
    pub http: reqwest::Client,
}

impl QuizClient {
    pub fn new(address: String) -> Self {
        Self {
            address,
            http: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, query: &str) -> reqwest::Response {
        self.http
            .get(format!("{}/api/quiz?{}", self.address, query))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post(&self, query: &str, body: Option<serde_json::Value>) -> reqwest::Response {
        let request = self.http.post(format!("{}/api/quiz?{}", self.address, query));
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };
        request.send().await.expect("Failed to execute request")
    }

    pub async fn start(&self, round: i32) -> reqwest::Response {
        self.post(&format!("action=start&round={}", round), None).await
    }

    pub async fn submit(&self, body: serde_json::Value) -> reqwest::Response {
        self.post("action=submit", Some(body)).await
    }

    pub async fn disqualify(&self, body: serde_json::Value) -> reqwest::Response {
        self.post("action=disqualify", Some(body)).await
    }

    pub async fn status(&self) -> serde_json::Value {
        self.get("action=status").await.json().await.expect("status json")
    }

    pub async fn leaderboard(&self, round: i32) -> serde_json::Value {
        let response = self.get(&format!("action=leaderboard&round={}", round)).await;
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.expect("leaderboard json")
    }
}

/// Team names in leaderboard order.
pub fn team_order(board: &serde_json::Value) -> Vec<String> {
    board["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|row| row["team_name"].as_str().unwrap().to_string())
        .collect()
}
