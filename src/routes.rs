// src/routes.rs

use std::path::Path;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{admin, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * `/api/quiz?action=…` is the polling endpoint used by the pages.
/// * REST-style aliases live under `/api/quiz/*` and `/api/admin/*`.
/// * Static pages from `STATIC_DIR` are served as the fallback when present.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/status", get(quiz::get_status))
        .route("/questions", get(quiz::get_questions))
        .route("/leaderboard", get(quiz::get_leaderboard))
        .route("/submit", post(quiz::submit_score))
        .route("/disqualify", post(quiz::disqualify));

    // Admin routes carry no authentication.
    let admin_routes = Router::new()
        .route("/rounds/{round}/start", post(admin::start_round))
        .route("/stop", post(admin::stop_round))
        .route("/reset", post(admin::reset_quiz));

    let static_dir = state.config.static_dir.clone();

    let mut router = Router::new()
        .route("/api/quiz", get(quiz::quiz_query).post(quiz::quiz_command))
        .nest("/api/quiz", quiz_routes)
        .nest("/api/admin", admin_routes);

    if Path::new(&static_dir).is_dir() {
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    router
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
