//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.
//!
//! Every endpoint is registered here, flat and independent of request
//! handling. (The source system registered some routes from inside another
//! route's handler; that coupling is a defect and is not reproduced.)

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod auth;
pub mod http;

/// Build the application router with:
/// - REST API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/api/v1/health", get(http::http_health))
        // Exercises
        .route(
            "/api/v1/exercises",
            post(http::http_generate_exercise)
                .get(http::http_list_exercises)
                .delete(http::http_clear_exercises),
        )
        .route("/api/v1/exercises/topic/:topic", get(http::http_exercises_by_topic))
        .route("/api/v1/exercises/:code", get(http::http_get_exercise))
        // Grading
        .route("/api/v1/submissions", post(http::http_submit_answer))
        // Progress (authenticated)
        .route(
            "/api/v1/progress",
            post(http::http_update_progress)
                .get(http::http_get_progress)
                .delete(http::http_delete_progress),
        )
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
