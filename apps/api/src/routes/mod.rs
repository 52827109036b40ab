pub mod health;

use axum::{routing::get, routing::post, Router};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/recommendations",
            post(handlers::handle_get_recommendations),
        )
        .route("/api/v1/jobs/ingest", post(handlers::handle_ingest_jobs))
        .with_state(state)
}
