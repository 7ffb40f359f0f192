pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Render API
        .route("/api/v1/render/resume", post(handlers::handle_render_resume))
        .route(
            "/api/v1/render/cover-letter",
            post(handlers::handle_render_cover_letter),
        )
        .route("/api/v1/export", post(handlers::handle_export))
        .with_state(state)
}
