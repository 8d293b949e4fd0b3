pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::applications::handlers;
use crate::state::AppState;

/// Room for the text fields sent alongside the CV in the same multipart body.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_cv_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Application intake
        .route(
            "/api/v1/applications",
            post(handlers::handle_create_application),
        )
        .route(
            "/api/v1/applications/upload",
            post(handlers::handle_upload_application).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Staff
        .route(
            "/api/v1/applications/:id/cv",
            get(handlers::handle_view_cv),
        )
        .route(
            "/api/v1/applications/:id/cv-file",
            get(handlers::handle_download_cv_file),
        )
        .with_state(state)
}
