pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::certificate::handlers;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/fit", post(handlers::handle_fit))
        .route(
            "/api/v1/certificates/layout",
            post(handlers::handle_certificate_layout),
        )
        .fallback(not_found)
        .with_state(state)
}
