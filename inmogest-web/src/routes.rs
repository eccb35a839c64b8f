//! Route definitions
//!
//! All API routes live under `/api/v1`. Which of them require a principal
//! is not decided here; that is the authorization policy's table.

use crate::{auth, handlers, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes (nested under `/api/v1`)
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Authentication
        .route("/auth/signin", post(auth::handlers::signin))
        .route("/auth/signup", post(auth::handlers::signup))
        // Agencies
        .route(
            "/inmobiliarias",
            get(handlers::list_agencies).post(handlers::create_agency),
        )
        .route(
            "/inmobiliarias/{id}",
            get(handlers::get_agency)
                .put(handlers::update_agency)
                .delete(handlers::delete_agency),
        )
}
