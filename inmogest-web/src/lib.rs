//! Inmogest Web Server
//!
//! HTTP backend for the Inmogest real-estate management system. The heart
//! of this crate is the stateless authentication pipeline: the token
//! codec and validator (`auth::jwt`), the per-request filter
//! (`middleware`), identity resolution against the user store
//! (`auth::users`) and the declarative authorization gate (`authz`).

pub mod auth;
pub mod authz;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::InmogestServer;
pub use state::AppState;

use axum::{
    http::{header::AUTHORIZATION, Method},
    middleware::from_fn_with_state,
    Router,
};
use inmogest_core::{AuthConfig, CoreError};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router.
///
/// Layer ordering matters: the authentication filter runs first and only
/// shapes the request context; the authorization gate runs inside it and
/// is the single producer of 401/403 responses.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([AUTHORIZATION]);

    Router::new()
        .nest("/api/v1", routes::api_routes())
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .layer(from_fn_with_state(state.clone(), authz::authorize))
        .layer(from_fn_with_state(state.clone(), middleware::authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Signing key and token lifetime
    pub auth: AuthConfig,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            auth: AuthConfig::new(
                "inmogest-default-secret-change-in-production",
                inmogest_core::DEFAULT_TOKEN_LIFETIME_SECS,
            ),
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let auth = AuthConfig::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default auth configuration");
            defaults.auth.clone()
        });

        Self {
            host: std::env::var("INMOGEST_HOST").unwrap_or(defaults.host),
            port: std::env::var("INMOGEST_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            auth,
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;
