//! Authentication handlers for login and registration

use super::{
    users::{LoginRequest, SignupRequest},
    AuthError,
};
use crate::AppState;
use axum::{extract::State, response::Json, Json as JsonExtractor};
use serde::Serialize;
use tracing::info;

/// JWT authentication response
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JwtResponse {
    /// JWT access token
    pub token: String,
    /// Token type, always "Bearer"
    #[serde(rename = "type")]
    pub token_type: String,
    /// User ID
    pub id: i64,
    /// Username
    pub username: String,
    /// Email address
    pub email: String,
    /// Role names held by the user
    pub roles: Vec<String>,
}

/// Generic message response
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// User login endpoint
///
/// Verifies username/password against the user store and issues a signed
/// session token on success.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = JwtResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    JsonExtractor(request): JsonExtractor<LoginRequest>,
) -> Result<Json<JwtResponse>, AuthError> {
    info!(username = %request.username, "login attempt");

    let user = state.user_service.authenticate(&request)?;
    let token = state.codec.issue(&user.username)?;

    info!(username = %user.username, "user logged in");
    Ok(Json(JwtResponse {
        token,
        token_type: "Bearer".to_string(),
        id: user.id,
        username: user.username,
        email: user.email,
        roles: user.roles.iter().map(|r| r.to_string()).collect(),
    }))
}

/// User registration endpoint
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Registered", body = MessageResponse),
        (status = 400, description = "Invalid field or duplicate username/email")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonExtractor(request): JsonExtractor<SignupRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    info!(username = %request.username, "registration attempt");

    let user = state.user_service.register(request)?;

    info!(username = %user.username, "user registered");
    Ok(Json(MessageResponse {
        message: "User registered successfully!".to_string(),
    }))
}
