//! Authentication: token codec/validator, user store and login endpoints

pub mod handlers;
pub mod jwt;
pub mod users;


use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use inmogest_core::Role;
use serde_json::json;
use thiserror::Error;

/// The verified identity attached to a request.
///
/// Built once per request by the identity resolver from the user store's
/// record; the role set is an owned copy, so a principal never aliases
/// live store data. It travels in the request extensions and is discarded
/// when the request completes.
#[derive(Debug, Clone)]
pub struct Principal {
    id: i64,
    username: String,
    roles: Vec<Role>,
}

impl Principal {
    pub fn new(id: i64, username: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            id,
            username: username.into(),
            roles,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// True when at least one of `required` is held. Exact comparison,
    /// no hierarchy between roles.
    pub fn has_any_role(&self, required: &[Role]) -> bool {
        required.iter().any(|role| self.roles.contains(role))
    }
}

/// Extractor for handlers that need the authenticated identity.
///
/// Rejects with 401 when the request filter attached no principal; routes
/// behind an authorization rule never see that rejection because the gate
/// already answered.
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::MissingCredentials)
    }
}

/// Authentication errors surfaced by the login/signup endpoints and the
/// user store.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing credentials")]
    MissingCredentials,
    #[error("Token creation failed")]
    TokenCreation,
    #[error("Password hashing failed")]
    PasswordHash,
    #[error("User not found: {username}")]
    UserNotFound { username: String },
    #[error("Error: Username is already taken!")]
    UsernameTaken,
    #[error("Error: Email is already in use!")]
    EmailTaken,
    #[error("{message}")]
    InvalidField { message: String },
}

impl AuthError {
    pub fn invalid_field(message: impl Into<String>) -> Self {
        Self::InvalidField {
            message: message.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AuthError::MissingCredentials => (StatusCode::UNAUTHORIZED, "missing_credentials"),
            AuthError::TokenCreation => (StatusCode::INTERNAL_SERVER_ERROR, "token_creation_failed"),
            AuthError::PasswordHash => (StatusCode::INTERNAL_SERVER_ERROR, "password_hash_failed"),
            AuthError::UserNotFound { .. } => (StatusCode::UNAUTHORIZED, "user_not_found"),
            AuthError::UsernameTaken => (StatusCode::BAD_REQUEST, "username_taken"),
            AuthError::EmailTaken => (StatusCode::BAD_REQUEST, "email_taken"),
            AuthError::InvalidField { .. } => (StatusCode::BAD_REQUEST, "invalid_field"),
        };

        let body = Json(json!({
            "error": error_code,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
