//! Session token codec and validator
//!
//! Tokens are compact HS256 JWTs carrying only the subject and the issue/
//! expiry instants. The codec is built once from the immutable
//! [`AuthConfig`] and shared read-only across all concurrent requests.

use super::AuthError;
use chrono::Utc;
use inmogest_core::AuthConfig;
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds); always `iat` + configured lifetime
    pub exp: i64,
}

/// Every way a bearer string can fail to decode. The validator collapses
/// all of these to `false`; nothing above it distinguishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("token is empty")]
    Empty,
    #[error("token is malformed")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token is expired")]
    Expired,
    #[error("token algorithm is unsupported")]
    Unsupported,
}

/// Encodes and decodes signed session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime_secs: i64,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            lifetime_secs: config.token_lifetime_secs,
        }
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Issue a signed token for `subject`, valid from now for the
    /// configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, AuthError> {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Issue a token with an explicit issued-at instant. Tests use this to
    /// produce tokens sitting exactly on the expiry boundary.
    pub fn issue_at(&self, subject: &str, issued_at: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at + self.lifetime_secs,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(
            |e| {
                error!(error = %e, "failed to sign token");
                AuthError::TokenCreation
            },
        )
    }

    /// Parse a bearer string, verify its signature and expiry, and return
    /// the embedded claims.
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        if token.trim().is_empty() {
            return Err(DecodeError::Empty);
        }

        // Structural shape first: exactly three dot-separated segments,
        // with a signature segment actually present.
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(DecodeError::Malformed);
        }
        if segments[2].is_empty() {
            return Err(DecodeError::BadSignature);
        }

        // Expiry is compared manually below so that `exp == now` counts as
        // already expired; the library's own check is strict `<`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => DecodeError::BadSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    DecodeError::Unsupported
                }
                _ => DecodeError::Malformed,
            },
        )?;

        if data.claims.exp <= Utc::now().timestamp() {
            return Err(DecodeError::Expired);
        }

        Ok(data.claims)
    }
}

/// Boolean-returning validation boundary over the codec.
///
/// Total function: every [`DecodeError`] maps to `false` and nothing is
/// propagated. The request filter branches on this single boolean, never
/// on failure causes.
#[derive(Clone)]
pub struct TokenValidator {
    codec: TokenCodec,
}

impl TokenValidator {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    pub fn validate(&self, token: &str) -> bool {
        match self.codec.decode(token) {
            Ok(_) => true,
            Err(cause) => {
                debug!(%cause, "token rejected");
                false
            }
        }
    }

    /// Subject of a valid token, `None` for any invalid one.
    pub fn subject(&self, token: &str) -> Option<String> {
        self.codec.decode(token).ok().map(|claims| claims.sub)
    }
}
