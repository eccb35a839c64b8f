//! Configuration management
//!
//! All configuration is loaded once at startup into immutable values and
//! shared read-only afterwards. The signing secret in particular is never
//! mutated at runtime; every token codec instance borrows from the same
//! `AuthConfig` established here.

use crate::error::{CoreError, CoreResult};

/// Default token lifetime: 24 hours, in seconds.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// Authentication configuration: the process-wide signing secret and the
/// configured token lifetime.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HMAC signing secret. Established once, read-only afterwards.
    pub jwt_secret: String,
    /// Token lifetime in seconds; `expires-at = issued-at + lifetime`.
    pub token_lifetime_secs: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_lifetime_secs: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_lifetime_secs,
        }
    }

    /// Load authentication configuration from environment variables.
    ///
    /// `INMOGEST_JWT_SECRET` is required; `INMOGEST_JWT_LIFETIME_SECS`
    /// defaults to 24 hours.
    pub fn from_env() -> CoreResult<Self> {
        let jwt_secret = std::env::var("INMOGEST_JWT_SECRET")
            .map_err(|_| CoreError::missing_config("INMOGEST_JWT_SECRET"))?;

        if jwt_secret.is_empty() {
            return Err(CoreError::invalid_config(
                "INMOGEST_JWT_SECRET",
                "secret must not be empty",
            ));
        }

        let token_lifetime_secs = match std::env::var("INMOGEST_JWT_LIFETIME_SECS") {
            Ok(raw) => raw.parse::<i64>().map_err(|_| {
                CoreError::invalid_config("INMOGEST_JWT_LIFETIME_SECS", "not an integer")
            })?,
            Err(_) => DEFAULT_TOKEN_LIFETIME_SECS,
        };

        if token_lifetime_secs <= 0 {
            return Err(CoreError::invalid_config(
                "INMOGEST_JWT_LIFETIME_SECS",
                "lifetime must be positive",
            ));
        }

        Ok(Self {
            jwt_secret,
            token_lifetime_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_construction_keeps_values() {
        let config = AuthConfig::new("secret-key", 3600);
        assert_eq!(config.jwt_secret, "secret-key");
        assert_eq!(config.token_lifetime_secs, 3600);
    }
}
