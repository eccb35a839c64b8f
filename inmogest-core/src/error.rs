//! Shared error types
//!
//! Closed error enums with structured matching rather than stringly-typed
//! failures; each layer of the system converts these at its own boundary.

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced by the core crate (configuration and vocabulary).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("missing configuration: {key}")]
    MissingConfig { key: &'static str },

    #[error("invalid configuration: {key}: {message}")]
    InvalidConfig { key: &'static str, message: String },

    #[error("unknown role: {name}")]
    UnknownRole { name: String },
}

impl CoreError {
    pub fn missing_config(key: &'static str) -> Self {
        Self::MissingConfig { key }
    }

    pub fn invalid_config(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key,
            message: message.into(),
        }
    }

    pub fn unknown_role(name: impl Into<String>) -> Self {
        Self::UnknownRole { name: name.into() }
    }
}
