//! Inmogest Core - Shared configuration, error types and role vocabulary
//!
//! This crate defines the pieces shared by the rest of the system: the
//! immutable authentication configuration, the role vocabulary checked by
//! the authorization layer, and logging initialization.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
