//! Logging initialization
//!
//! Structured logging via `tracing` with an environment-driven filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the supplied default level is used
/// for the inmogest crates. Safe to call once per process.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "inmogest_core={level},inmogest_web={level},tower_http={level}",
            level = default_level
        ))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}
