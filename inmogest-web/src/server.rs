//! Inmogest Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main Inmogest web server
pub struct InmogestServer {
    config: WebConfig,
    state: AppState,
}

impl InmogestServer {
    /// Create a new Inmogest server
    pub fn new(config: WebConfig) -> Self {
        let state = AppState::new(config.clone());

        Self { config, state }
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("🚀 Starting Inmogest Web Server");
        info!("📍 Server address: http://{}", address);

        // Create the application
        let app = create_app(self.state.clone());

        // Create TCP listener
        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("✅ Server listening on http://{}", address);

        // Start the server
        if let Err(e) = serve(listener, app).await {
            error!("❌ Server error: {}", e);
            return Err(WebError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for InmogestServer
pub struct InmogestServerBuilder {
    config: WebConfig,
}

impl InmogestServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: WebConfig::from_env(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Build the server
    pub fn build(self) -> InmogestServer {
        InmogestServer::new(self.config)
    }
}

impl Default for InmogestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
