//! Application state
//!
//! Everything in here is either immutable after startup (codec keys,
//! exempt paths, policy table) or internally synchronized (the stores),
//! so `AppState` clones are safe to hand to every concurrent request.

use crate::{
    auth::{
        jwt::{TokenCodec, TokenValidator},
        users::UserService,
    },
    authz::AccessPolicy,
    handlers::AgencyStore,
    middleware::ExemptPaths,
    WebConfig,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: WebConfig,
    /// Token codec (issuance side)
    pub codec: TokenCodec,
    /// Token validator (boolean boundary the filter branches on)
    pub validator: TokenValidator,
    /// User store collaborator
    pub user_service: UserService,
    /// Agency storage
    pub agencies: AgencyStore,
    /// Paths that never require authentication
    pub exempt: Arc<ExemptPaths>,
    /// Endpoint -> required role set table
    pub policy: Arc<AccessPolicy>,
}

impl AppState {
    pub fn new(config: WebConfig) -> Self {
        let codec = TokenCodec::new(&config.auth);
        let validator = TokenValidator::new(codec.clone());

        let state = Self {
            config,
            codec,
            validator,
            user_service: UserService::default(),
            agencies: AgencyStore::new(),
            exempt: Arc::new(ExemptPaths::standard()),
            policy: Arc::new(AccessPolicy::standard()),
        };

        info!("application state initialized");
        state
    }
}
