//! User store and identity resolution
//!
//! The store is the external persistence collaborator of the auth
//! pipeline: a synchronous read surface returning a user record or
//! "absent". Resolution copies the role set out of the store, so the
//! per-request principal never shares mutable state with a live record.

use super::{AuthError, Principal};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use inmogest_core::Role;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc, RwLock,
};
use tracing::{debug, info, warn};

/// User login request
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User registration request
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Optional role names ("user", "mod", "admin"); defaults to user.
    #[serde(default)]
    pub role: Option<Vec<String>>,
}

/// Internal user record with password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

impl UserRecord {
    fn new(
        id: i64,
        username: String,
        email: String,
        password: &str,
        roles: Vec<Role>,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            id,
            username,
            email,
            password_hash: hash_password(password)?,
            roles,
        })
    }

    pub fn verify_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }
}

/// In-memory user store keyed by username.
///
/// Writes only happen through registration; every read clones out, so
/// callers never hold references into the map.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
    next_id: Arc<AtomicI64>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    pub fn insert(
        &self,
        username: String,
        email: String,
        password: &str,
        roles: Vec<Role>,
    ) -> Result<UserRecord, AuthError> {
        let mut users = self.users.write().expect("user store poisoned");

        if users.contains_key(&username) {
            return Err(AuthError::UsernameTaken);
        }
        if users.values().any(|u| u.email == email) {
            return Err(AuthError::EmailTaken);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = UserRecord::new(id, username, email, password, roles)?;
        users.insert(record.username.clone(), record.clone());
        Ok(record)
    }

    /// `lookup(subject) -> Option<record>`: the one read the auth core
    /// performs against this collaborator.
    pub fn lookup(&self, username: &str) -> Option<UserRecord> {
        let users = self.users.read().expect("user store poisoned");
        users.get(username).cloned()
    }
}

/// User service: authentication, registration and identity resolution.
#[derive(Debug, Clone)]
pub struct UserService {
    store: UserStore,
}

impl Default for UserService {
    fn default() -> Self {
        let service = Self {
            store: UserStore::new(),
        };
        service.seed_default_admin();
        service
    }
}

impl UserService {
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }

    /// Default admin account so the system is reachable on first start.
    fn seed_default_admin(&self) {
        match self.store.insert(
            "admin".to_string(),
            "admin@inmogest.local".to_string(),
            "admin123",
            vec![Role::Admin],
        ) {
            Ok(record) => info!(username = %record.username, "created default admin user"),
            Err(e) => warn!(error = %e, "failed to create default admin user"),
        }
    }

    /// Verify username/password against the store.
    pub fn authenticate(&self, request: &LoginRequest) -> Result<UserRecord, AuthError> {
        if request.username.is_empty() || request.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let user = self
            .store
            .lookup(&request.username)
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.verify_password(&request.password) {
            warn!(username = %request.username, "invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        debug!(username = %request.username, "user authenticated");
        Ok(user)
    }

    /// Register a new account. Field rules follow the original form
    /// contract: username 3-20 chars, email at most 50 with a sane shape,
    /// password 6-40 chars.
    pub fn register(&self, request: SignupRequest) -> Result<UserRecord, AuthError> {
        // Length rules count characters, not bytes.
        let username = request.username.trim();
        let username_chars = username.chars().count();
        if username_chars < 3 || username_chars > 20 {
            return Err(AuthError::invalid_field(
                "Username must be between 3 and 20 characters",
            ));
        }

        let email = request.email.trim();
        if email.is_empty() || email.chars().count() > 50 || !email.contains('@') {
            return Err(AuthError::invalid_field("Email should be valid"));
        }

        let password_chars = request.password.chars().count();
        if password_chars < 6 || password_chars > 40 {
            return Err(AuthError::invalid_field(
                "Password must be between 6 and 40 characters",
            ));
        }

        let roles = roles_from_request(request.role.as_deref());

        let record = self.store.insert(
            username.to_string(),
            email.to_string(),
            &request.password,
            roles,
        )?;

        info!(username = %record.username, "registered new user");
        Ok(record)
    }

    /// Resolve a validated subject into a request principal.
    ///
    /// The role set is cloned into the principal (defensive copy); the
    /// store record stays private to the store.
    pub fn resolve(&self, subject: &str) -> Result<Principal, AuthError> {
        let user = self
            .store
            .lookup(subject)
            .ok_or_else(|| AuthError::UserNotFound {
                username: subject.to_string(),
            })?;

        Ok(Principal::new(user.id, user.username, user.roles.clone()))
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }
}

/// Map requested role names onto the fixed vocabulary; anything
/// unrecognized (or nothing at all) grants the default user role.
fn roles_from_request(requested: Option<&[String]>) -> Vec<Role> {
    let Some(requested) = requested else {
        return vec![Role::User];
    };

    let mut roles: Vec<Role> = requested
        .iter()
        .filter_map(|name| match name.as_str() {
            "admin" => Some(Role::Admin),
            "mod" => Some(Role::Moderator),
            "user" => Some(Role::User),
            _ => None,
        })
        .collect();

    roles.sort();
    roles.dedup();

    if roles.is_empty() {
        roles.push(Role::User);
    }
    roles
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
