//! Authorization gate and access-denied responder
//!
//! One declarative rule table maps endpoint prefixes to required role
//! sets; a single middleware evaluates it against the principal the
//! request filter attached (or didn't). This is the only place that
//! produces 401/403, so the denial body is uniform everywhere.

use crate::{auth::Principal, AppState};
use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use inmogest_core::Role;
use serde::Serialize;
use tracing::{debug, warn};

/// Method classes a rule applies to. Safe methods (GET/HEAD) are reads;
/// everything mutating is a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodClass {
    Read,
    Write,
}

impl MethodClass {
    fn of(method: &Method) -> Option<Self> {
        match *method {
            Method::GET | Method::HEAD => Some(MethodClass::Read),
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE => {
                Some(MethodClass::Write)
            }
            // OPTIONS (CORS preflight) and anything exotic carry no rule.
            _ => None,
        }
    }
}

/// One entry of the rule table: requests whose path starts with
/// `path_prefix` and whose method falls in `methods` require any of
/// `required`.
#[derive(Debug, Clone)]
pub struct AccessRule {
    pub path_prefix: &'static str,
    pub methods: MethodClass,
    pub required: &'static [Role],
}

const READ_ROLES: &[Role] = &[Role::User, Role::Admin];
const WRITE_ROLES: &[Role] = &[Role::Admin];

const PROTECTED_PREFIXES: &[&str] = &[
    "/api/v1/inmobiliarias",
    "/api/v1/propiedades",
    "/api/v1/conceptos-pago",
    "/api/v1/configuracion-recargos",
    "/api/v1/contratos-renta",
];

/// The process-wide authorization rule table. Immutable after startup;
/// evaluated fresh on every request.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// The standard table for the resource endpoints: reads need USER or
    /// ADMIN, writes need ADMIN.
    pub fn standard() -> Self {
        let mut rules = Vec::with_capacity(PROTECTED_PREFIXES.len() * 2);
        for prefix in PROTECTED_PREFIXES {
            rules.push(AccessRule {
                path_prefix: prefix,
                methods: MethodClass::Read,
                required: READ_ROLES,
            });
            rules.push(AccessRule {
                path_prefix: prefix,
                methods: MethodClass::Write,
                required: WRITE_ROLES,
            });
        }
        Self { rules }
    }

    /// Required role set for (method, path), or `None` when no rule
    /// matches and the request may proceed without a principal.
    pub fn required_roles(&self, method: &Method, path: &str) -> Option<&'static [Role]> {
        let class = MethodClass::of(method)?;
        self.rules
            .iter()
            .find(|rule| rule.methods == class && path.starts_with(rule.path_prefix))
            .map(|rule| rule.required)
    }
}

/// Uniform structured error body for denied access. Identical shape for
/// every cause, so clients can branch on `status` alone.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub error: &'static str,
    pub message: String,
    pub path: String,
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status: 401,
            error: "Unauthorized",
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status: 403,
            error: "Forbidden",
            message: message.into(),
            path: path.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Authorization middleware. Looks up the rule for the dispatched
/// endpoint and answers 401 (no principal), 403 (principal without a
/// required role) or passes through.
pub async fn authorize(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().clone();

    let Some(required) = state.policy.required_roles(&method, &path) else {
        return next.run(request).await;
    };

    match request.extensions().get::<Principal>() {
        None => {
            warn!(%method, %path, "unauthenticated access to protected endpoint");
            ApiError::unauthorized(
                "Full authentication is required to access this resource",
                path,
            )
            .into_response()
        }
        Some(principal) if !principal.has_any_role(required) => {
            warn!(
                %method,
                %path,
                username = %principal.username(),
                "insufficient role for endpoint"
            );
            ApiError::forbidden("Access Denied", path).into_response()
        }
        Some(principal) => {
            debug!(%method, %path, username = %principal.username(), "access granted");
            next.run(request).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_require_user_or_admin() {
        let policy = AccessPolicy::standard();
        let required = policy
            .required_roles(&Method::GET, "/api/v1/inmobiliarias")
            .unwrap();
        assert!(required.contains(&Role::User));
        assert!(required.contains(&Role::Admin));
        assert!(!required.contains(&Role::Moderator));
    }

    #[test]
    fn writes_require_admin_only() {
        let policy = AccessPolicy::standard();
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            let required = policy
                .required_roles(&method, "/api/v1/contratos-renta/7")
                .unwrap();
            assert_eq!(required, WRITE_ROLES);
        }
    }

    #[test]
    fn rules_cover_subpaths_of_each_resource() {
        let policy = AccessPolicy::standard();
        assert!(policy
            .required_roles(&Method::GET, "/api/v1/conceptos-pago/3")
            .is_some());
        assert!(policy
            .required_roles(&Method::DELETE, "/api/v1/configuracion-recargos/9")
            .is_some());
    }

    #[test]
    fn unlisted_paths_have_no_rule() {
        let policy = AccessPolicy::standard();
        assert!(policy
            .required_roles(&Method::GET, "/api/v1/health")
            .is_none());
        assert!(policy
            .required_roles(&Method::POST, "/api/v1/auth/signin")
            .is_none());
    }

    #[test]
    fn preflight_requests_have_no_rule() {
        let policy = AccessPolicy::standard();
        assert!(policy
            .required_roles(&Method::OPTIONS, "/api/v1/inmobiliarias")
            .is_none());
    }

    #[test]
    fn principal_role_intersection_decides() {
        let user = Principal::new(1, "u", vec![Role::User]);
        let admin = Principal::new(2, "a", vec![Role::Admin]);

        assert!(user.has_any_role(READ_ROLES));
        assert!(!user.has_any_role(WRITE_ROLES));
        assert!(admin.has_any_role(READ_ROLES));
        assert!(admin.has_any_role(WRITE_ROLES));
    }

    #[test]
    fn error_bodies_serialize_with_the_fixed_shape() {
        let err = ApiError::unauthorized("JWT token is expired", "/api/v1/inmobiliarias");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["status"], 401);
        assert_eq!(value["error"], "Unauthorized");
        assert_eq!(value["message"], "JWT token is expired");
        assert_eq!(value["path"], "/api/v1/inmobiliarias");
    }
}
