//! Request authentication filter
//!
//! Runs once per request, before routing: decides whether the path is
//! exempt, otherwise extracts and validates the bearer token and resolves
//! the identity. The outcome only shapes the request context: a principal
//! attached to the request extensions, or nothing. The filter never
//! answers a request itself; 401/403 belong to the authorization gate.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

/// Static set of path predicates that never require authentication:
/// login/signup, API docs, static assets, the root page and framework
/// error paths. Built once at startup, read-only afterwards.
#[derive(Debug, Clone)]
pub struct ExemptPaths {
    exact: &'static [&'static str],
    prefixes: &'static [&'static str],
    suffixes: &'static [&'static str],
}

impl ExemptPaths {
    pub fn standard() -> Self {
        Self {
            exact: &["/", "/error"],
            prefixes: &[
                "/api/v1/auth/",
                "/swagger-ui",
                "/api-docs",
                "/v3/api-docs",
                "/css/",
                "/js/",
                "/images/",
                "/.well-known/",
            ],
            suffixes: &[".html"],
        }
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.exact.contains(&path)
            || self.prefixes.iter().any(|p| path.starts_with(p))
            || self.suffixes.iter().any(|s| path.ends_with(s))
    }
}

/// Authentication middleware. Fail-open: every branch falls through to
/// `next.run`. A missing, malformed, expired or unresolvable credential
/// just means no principal gets attached, and the gate downstream decides
/// whether that matters for the dispatched endpoint.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().clone();

    if state.exempt.is_exempt(&path) {
        debug!(%method, %path, "exempt path, skipping authentication");
        return next.run(request).await;
    }

    // Exact, case-sensitive "Bearer " scheme; anything else is treated as
    // no credential at all.
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned);

    let Some(token) = token else {
        debug!(%method, %path, "no bearer token");
        return next.run(request).await;
    };

    if !state.validator.validate(&token) {
        warn!(%method, %path, "invalid bearer token");
        return next.run(request).await;
    }

    let Some(subject) = state.validator.subject(&token) else {
        return next.run(request).await;
    };

    match state.user_service.resolve(&subject) {
        Ok(principal) => {
            debug!(%method, %path, username = %principal.username(), "principal attached");
            request.extensions_mut().insert(principal);
        }
        Err(e) => {
            // Resolution failure must not abort the request; the request
            // simply stays anonymous.
            warn!(%method, %path, error = %e, "identity resolution failed");
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_endpoints_are_exempt() {
        let exempt = ExemptPaths::standard();
        assert!(exempt.is_exempt("/api/v1/auth/signin"));
        assert!(exempt.is_exempt("/api/v1/auth/signup"));
    }

    #[test]
    fn api_doc_paths_are_exempt() {
        let exempt = ExemptPaths::standard();
        assert!(exempt.is_exempt("/swagger-ui/index.html"));
        assert!(exempt.is_exempt("/api-docs/openapi.json"));
        assert!(exempt.is_exempt("/v3/api-docs/swagger-config"));
    }

    #[test]
    fn static_assets_are_exempt() {
        let exempt = ExemptPaths::standard();
        assert!(exempt.is_exempt("/css/style.css"));
        assert!(exempt.is_exempt("/js/app.js"));
        assert!(exempt.is_exempt("/images/logo.png"));
        assert!(exempt.is_exempt("/login.html"));
    }

    #[test]
    fn root_error_and_well_known_are_exempt() {
        let exempt = ExemptPaths::standard();
        assert!(exempt.is_exempt("/"));
        assert!(exempt.is_exempt("/error"));
        assert!(exempt.is_exempt("/.well-known/appspecific/com.chrome.devtools.json"));
    }

    #[test]
    fn resource_endpoints_are_not_exempt() {
        let exempt = ExemptPaths::standard();
        assert!(!exempt.is_exempt("/api/v1/inmobiliarias"));
        assert!(!exempt.is_exempt("/api/v1/contratos-renta/1"));
        assert!(!exempt.is_exempt("/api/v1/authx"));
    }
}
