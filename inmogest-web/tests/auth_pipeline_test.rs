//! End-to-end authentication pipeline tests
//!
//! Drives the full router through tower's `oneshot` so every request
//! passes the real filter chain: CORS, authentication filter,
//! authorization gate, then handlers.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use inmogest_core::AuthConfig;
use inmogest_web::{create_app, AppState, WebConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-key";

fn test_app() -> Router {
    test_app_with_lifetime(86_400)
}

fn test_app_with_lifetime(lifetime_secs: i64) -> Router {
    let config = WebConfig {
        auth: AuthConfig::new(TEST_SECRET, lifetime_secs),
        ..WebConfig::default()
    };
    create_app(AppState::new(config))
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign in as the seeded admin and return the issued token.
async fn signin_admin(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/auth/signin",
            None,
            Some(json!({"username": "admin", "password": "admin123"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["type"], "Bearer");
    assert_eq!(body["username"], "admin");
    assert_eq!(body["roles"], json!(["ROLE_ADMIN"]));
    body["token"].as_str().unwrap().to_string()
}

/// Register a regular user and sign them in.
async fn signup_and_signin_user(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "password123",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "User registered successfully!");

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/auth/signin",
            None,
            Some(json!({"username": username, "password": "password123"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    body["token"].as_str().unwrap().to_string()
}

fn agency_payload(name: &str) -> Value {
    json!({
        "nombreComercial": name,
        "razonSocial": format!("{name} S.A. de C.V."),
        "rfcNit": "IMB890123AB1",
        "telefonoPrincipal": "555-0100",
        "emailContacto": "contacto@example.com",
        "direccionCompleta": "Av. Reforma 100",
        "ciudad": "CDMX",
        "estado": "CDMX",
        "codigoPostal": "06600",
        "personaContacto": "Ana Torres",
        "fechaRegistro": "2024-03-01",
        "estatus": "ACTIVA",
    })
}

#[tokio::test]
async fn health_endpoint_needs_no_token() {
    let app = test_app();

    let response = app
        .oneshot(request(Method::GET, "/api/v1/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn garbage_header_on_unprotected_path_is_ignored() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/v1/health",
            Some("((not a token))"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Exempt path with no handler behind it: 404, never 401.
    let response = app
        .oneshot(request(Method::GET, "/error", Some("((not a token))"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn protected_read_without_token_is_unauthorized() {
    let app = test_app();

    let response = app
        .oneshot(request(Method::GET, "/api/v1/inmobiliarias", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["status"], 401);
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(
        body["message"],
        "Full authentication is required to access this resource"
    );
    assert_eq!(body["path"], "/api/v1/inmobiliarias");
}

#[tokio::test]
async fn admin_can_read_and_write_agencies() {
    let app = test_app();
    let token = signin_admin(&app).await;

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/inmobiliarias",
            Some(&token),
            Some(agency_payload("Inmobiliaria Norte")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["nombreComercial"], "Inmobiliaria Norte");

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/inmobiliarias/{id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/v1/inmobiliarias/{id}"),
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn regular_user_can_read_but_not_write() {
    let app = test_app();
    let token = signup_and_signin_user(&app, "lector").await;

    let response = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/v1/inmobiliarias",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/inmobiliarias",
            Some(&token),
            Some(agency_payload("Inmobiliaria Sur")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["status"], 403);
    assert_eq!(body["error"], "Forbidden");
    assert_eq!(body["message"], "Access Denied");
    assert_eq!(body["path"], "/api/v1/inmobiliarias");
}

#[tokio::test]
async fn garbage_token_is_rejected_with_unauthorized() {
    let app = test_app();

    for token in ["not-a-token", "a.b", "a.b.c.d", ""] {
        let response = app
            .clone()
            .oneshot(request(
                Method::GET,
                "/api/v1/inmobiliarias",
                Some(token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "token {token:?} should not authenticate"
        );
    }
}

#[tokio::test]
async fn token_signed_with_other_key_is_rejected() {
    let app = test_app();

    // A token minted by a server holding a different secret.
    let foreign = {
        let config = WebConfig {
            auth: AuthConfig::new("a-completely-different-secret", 86_400),
            ..WebConfig::default()
        };
        let state = AppState::new(config);
        state.codec.issue("admin").unwrap()
    };

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/v1/inmobiliarias",
            Some(&foreign),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    // Zero lifetime makes every issued token already expired.
    let app = test_app_with_lifetime(0);
    let state = AppState::new(WebConfig {
        auth: AuthConfig::new(TEST_SECRET, 0),
        ..WebConfig::default()
    });
    let token = state.codec.issue("admin").unwrap();

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/v1/inmobiliarias",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_deleted_subject_does_not_authenticate() {
    let app = test_app();
    let state = AppState::new(WebConfig {
        auth: AuthConfig::new(TEST_SECRET, 86_400),
        ..WebConfig::default()
    });
    // Validly signed, but no such user exists in the store.
    let token = state.codec.issue("fantasma").unwrap();

    let response = app
        .oneshot(request(
            Method::GET,
            "/api/v1/inmobiliarias",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signin_with_wrong_password_is_unauthorized() {
    let app = test_app();

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/v1/auth/signin",
            None,
            Some(json!({"username": "admin", "password": "wrong"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_rejects_duplicate_username() {
    let app = test_app();
    signup_and_signin_user(&app, "duplicado").await;

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(json!({
                "username": "duplicado",
                "email": "otro@example.com",
                "password": "password123",
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Error: Username is already taken!");
}

#[tokio::test]
async fn options_preflight_passes_without_token() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/v1/inmobiliarias")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Preflight never reaches the authorization gate.
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_route_under_protection_still_requires_token() {
    let app = test_app();

    // No handler exists, but the gate runs before routing resolves.
    let response = app
        .oneshot(request(
            Method::GET,
            "/api/v1/propiedades/99",
            None,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
