//! HTTP surface tests against the full router

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use storefront_auth::auth::Argon2Hasher;
use storefront_auth::config::{Config, EdgeConfig, JwtConfig, ServerConfig};
use storefront_auth::storage::Database;
use storefront_auth::tokens::JwtSigner;
use storefront_auth::{api, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "api-test-secret-0123456789abcdef-0123456789";

fn config(check_revocation: bool) -> Config {
    Config {
        edge: EdgeConfig { check_revocation },
        jwt: JwtConfig {
            expiration_seconds: 3600,
            secret: SECRET.to_string(),
        },
        server: ServerConfig::default(),
    }
}

fn router(check_revocation: bool) -> (Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path()).unwrap();
    let hasher = Arc::new(Argon2Hasher::with_params(1024, 1, 1).unwrap());
    let state = AppState::with_hasher(config(check_revocation), db, hasher).unwrap();
    (api::create_router(Arc::new(state)), temp_dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn logout_request(token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn me_request(authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/auth/me");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::empty()).unwrap()
}

fn ana() -> Value {
    json!({"name": "Ana", "email": "ana@shop.com", "password": "p1"})
}

async fn register_and_login(app: &Router) -> String {
    let (status, _) = send(app, post_json("/auth/register", ana())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        post_json("/auth/login", json!({"email": "ana@shop.com", "password": "p1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_login_logout_scenario() {
    let (app, _temp) = router(false);

    let (status, body) = send(&app, post_json("/auth/register", ana())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Ana");
    assert_eq!(body["email"], "ana@shop.com");
    assert_eq!(body["role"], "USER");
    assert!(body["id"].is_u64());
    assert!(body.get("password").is_none());

    let (status, body) = send(
        &app,
        post_json("/auth/login", json!({"email": "ana@shop.com", "password": "p1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "Bearer");
    assert_eq!(body["expiresIn"], 3600);
    assert_eq!(body["user"]["email"], "ana@shop.com");
    let token = body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    let (status, _) = send(&app, logout_request(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Existence-based: the revoked record is still found
    let (status, _) = send(&app, logout_request(&token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_register_errors() {
    let (app, _temp) = router(false);

    let (status, body) = send(
        &app,
        post_json(
            "/auth/register",
            json!({"name": "Ana", "email": "not-an-email", "password": "p1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, _) = send(
        &app,
        post_json("/auth/register", json!({"name": "Ana", "password": "p1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post_json(
            "/auth/register",
            json!({"name": "", "email": "ana@shop.com", "password": "p1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post_json("/auth/register", ana())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, post_json("/auth/register", ana())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _temp) = router(false);

    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_wrongly_typed_json_is_bad_request() {
    let (app, _temp) = router(false);

    let bodies = [
        json!({"name": null, "email": "ana@shop.com", "password": "p1"}),
        json!({"name": "Ana", "email": 5, "password": "p1"}),
        json!({"name": "Ana", "email": "ana@shop.com", "password": ["p1"]}),
    ];
    for payload in bodies {
        let (status, body) = send(&app, post_json("/auth/register", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad Request");
    }

    let (status, _) = send(
        &app,
        post_json("/auth/login", json!({"email": true, "password": "p1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_errors() {
    let (app, _temp) = router(false);
    send(&app, post_json("/auth/register", ana())).await;

    let (status, _) = send(
        &app,
        post_json("/auth/login", json!({"email": "nobody@shop.com", "password": "p1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        post_json("/auth/login", json!({"email": "ana@shop.com", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_logout_errors() {
    let (app, _temp) = router(false);

    let (status, _) = send(&app, logout_request("never-issued")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verify_reflects_revocation() {
    let (app, _temp) = router(false);
    let token = register_and_login(&app).await;

    let (status, body) = send(&app, post_json("/auth/verify", json!({"token": token}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "ana@shop.com");
    assert!(body["expiresAt"].is_string());

    send(&app, logout_request(&token)).await;

    let (status, _) = send(&app, post_json("/auth/verify", json!({"token": token}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_edge_rejections_carry_structured_body() {
    let (app, _temp) = router(false);

    for authorization in [None, Some("Basic abc"), Some("Bearer garbage")] {
        let (status, body) = send(&app, me_request(authorization)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], 401);
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["path"], "/auth/me");
        assert!(body["message"].is_string());
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn test_edge_rejects_expired_token() {
    let (app, _temp) = router(false);
    let signer = JwtSigner::new(SECRET, 3600).unwrap();
    let expired = signer
        .sign_at("ana@shop.com", chrono::Utc::now() - chrono::Duration::hours(2))
        .unwrap();

    let (status, _) = send(&app, me_request(Some(&format!("Bearer {expired}")))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stateless_edge_accepts_revoked_token() {
    let (app, _temp) = router(false);
    let token = register_and_login(&app).await;
    send(&app, logout_request(&token)).await;

    let (status, body) = send(&app, me_request(Some(&format!("Bearer {token}")))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "ana@shop.com");
}

#[tokio::test]
async fn test_stateful_edge_rejects_revoked_token() {
    let (app, _temp) = router(true);
    let token = register_and_login(&app).await;
    let header = format!("Bearer {token}");

    let (status, _) = send(&app, me_request(Some(&header))).await;
    assert_eq!(status, StatusCode::OK);

    send(&app, logout_request(&token)).await;

    let (status, _) = send(&app, me_request(Some(&header))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_lowercase_scheme_is_honoured_at_edge_and_logout() {
    let (app, _temp) = router(true);
    let token = register_and_login(&app).await;
    let header_value = format!("bearer {token}");

    let (status, body) = send(&app, me_request(Some(&header_value))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "ana@shop.com");

    let logout = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(header::AUTHORIZATION, header_value.as_str())
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, logout).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The same token is now refused everywhere, whatever the scheme casing
    for authorization in [header_value.clone(), format!("Bearer {token}")] {
        let (status, _) = send(&app, me_request(Some(&authorization))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _) = send(&app, post_json("/auth/verify", json!({"token": token}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let (app, _temp) = router(false);
    let request = Request::builder()
        .uri("/_internal/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
