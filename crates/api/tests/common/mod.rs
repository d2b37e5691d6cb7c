#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use parish_core::payroll::PayrollRules;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use parish_api::router::build_app_router;
use parish_api::auth::jwt::JwtConfig;
use parish_api::config::ServerConfig;
use parish_api::state::AppState;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: String::new(),
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 60,
        },
        payroll: PayrollRules::default(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Same construction as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };
    build_app_router(state).expect("test config should produce a valid app")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder("GET", uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, builder("GET", uri, Some(token)).body(Body::empty()).unwrap()).await
}

/// GET with a headquarters token scoped to one organization.
pub async fn get_as_org(app: Router, uri: &str, token: &str, org_id: i64) -> Response<Body> {
    let request = builder("GET", uri, Some(token))
        .header("x-organization-id", org_id.to_string())
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    builder(method, uri, token)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, json_request("POST", uri, None, &body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), &body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request("PUT", uri, Some(token), &body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, json_request("PATCH", uri, Some(token), &body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, builder("DELETE", uri, Some(token)).body(Body::empty()).unwrap()).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// A registered organization and its access token.
pub struct TestOrg {
    pub id: i64,
    pub token: String,
}

/// Register a standalone organization through the API.
pub async fn register_org(app: &Router, name: &str) -> TestOrg {
    let email = format!("{}@parish.test", name.to_lowercase().replace(' ', "-"));
    let body = json!({ "name": name, "email": email, "password": TEST_PASSWORD });
    let response = post_json(app.clone(), "/api/v1/auth/organization/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    TestOrg {
        id: json["principal"]["id"].as_i64().unwrap(),
        token: json["access_token"].as_str().unwrap().to_string(),
    }
}

/// Register a headquarters through the API and return its token.
pub async fn register_headquarters(app: &Router, name: &str) -> String {
    let email = format!("{}@hq.test", name.to_lowercase().replace(' ', "-"));
    let body = json!({ "name": name, "email": email, "password": TEST_PASSWORD });
    let response = post_json(app.clone(), "/api/v1/auth/headquarters/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create a role with `permissions` in the organization, returning its id.
pub async fn create_role(app: &Router, org: &TestOrg, name: &str, permissions: &[&str]) -> i64 {
    let body = json!({ "name": name, "permissions": permissions });
    let response = post_json_auth(app.clone(), "/api/v1/roles", &org.token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a user holding `role_id`, returning the user id.
pub async fn create_user(app: &Router, org: &TestOrg, email: &str, role_id: i64) -> i64 {
    let body = json!({
        "full_name": "Test User",
        "email": email,
        "password": TEST_PASSWORD,
        "role_id": role_id,
    });
    let response = post_json_auth(app.clone(), "/api/v1/users", &org.token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Log a user in and return the access token.
pub async fn login_user(app: &Router, email: &str) -> String {
    let body = json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create a user holding a fresh role with exactly `permissions` and log in.
pub async fn user_with_permissions(app: &Router, org: &TestOrg, permissions: &[&str]) -> String {
    let tag = if permissions.is_empty() {
        "none".to_string()
    } else {
        permissions.join("-").replace('.', "_")
    };
    let role_id = create_role(app, org, &format!("role-{tag}"), permissions).await;
    let email = format!("user-{tag}@parish.test");
    create_user(app, org, &email, role_id).await;
    login_user(app, &email).await
}

/// Parse a decimal amount serialized as a JSON string.
pub fn money(value: &Value) -> rust_decimal::Decimal {
    value.as_str().unwrap().parse().unwrap()
}
