//! Shared helpers: an in-memory router and JSON request plumbing.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use skilllink_api::AppState;
use skilllink_api::config::ApiConfig;
use skilllink_core::auth::PasswordHasher;
use skilllink_core::auth::password::MIN_BCRYPT_COST;
use skilllink_core::models::auth::Role;
use tower::ServiceExt;

pub fn test_state() -> AppState {
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        pg_connection_url: String::new(),
        access_token_secret: "test-access-secret".into(),
        refresh_token_secret: "test-refresh-secret".into(),
    };
    AppState::in_memory(config, PasswordHasher::with_cost(MIN_BCRYPT_COST)).expect("state")
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub async fn register_and_login(app: &Router, name: &str, email: &str) -> Value {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"name": name, "email": email, "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    login(app, email).await
}

pub async fn login(app: &Router, email: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body
}

pub async fn provision(state: &AppState, name: &str, email: &str, role: Role) {
    state
        .gate
        .provision(name, email, "secret1", role)
        .await
        .expect("provision");
}

pub fn access(tokens: &Value) -> &str {
    tokens["accessToken"].as_str().expect("accessToken")
}

pub fn refresh(tokens: &Value) -> &str {
    tokens["refreshToken"].as_str().expect("refreshToken")
}

/// Send a raw body with an optional content type.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        req = req.header(header::CONTENT_TYPE, content_type);
    }
    let resp = app
        .clone()
        .oneshot(req.body(Body::from(body)).unwrap())
        .await
        .expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
