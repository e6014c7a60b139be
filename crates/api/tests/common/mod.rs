//! Router harness shared by the API tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tally_api::{AppState, create_router};
use tally_db::Database;
use tally_shared::config::{AdminConfig, SharingConfig};
use tally_shared::{JwtConfig, JwtService};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "correct-horse";

pub fn app() -> Router {
    let state = AppState {
        db: Database::new(),
        jwt_service: Arc::new(JwtService::new(JwtConfig {
            secret: "api-test-secret".to_string(),
            access_token_expires_secs: 900,
            refresh_token_expires_secs: 3600,
        })),
        admin: Arc::new(AdminConfig {
            emails: vec![ADMIN_EMAIL.to_string()],
        }),
        sharing: SharingConfig::default(),
    };
    create_router(state)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers a user and returns `(access_token, response body)`.
pub async fn register(app: &Router, email: &str) -> (String, Value) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": PASSWORD,
            "full_name": "Test User",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let token = body["access_token"].as_str().unwrap().to_string();
    (token, body)
}

/// Creates a collaborator and returns its id.
pub async fn collaborator(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/collaborators",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "collaborator failed: {body}");
    body["id"].as_str().unwrap().to_string()
}

/// Creates an expense and returns its body.
pub async fn expense(
    app: &Router,
    token: &str,
    collaborator_id: &str,
    description: &str,
    value: &str,
    start: (i32, u32),
    installment_total: Option<i32>,
) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/expenses",
        Some(token),
        Some(json!({
            "collaborator_id": collaborator_id,
            "description": description,
            "value": value,
            "start": {"year": start.0, "month": start.1},
            "installment_total": installment_total,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "expense failed: {body}");
    body
}
