#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use debtfolio_core::storage::StorageSettings;
use debtfolio_server::api::app_router;
use debtfolio_server::{build_state, Config};

pub fn test_config(data_dir: &Path) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        cors_allow: vec!["*".to_string()],
        jwt_secret: b"0123456789abcdef0123456789abcdef".to_vec(),
        token_ttl: Duration::from_secs(3600),
        storage: StorageSettings::local(data_dir),
    }
}

pub fn build_test_app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let state = build_state(&config).unwrap();
    (app_router(state, &config), dir)
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
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({ "email": email, "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["accessToken"].as_str().unwrap().to_string()
}
