//! In-process mock of the detection API for integration tests
//!
//! Binds an axum router to an ephemeral port and serves the subset of the
//! API surface the client under test exercises.

// Each integration test binary compiles its own copy of this module and
// uses a different subset of it.
#![allow(dead_code)]

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

/// Token issued by the mock login endpoint
pub const TOKEN: &str = "test-token-1";

pub fn user_json() -> Value {
    json!({"id": "u-1", "username": "alice", "email": "alice@example.com"})
}

pub fn fake_prediction() -> Value {
    json!({
        "filename": "clip.wav",
        "label": "FAKE",
        "confidence": 87.0,
        "real_probability": 13.0,
        "fake_probability": 87.0,
        "raw_score": 0.87
    })
}

pub fn real_prediction() -> Value {
    json!({
        "filename": "speech.wav",
        "label": "REAL",
        "confidence": 95.0,
        "real_probability": 95.0,
        "fake_probability": 5.0,
        "raw_score": 0.05
    })
}

pub fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Missing or invalid token."})),
    )
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "alice" && body["password"] == "secret" {
        (
            StatusCode::OK,
            Json(json!({
                "message": "Login successful.",
                "token": TOKEN,
                "user": user_json()
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid username or password."})),
        )
    }
}

async fn register(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "taken" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": "Username or email already exists."})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful.",
            "token": TOKEN,
            "user": {
                "id": "u-2",
                "username": body["username"],
                "email": body["email"]
            }
        })),
    )
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match bearer(&headers) {
        Some(token) if token == TOKEN => (StatusCode::OK, Json(user_json())),
        _ => unauthorized(),
    }
}

async fn history(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match bearer(&headers) {
        Some(token) if token == TOKEN => (
            StatusCode::OK,
            Json(json!({"predictions": [{
                "id": "p-1",
                "filename": "clip.wav",
                "label": "FAKE",
                "confidence": 87.0,
                "real_probability": 13.0,
                "fake_probability": 87.0,
                "created_at": "2024-06-01 12:00:00"
            }]})),
        ),
        _ => unauthorized(),
    }
}

async fn metrics(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match bearer(&headers) {
        Some(token) if token == TOKEN => (
            StatusCode::OK,
            Json(json!({"accuracy": 91.52, "confusion_matrix": [[460, 40], [45, 455]]})),
        ),
        _ => unauthorized(),
    }
}

/// The standard mock API, returning `predict_response` for every
/// authenticated `/predict` call
pub fn api_router(predict_response: Value) -> Router {
    let predict = move |headers: HeaderMap| {
        let response = predict_response.clone();
        async move {
            match bearer(&headers) {
                Some(token) if token == TOKEN => (StatusCode::OK, Json(response)),
                _ => unauthorized(),
            }
        }
    };

    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/predict", post(predict))
        .route("/api/history", get(history))
        .route("/api/metrics", get(metrics))
}

pub struct MockServer {
    /// Base URL including the `/api` prefix
    pub base_url: String,
}

/// Serve a router on an ephemeral local port
pub async fn spawn(app: Router) -> MockServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    MockServer {
        base_url: format!("http://{}/api", addr),
    }
}
