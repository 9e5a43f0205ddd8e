// src/handlers/mod.rs

use axum::{Json, response::IntoResponse};

pub mod commits;
pub mod daily;
pub mod logs;

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}
