use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::api::error::message_body;
use crate::api::types::AppState;

pub const HEALTH_MESSAGE: &str = "School dashboard backend is running";

async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "message": HEALTH_MESSAGE,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn handle_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, message_body("Route not found."))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/health", get(handle_health))
}
