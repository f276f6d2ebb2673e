use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::api::types::AppState;

async fn handle_teachers_list(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store = state.store.read().await;
    Json(json!({ "teachers": store.teachers() }))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/teachers", get(handle_teachers_list))
}
