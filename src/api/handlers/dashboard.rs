use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;

use crate::api::types::AppState;
use crate::summary::DashboardSummary;

async fn handle_dashboard_summary(State(state): State<AppState>) -> Json<DashboardSummary> {
    let store = state.store.read().await;
    Json(DashboardSummary::compute(&store, &Local::now()))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/dashboard/summary", get(handle_dashboard_summary))
}
