use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::types::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::core::routes())
        .merge(handlers::teachers::routes())
        .merge(handlers::fees::routes())
        .merge(handlers::attendance::routes())
        .merge(handlers::dashboard::routes())
        .fallback(handlers::core::handle_not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
