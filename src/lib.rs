pub mod app_state;
pub mod config;
pub mod extract;
pub mod fetcher;
pub mod health;
pub mod pipeline;
pub mod render;
pub mod scrape;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use app_state::AppState;

/// Build the service router over an explicitly constructed state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/scrape", post(scrape::handlers::scrape))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
