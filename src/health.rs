use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

const SERVICE_NAME: &str = "propleads";

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    service: String,
    engine: String,
    timestamp: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        service: SERVICE_NAME.to_string(),
        engine: state.renderer.engine().to_string(),
        timestamp: Utc::now(),
    })
}
