use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{error, info};

use crate::{
    app_state::AppState,
    pipeline::{ScrapeParams, run_scrape},
    scrape::dtos::{ErrorResponse, ScrapeRequest, ScrapeResponse},
};

#[utoipa::path(
    post,
    path = "/scrape",
    tag = "scrape",
    request_body = ScrapeRequest,
    responses(
        (status = 200, description = "Scrape run completed", body = ScrapeResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 500, description = "Run failed", body = ErrorResponse)
    )
)]
pub async fn scrape(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Response {
    if request.limit == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("limit must be greater than zero")),
        )
            .into_response();
    }

    info!(
        limit = request.limit,
        zone = %request.zone,
        owner_only = request.owner_only,
        "scrape run requested"
    );

    let params = ScrapeParams {
        limit: request.limit as usize,
        zone: request.zone,
        property_type: request.property_type,
        owner_only: request.owner_only,
    };

    match run_scrape(
        state.renderer.as_ref(),
        state.config.as_ref(),
        state.keywords.as_ref(),
        &params,
    )
    .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ScrapeResponse {
                success: true,
                data: outcome.results,
                stats: outcome.stats,
                filter_applied: outcome.filter_applied,
                timestamp: Utc::now(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "scrape run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response()
        }
    }
}
