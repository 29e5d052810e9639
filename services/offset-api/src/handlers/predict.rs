//! Offset report handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics::counter;
use tracing::{info, instrument};

use offset_report::{OffsetSummary, ReportRequest};
use renderer::{render_comparison, RenderError};

use crate::error::ApiError;
use crate::state::AppState;

fn parse_body(
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<ReportRequest, ApiError> {
    body.map(|Json(request)| request)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// POST /predict - Build an offset report and return its summary.
#[instrument(skip_all)]
pub async fn predict_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<OffsetSummary>, ApiError> {
    counter!("offset_api_requests_total", "endpoint" => "predict").increment(1);
    let request = parse_body(body)?;

    let report = state.builder.build_request(&request).await?;
    info!(
        start = %request.start_date,
        end = %request.end_date,
        offset_megatons = report.offset_megatons,
        "Prediction served"
    );

    Ok(Json(report.summary()))
}

/// POST /predict/comparison.png - Render start and end surfaces side by side.
#[instrument(skip_all)]
pub async fn comparison_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    counter!("offset_api_requests_total", "endpoint" => "comparison").increment(1);
    let request = parse_body(body)?;

    let report = state.builder.build_request(&request).await?;
    let options = state.comparison;
    let png = tokio::task::spawn_blocking(move || {
        render_comparison(
            &report.start.estimate.surface,
            &report.end.estimate.surface,
            &options,
        )
    })
    .await
    .map_err(|e| RenderError::Encode(format!("render task failed: {}", e)))??;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    )
        .into_response())
}
