use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use brandlens_analyzer::{AnalysisResult, AnalyzeError};
use serde::Deserialize;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    url: String,
}

/// `POST /analyze` with `{"url": "..."}`.
pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AnalysisResult>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })?;

    tracing::info!(request_id = %req_id.0, url = %request.url, "analyze requested");

    match state.analyzer.analyze(&request.url).await {
        Ok(result) => Ok(Json(ApiResponse {
            data: result,
            meta: ResponseMeta::new(req_id.0),
        })),
        Err(err @ AnalyzeError::InvalidUrl { .. }) => {
            Err(ApiError::new(req_id.0, "validation_error", err.to_string()))
        }
        Err(err) => {
            tracing::error!(request_id = %req_id.0, error = %err, "analysis failed");
            Err(ApiError::new(req_id.0, "internal_error", "analysis failed"))
        }
    }
}
