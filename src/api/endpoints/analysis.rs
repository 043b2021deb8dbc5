//! History and analysis endpoints.

use axum::extract::State;
use axum::Json;

use crate::analysis::AnalysisStatus;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::QuestionnaireResponse;

/// `GET /api/history`: stored responses, newest first.
pub async fn history(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<QuestionnaireResponse>>, ApiError> {
    Ok(Json(ctx.core.history().list()))
}

/// `GET /api/analysis`: idle, loading, or the latest summary.
pub async fn status(State(ctx): State<ApiContext>) -> Result<Json<AnalysisStatus>, ApiError> {
    Ok(Json(ctx.core.analysis().status()))
}
