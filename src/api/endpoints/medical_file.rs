//! Medical file endpoints: visit summaries and drug sensitivities.

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, LangQuery};
use crate::medical_file::{drug_sensitivities, visit_summaries, DrugSensitivity, VisitSummary};

/// `GET /api/medical-file/summaries?lang=`
pub async fn summaries(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<VisitSummary>>, ApiError> {
    Ok(Json(visit_summaries(ctx.language(query.lang))))
}

/// `GET /api/medical-file/sensitivities?lang=`
pub async fn sensitivities(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<DrugSensitivity>>, ApiError> {
    Ok(Json(drug_sensitivities(ctx.language(query.lang))))
}
