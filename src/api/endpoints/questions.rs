//! Question bank endpoint.

use axum::extract::{Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, LangQuery};
use crate::models::QuestionView;
use crate::questions::daily_questions;

/// `GET /api/questions?lang=`: the full bank in display order.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<QuestionView>>, ApiError> {
    let lang = ctx.language(query.lang);
    Ok(Json(daily_questions().iter().map(|q| q.localized(lang)).collect()))
}
