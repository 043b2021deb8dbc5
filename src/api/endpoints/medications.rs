//! Medication endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, LangQuery};
use crate::medications::{daily_schedule, medication_lists, next_dose, MedicationListData};
use crate::models::CalendarEvent;

#[derive(Debug, Serialize)]
pub struct MedicationsResponse {
    #[serde(flatten)]
    pub lists: MedicationListData,
    /// Today's intake times, ordered.
    pub schedule: Vec<CalendarEvent>,
    pub next_dose: Option<CalendarEvent>,
}

/// `GET /api/medications?lang=`
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<MedicationsResponse>, ApiError> {
    let lang = ctx.language(query.lang);
    let now = chrono::Local::now();
    let schedule = daily_schedule(now.date_naive(), lang);
    let next = next_dose(&schedule, now.time()).cloned();
    Ok(Json(MedicationsResponse {
        lists: medication_lists(lang),
        schedule,
        next_dose: next,
    }))
}
