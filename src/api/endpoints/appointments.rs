//! Doctor and appointment endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, LangQuery};
use crate::appointment::{find_doctor, week_days, WeekDay, DOCTORS};
use crate::journal::parse_ymd;
use crate::models::{Appointment, AppointmentRequest, DoctorView};

/// `GET /api/doctors?lang=`
pub async fn doctors(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<DoctorView>>, ApiError> {
    let lang = ctx.language(query.lang);
    Ok(Json(DOCTORS.iter().map(|d| d.localized(lang)).collect()))
}

/// `GET /api/appointments`: booked appointments, newest first.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Appointment>>, ApiError> {
    Ok(Json(ctx.core.appointments().list()))
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub doctor_id: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct SlotsResponse {
    pub doctor_id: String,
    pub date: String,
    pub slots: Vec<&'static str>,
}

/// `GET /api/appointments/slots?doctor_id=&date=`: free times.
pub async fn slots(
    State(ctx): State<ApiContext>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, ApiError> {
    if find_doctor(&query.doctor_id).is_none() {
        return Err(ApiError::NotFound(format!("Unknown doctor: {}", query.doctor_id)));
    }
    if parse_ymd(&query.date).is_none() {
        return Err(ApiError::BadRequest(format!(
            "Invalid date (expected YYYY-MM-DD): {}",
            query.date
        )));
    }
    let slots = ctx.core.appointments().available_slots(&query.doctor_id, &query.date);
    Ok(Json(SlotsResponse {
        doctor_id: query.doctor_id,
        date: query.date,
        slots,
    }))
}

/// `GET /api/appointments/days?lang=`: the bookable week from today.
pub async fn days(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<WeekDay>>, ApiError> {
    let lang = ctx.language(query.lang);
    Ok(Json(week_days(chrono::Local::now().date_naive(), lang)))
}

/// `POST /api/appointments?lang=`: book a slot.
pub async fn book(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
    Json(request): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    let lang = ctx.language(query.lang);
    let appointment = ctx.core.appointments().book(request, lang)?;
    Ok((StatusCode::CREATED, Json(appointment)))
}
