//! Journal endpoints.
//!
//! - `GET /api/journal?date=`: agenda for one day (default today)
//! - `POST /api/journal/events`: add a manual entry
//! - `DELETE /api/journal/events/:id`: remove a stored entry
//! - `GET /api/journal/export`: iCalendar download

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, LangQuery};
use crate::journal::{export_file_name, export_ics, parse_ymd, AgendaEntry};
use crate::models::{CalendarEvent, Language, NewCalendarEvent};

#[derive(Debug, Deserialize)]
pub struct AgendaQuery {
    pub date: Option<String>,
    pub lang: Option<Language>,
}

#[derive(Debug, Serialize)]
pub struct AgendaResponse {
    pub date: String,
    pub entries: Vec<AgendaEntry>,
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// `GET /api/journal?date=YYYY-MM-DD`
pub async fn agenda(
    State(ctx): State<ApiContext>,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<AgendaResponse>, ApiError> {
    let lang = ctx.language(query.lang);
    let date = match query.date.as_deref() {
        Some(raw) => parse_ymd(raw).ok_or_else(|| {
            ApiError::BadRequest(format!("Invalid date (expected YYYY-MM-DD): {raw}"))
        })?,
        None => today(),
    };
    Ok(Json(AgendaResponse {
        date: date.format("%Y-%m-%d").to_string(),
        entries: ctx.core.journal().day_agenda(date, lang),
    }))
}

/// `POST /api/journal/events`
pub async fn add(
    State(ctx): State<ApiContext>,
    Json(draft): Json<NewCalendarEvent>,
) -> Result<(StatusCode, Json<CalendarEvent>), ApiError> {
    let event = ctx.core.journal().add(draft)?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `DELETE /api/journal/events/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.core.journal().remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/journal/export?lang=`: stored entries and today's
/// medication times as a `.ics` attachment.
pub async fn export(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Response, ApiError> {
    let lang = ctx.language(query.lang);
    let events = ctx.core.journal().export_events(today(), lang);
    let body = export_ics(&events);
    let disposition = HeaderValue::from_str(&content_disposition(export_file_name(lang)))
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(events = events.len(), "Journal exported");
    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/calendar; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// Attachment header with an ASCII fallback and the UTF-8 name (RFC 6266).
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}
