//! Questionnaire session endpoints.
//!
//! One session lives in `CoreState`. Every mutating call answers with the
//! refreshed `WizardView`, so the client never has to track steps itself.
//! Completing the session (good day, or `next` on the last visible step)
//! stores the response and, for a full log, schedules an analysis. The
//! session is back at the gate afterwards; the finished response rides
//! along in the view of the completing call only.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, LangQuery};
use crate::models::{AnswerSet, AnswerValue, Language, QuestionView, QuestionnaireResponse};
use crate::wizard::{Advance, Wizard, WizardState};

/// Snapshot of the session for rendering.
#[derive(Debug, Serialize)]
pub struct WizardView {
    pub phase: &'static str,
    /// 1-based position among the visible questions.
    pub step: Option<usize>,
    pub total: Option<usize>,
    pub question: Option<QuestionView>,
    /// Current answer, with an untouched scale reading as its minimum.
    pub answer: Option<AnswerValue>,
    pub answers: Option<AnswerSet>,
    pub can_advance: bool,
    /// Set only on the call that finished the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<QuestionnaireResponse>,
}

impl WizardView {
    pub fn of(wizard: &Wizard<'_>, lang: Language) -> Self {
        let phase = match wizard.state() {
            WizardState::NotStarted => "not_started",
            WizardState::InProgress { .. } => "in_progress",
        };
        let progress = wizard.progress();
        Self {
            phase,
            step: progress.map(|(step, _)| step),
            total: progress.map(|(_, total)| total),
            question: wizard.current_question().map(|q| q.localized(lang)),
            answer: wizard.current_answer(),
            answers: wizard.answers().cloned(),
            can_advance: wizard.can_advance(),
            response: None,
        }
    }

    fn finished(mut self, response: QuestionnaireResponse) -> Self {
        self.response = Some(response);
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
    pub value: AnswerValue,
}

#[derive(Debug, Deserialize)]
pub struct ToggleBody {
    pub value: String,
}

/// Store a finished response and start the analysis it calls for.
/// A failed write is logged; the session still counts as completed.
fn complete(ctx: &ApiContext, response: QuestionnaireResponse, lang: Language) {
    let ticket = match ctx.core.record_response(response) {
        Ok(ticket) => ticket,
        Err(e) => {
            tracing::error!(error = %e, "Failed to store questionnaire response");
            return;
        }
    };
    if let Some(ticket) = ticket {
        let core = ctx.core.clone();
        tokio::task::spawn_blocking(move || core.run_analysis(ticket, lang));
    }
}

/// `GET /api/wizard`: current session.
pub async fn view(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<WizardView>, ApiError> {
    let lang = ctx.language(query.lang);
    let wizard = ctx.core.wizard()?;
    Ok(Json(WizardView::of(&wizard, lang)))
}

/// `POST /api/wizard/good-day`: quick log, completes at once.
pub async fn good_day(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<WizardView>, ApiError> {
    let lang = ctx.language(query.lang);
    let (response, view) = {
        let mut wizard = ctx.core.wizard()?;
        let response = wizard.choose_good_day();
        (response, WizardView::of(&wizard, lang))
    };
    complete(&ctx, response.clone(), lang);
    Ok(Json(view.finished(response)))
}

/// `POST /api/wizard/not-good`: start the full questionnaire.
pub async fn not_good(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<WizardView>, ApiError> {
    let lang = ctx.language(query.lang);
    let mut wizard = ctx.core.wizard()?;
    wizard.choose_not_good();
    Ok(Json(WizardView::of(&wizard, lang)))
}

/// `PUT /api/wizard/answers/:id`: record or replace one answer.
pub async fn set_answer(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Query(query): Query<LangQuery>,
    Json(body): Json<AnswerBody>,
) -> Result<Json<WizardView>, ApiError> {
    let lang = ctx.language(query.lang);
    let mut wizard = ctx.core.wizard()?;
    wizard.set_answer(&id, body.value)?;
    Ok(Json(WizardView::of(&wizard, lang)))
}

/// `POST /api/wizard/answers/:id/toggle`: flip one multi-choice option.
pub async fn toggle(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Query(query): Query<LangQuery>,
    Json(body): Json<ToggleBody>,
) -> Result<Json<WizardView>, ApiError> {
    let lang = ctx.language(query.lang);
    let mut wizard = ctx.core.wizard()?;
    wizard.toggle_option(&id, &body.value)?;
    Ok(Json(WizardView::of(&wizard, lang)))
}

/// `POST /api/wizard/next`
pub async fn next(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<WizardView>, ApiError> {
    let lang = ctx.language(query.lang);
    let (completed, view) = {
        let mut wizard = ctx.core.wizard()?;
        let completed = match wizard.advance()? {
            Advance::Completed(response) => Some(response),
            Advance::Moved { .. } => None,
        };
        (completed, WizardView::of(&wizard, lang))
    };
    match completed {
        Some(response) => {
            complete(&ctx, response.clone(), lang);
            Ok(Json(view.finished(response)))
        }
        None => Ok(Json(view)),
    }
}

/// `POST /api/wizard/back`: one step back, or out to the gate.
pub async fn back(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<WizardView>, ApiError> {
    let lang = ctx.language(query.lang);
    let mut wizard = ctx.core.wizard()?;
    wizard.retreat()?;
    Ok(Json(WizardView::of(&wizard, lang)))
}

/// `POST /api/wizard/reset`: discard the session.
pub async fn reset(
    State(ctx): State<ApiContext>,
    Query(query): Query<LangQuery>,
) -> Result<Json<WizardView>, ApiError> {
    let lang = ctx.language(query.lang);
    let mut wizard = ctx.core.wizard()?;
    wizard.reset();
    Ok(Json(WizardView::of(&wizard, lang)))
}
