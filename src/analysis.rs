//! AI status analysis of the questionnaire history.
//!
//! `AnalysisRequester` turns the history into a prompt and asks a local
//! model for a short clinical summary; any failure degrades to a fixed
//! localized sentence. `AnalysisService` keeps at most one request in
//! flight: newer requests supersede older ones, and only the latest
//! request may publish its result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Language, QuestionnaireResponse};

/// Number of earlier responses sent along with the latest one.
const PRIOR_RESPONSES: usize = 3;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert psychogeriatrician specializing in dementia 'Turning Points'. \
You help families understand if a medication cycle is ending or if a crisis is emerging \
based on daily behavioral and physical data.";

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Cannot connect to Ollama at {0}")]
    OllamaConnection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Failed to parse model response: {0}")]
    ResponseParsing(String),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("No questionnaire response to analyze")]
    NoHistory,
}

/// Fixed sentence returned whenever the analysis cannot be produced.
pub fn fallback_text(lang: Language) -> &'static str {
    match lang {
        Language::He => "לא ניתן היה לבצע ניתוח מצב כרגע. אנא פנה לרופא אם יש ספק.",
        Language::En => "Could not perform analysis at this time. Please contact a doctor if in doubt.",
    }
}

/// Analysis runs only after a full log; quick logs never trigger it.
pub fn should_analyze(history: &[QuestionnaireResponse]) -> bool {
    history.first().is_some_and(QuestionnaireResponse::is_full)
}

/// Prompt for the latest response plus up to three earlier ones.
pub fn build_prompt(
    history: &[QuestionnaireResponse],
    lang: Language,
) -> Result<String, AnalysisError> {
    let latest = history.first().ok_or(AnalysisError::NoHistory)?;
    let prior_end = history.len().min(1 + PRIOR_RESPONSES);
    let prior = &history[1..prior_end];

    let current = serde_json::to_string(latest)
        .map_err(|e| AnalysisError::ResponseParsing(e.to_string()))?;
    let previous = serde_json::to_string(prior)
        .map_err(|e| AnalysisError::ResponseParsing(e.to_string()))?;
    let language = match lang {
        Language::He => "Hebrew",
        Language::En => "English",
    };

    Ok(format!(
        "Analyze this daily monitoring report for an Alzheimer's patient from the perspective of a psychogeriatrician.
The primary goal is to identify \"Turning Points\" in the medication cycle or sharp behavioral deteriorations.

Current Data: {current}
History (previous sessions): {previous}

The family provides this data to know if they need to change medications, expedite a doctor appointment, or initiate a video call.

Respond in {language}.
Include:
1. A concise status summary focused on behavioral changes and vital signs.
2. Identification of critical red flags (e.g., physical aggression, refusal to eat/drink, new side effects like tremors).
3. Stage 2/3 Action Recommendation:
   - If stable: Recommend \"Daily Monitoring\".
   - If subtle changes: Recommend \"Professional Consultation\" (message in app).
   - If critical: Recommend \"Expedite Appointment\" and \"Video Call\".
"
    ))
}

// ═══════════════════════════════════════════════════════════
// LLM client
// ═══════════════════════════════════════════════════════════

/// Text generation backend.
pub trait LlmClient: Send + Sync {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, AnalysisError>;
}

impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, AnalysisError> {
        (**self).generate(model, prompt, system)
    }
}

/// Ollama HTTP client for local inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, AnalysisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AnalysisError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl LlmClient for OllamaClient {
    fn generate(&self, model: &str, prompt: &str, system: &str) -> Result<String, AnalysisError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                AnalysisError::OllamaConnection(self.base_url.clone())
            } else if e.is_timeout() {
                AnalysisError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
            } else {
                AnalysisError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AnalysisError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| AnalysisError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }
}

// ═══════════════════════════════════════════════════════════
// Requester
// ═══════════════════════════════════════════════════════════

pub struct AnalysisRequester<C: LlmClient> {
    client: C,
    model: String,
}

impl<C: LlmClient> AnalysisRequester<C> {
    pub fn new(client: C, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    /// Single attempt. Never fails: errors and blank output yield the
    /// localized fallback.
    pub fn analyze(&self, history: &[QuestionnaireResponse], lang: Language) -> String {
        match self.try_analyze(history, lang) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, model = %self.model, "Analysis failed, using fallback");
                fallback_text(lang).to_string()
            }
        }
    }

    fn try_analyze(
        &self,
        history: &[QuestionnaireResponse],
        lang: Language,
    ) -> Result<String, AnalysisError> {
        let prompt = build_prompt(history, lang)?;
        let text = self.client.generate(&self.model, &prompt, SYSTEM_INSTRUCTION)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

// ═══════════════════════════════════════════════════════════
// Single-flight service
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisStatus {
    Idle,
    Loading,
    Ready {
        text: String,
        generated_at: DateTime<Utc>,
    },
}

/// Handle for one requested analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket(u64);

pub struct AnalysisService {
    /// Exclusive access: one model call at a time.
    lock: Mutex<()>,
    generation: AtomicU64,
    status: Mutex<AnalysisStatus>,
}

impl AnalysisService {
    pub fn new() -> Self {
        Self {
            lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            status: Mutex::new(AnalysisStatus::Idle),
        }
    }

    /// Register a new analysis. Supersedes every earlier ticket.
    pub fn request(&self) -> AnalysisTicket {
        let ticket = AnalysisTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        self.set_status(AnalysisStatus::Loading);
        ticket
    }

    pub fn is_current(&self, ticket: AnalysisTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Run `analyze` under the exclusive lock. A ticket superseded while
    /// waiting skips the call; a ticket superseded during the call has its
    /// result discarded. Returns the published text.
    pub fn run(&self, ticket: AnalysisTicket, analyze: impl FnOnce() -> String) -> Option<String> {
        let _guard = match self.lock.lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::error!("Analysis lock poisoned");
                return None;
            }
        };

        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "Analysis superseded before start");
            return None;
        }

        let text = analyze();

        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "Analysis superseded, result discarded");
            return None;
        }
        self.set_status(AnalysisStatus::Ready {
            text: text.clone(),
            generated_at: Utc::now(),
        });
        Some(text)
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
            .lock()
            .map(|s| s.clone())
            .unwrap_or(AnalysisStatus::Idle)
    }

    fn set_status(&self, status: AnalysisStatus) {
        if let Ok(mut current) = self.status.lock() {
            *current = status;
        }
    }
}

impl Default for AnalysisService {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Test clients
// ═══════════════════════════════════════════════════════════

/// Mock LLM client for testing, returns a configurable response and
/// counts calls.
#[cfg(test)]
pub(crate) struct MockLlmClient {
    response: Result<String, String>,
    pub calls: std::sync::atomic::AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
}

#[cfg(test)]
impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: Default::default(),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            ..Self::new("")
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
impl LlmClient for MockLlmClient {
    fn generate(&self, _model: &str, prompt: &str, _system: &str) -> Result<String, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        self.response
            .clone()
            .map_err(AnalysisError::HttpClient)
    }
}
