//! Application state shared by every request handler.
//!
//! Holds the document-backed stores, the single questionnaire session
//! and the analysis service. Wrapped in `Arc` at startup.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::analysis::{AnalysisError, AnalysisRequester, AnalysisService, AnalysisTicket, LlmClient, OllamaClient, should_analyze};
use crate::appointment::AppointmentStore;
use crate::config::Settings;
use crate::db::{self, DocumentStore, MemoryDocumentStore, SqliteDocumentStore};
use crate::history::ResponseStore;
use crate::journal::JournalStore;
use crate::models::{Language, QuestionnaireResponse};
use crate::questions::daily_questions;
use crate::wizard::Wizard;

pub struct CoreState {
    pub settings: Settings,
    history: ResponseStore,
    journal: JournalStore,
    appointments: AppointmentStore,
    /// One questionnaire session per process.
    wizard: Mutex<Wizard<'static>>,
    analysis: AnalysisService,
    requester: AnalysisRequester<Arc<dyn LlmClient>>,
}

impl CoreState {
    pub fn new(settings: Settings, store: Arc<dyn DocumentStore>, llm: Arc<dyn LlmClient>) -> Self {
        let journal = JournalStore::new(store.clone());
        let requester = AnalysisRequester::new(llm, &settings.model);
        Self {
            history: ResponseStore::new(store.clone()),
            appointments: AppointmentStore::new(store, journal.clone()),
            journal,
            wizard: Mutex::new(Wizard::new(daily_questions())),
            analysis: AnalysisService::new(),
            requester,
            settings,
        }
    }

    /// SQLite store under the data directory and an Ollama client.
    pub fn open(settings: Settings) -> Result<Self, CoreError> {
        let path = settings.database_path();
        let store = SqliteDocumentStore::open(&path)?;
        let llm = OllamaClient::new(&settings.ollama_url, settings.ai_timeout_secs)?;
        tracing::info!(db = %path.display(), ollama = %settings.ollama_url, model = %settings.model, "Core state ready");
        Ok(Self::new(settings, Arc::new(store), Arc::new(llm)))
    }

    /// Volatile state, nothing touches disk.
    pub fn in_memory(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(Settings::default(), Arc::new(MemoryDocumentStore::new()), llm)
    }

    pub fn history(&self) -> &ResponseStore {
        &self.history
    }

    pub fn journal(&self) -> &JournalStore {
        &self.journal
    }

    pub fn appointments(&self) -> &AppointmentStore {
        &self.appointments
    }

    pub fn analysis(&self) -> &AnalysisService {
        &self.analysis
    }

    pub fn default_language(&self) -> Language {
        self.settings.language
    }

    pub fn wizard(&self) -> Result<MutexGuard<'_, Wizard<'static>>, CoreError> {
        self.wizard.lock().map_err(|_| CoreError::LockPoisoned)
    }

    /// Persist a finished response. A full log also registers an analysis
    /// request, superseding any still pending; the caller runs it.
    pub fn record_response(
        &self,
        response: QuestionnaireResponse,
    ) -> Result<Option<AnalysisTicket>, CoreError> {
        let history = self.history.append(response)?;
        Ok(should_analyze(&history).then(|| self.analysis.request()))
    }

    /// Blocking: analyze the history as it stands when the call starts.
    pub fn run_analysis(&self, ticket: AnalysisTicket, lang: Language) -> Option<String> {
        self.analysis.run(ticket, || {
            let history = self.history.list();
            self.requester.analyze(&history, lang)
        })
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("AI client error: {0}")]
    Analysis(#[from] AnalysisError),
}
