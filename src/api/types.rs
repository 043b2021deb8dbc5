//! Shared types for the API layer.

use std::sync::Arc;

use serde::Deserialize;

use crate::core_state::CoreState;
use crate::models::Language;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }

    /// Requested language, else the configured default.
    pub fn language(&self, requested: Option<Language>) -> Language {
        requested.unwrap_or_else(|| self.core.default_language())
    }
}

/// `?lang=he|en` on any localized endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<Language>,
}
