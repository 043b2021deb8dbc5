//! Response history, completed questionnaire responses, newest first.

use std::sync::Arc;

use crate::db::{load_collection, load_collection_or_empty, save_collection, DatabaseError, DocumentStore, HISTORY_KEY};
use crate::models::QuestionnaireResponse;

#[derive(Clone)]
pub struct ResponseStore {
    store: Arc<dyn DocumentStore>,
}

impl ResponseStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persisted history. An absent or unreadable document reads as an
    /// empty history.
    pub fn list(&self) -> Vec<QuestionnaireResponse> {
        load_collection_or_empty(self.store.as_ref(), HISTORY_KEY)
    }

    /// Prepend a response and rewrite the whole history. Returns the new
    /// history. A corrupt document is replaced rather than appended to.
    pub fn append(
        &self,
        response: QuestionnaireResponse,
    ) -> Result<Vec<QuestionnaireResponse>, DatabaseError> {
        let mut history: Vec<QuestionnaireResponse> =
            load_collection(self.store.as_ref(), HISTORY_KEY).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Unreadable response history, starting over");
                Vec::new()
            });
        history.insert(0, response);
        save_collection(self.store.as_ref(), HISTORY_KEY, &history)?;
        tracing::info!(kind = %history[0].kind, total = history.len(), "Response recorded");
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDocumentStore;
    use crate::models::{AnswerSet, AnswerValue, LogKind};
    use chrono::{Duration, Utc};

    fn store() -> (Arc<MemoryDocumentStore>, ResponseStore) {
        let docs = Arc::new(MemoryDocumentStore::new());
        (docs.clone(), ResponseStore::new(docs))
    }

    #[test]
    fn empty_when_nothing_stored() {
        let (_, responses) = store();
        assert!(responses.list().is_empty());
    }

    #[test]
    fn append_prepends() {
        let (_, responses) = store();
        let earlier = Utc::now() - Duration::hours(1);
        responses.append(QuestionnaireResponse::quick(earlier)).unwrap();

        let mut answers = AnswerSet::new();
        answers.insert("disease_stage".into(), AnswerValue::from("early"));
        responses
            .append(QuestionnaireResponse::full(answers, Utc::now()))
            .unwrap();

        let history = responses.list();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, LogKind::Full);
        assert_eq!(history[1].kind, LogKind::Quick);
        assert_eq!(history[1].timestamp, earlier);
    }

    #[test]
    fn corrupt_history_reads_as_empty() {
        let (docs, responses) = store();
        docs.write(HISTORY_KEY, "not json at all").unwrap();
        assert!(responses.list().is_empty());

        let history = responses.append(QuestionnaireResponse::quick(Utc::now())).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(responses.list().len(), 1);
    }

    #[test]
    fn stored_shape_is_a_json_array() {
        let (docs, responses) = store();
        responses.append(QuestionnaireResponse::quick(Utc::now())).unwrap();
        let raw = docs.read(HISTORY_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["kind"], "quick");
    }
}
