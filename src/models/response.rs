use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::answer::AnswerSet;
use super::enums::LogKind;

/// A finished questionnaire session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireResponse {
    pub kind: LogKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "AnswerSet::is_empty")]
    pub answers: AnswerSet,
}

impl QuestionnaireResponse {
    /// "Good day" log: no answers, just the moment it was recorded.
    pub fn quick(timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: LogKind::Quick,
            timestamp,
            answers: AnswerSet::new(),
        }
    }

    pub fn full(answers: AnswerSet, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind: LogKind::Full,
            timestamp,
            answers,
        }
    }

    pub fn is_full(&self) -> bool {
        self.kind == LogKind::Full
    }
}
