//! Daily questionnaire wizard.
//!
//! A session starts at the good-day / not-good gate. "Good day" finalizes
//! a quick log on the spot; "not good" walks the visible questions one
//! step at a time. The visible list is recomputed from the answers on
//! every call, so the stored step is always clamped against it before
//! use. Only a finished traversal produces a response; leaving mid-flow
//! discards the answers. Finalizing hands the response to the caller and
//! puts the machine back at the gate.

use chrono::Utc;
use serde::Serialize;

use crate::models::{AnswerSet, AnswerValue, Question, QuestionKind, QuestionnaireResponse};
use crate::visibility::{is_visible, visible_questions};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WizardError {
    #[error("No questionnaire in progress")]
    NotInProgress,

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Question {id} expects a {expected} answer")]
    AnswerTypeMismatch { id: String, expected: &'static str },

    #[error("Question {id} has no option {value}")]
    UnknownOption { id: String, value: String },

    #[error("Question {id} expects a value between {min} and {max}")]
    OutOfRange { id: String, min: i64, max: i64 },

    #[error("Current answer to {0} is not valid")]
    StepInvalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum WizardState {
    NotStarted,
    InProgress { step: usize, answers: AnswerSet },
}

/// Outcome of a successful `advance`.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Moved { step: usize },
    Completed(QuestionnaireResponse),
}

/// Validity of a (possibly missing) answer for one question.
pub fn is_answer_valid(question: &Question, value: Option<&AnswerValue>) -> bool {
    match &question.kind {
        QuestionKind::Scale { .. } => true,
        QuestionKind::Number { min, max } => match value.and_then(AnswerValue::as_number) {
            Some(n) => min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi),
            None => false,
        },
        QuestionKind::SingleChoice { .. } => {
            matches!(value.and_then(AnswerValue::as_text), Some(v) if !v.is_empty())
        }
        QuestionKind::MultiChoice { .. } => {
            matches!(value.and_then(AnswerValue::as_choices), Some(c) if !c.is_empty())
        }
        QuestionKind::FreeText => {
            matches!(value.and_then(AnswerValue::as_text), Some(v) if !v.trim().is_empty())
        }
    }
}

pub struct Wizard<'a> {
    bank: &'a [Question],
    state: WizardState,
}

impl<'a> Wizard<'a> {
    pub fn new(bank: &'a [Question]) -> Self {
        Self {
            bank,
            state: WizardState::NotStarted,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Answers of the session in progress.
    pub fn answers(&self) -> Option<&AnswerSet> {
        match &self.state {
            WizardState::InProgress { answers, .. } => Some(answers),
            _ => None,
        }
    }

    /// "Good day": finalize a quick log immediately. Any session in
    /// progress is discarded.
    pub fn choose_good_day(&mut self) -> QuestionnaireResponse {
        self.state = WizardState::NotStarted;
        QuestionnaireResponse::quick(Utc::now())
    }

    /// "Not good": start a fresh traversal at step 0.
    pub fn choose_not_good(&mut self) {
        self.state = WizardState::InProgress {
            step: 0,
            answers: AnswerSet::new(),
        };
    }

    /// Record an answer for a question in the bank.
    pub fn set_answer(&mut self, id: &str, value: AnswerValue) -> Result<(), WizardError> {
        let question = self.question(id)?;
        let value = normalize_answer(question, value)?;
        self.answers_mut()?.insert(id.to_string(), value);
        Ok(())
    }

    /// Add or remove one option of a multi-choice answer.
    pub fn toggle_option(&mut self, id: &str, value: &str) -> Result<(), WizardError> {
        let question = self.question(id)?;
        if !matches!(question.kind, QuestionKind::MultiChoice { .. }) {
            return Err(WizardError::AnswerTypeMismatch {
                id: id.to_string(),
                expected: question.kind.name(),
            });
        }
        if !question.has_option(value) {
            return Err(WizardError::UnknownOption {
                id: id.to_string(),
                value: value.to_string(),
            });
        }

        let answers = self.answers_mut()?;
        let mut selected = match answers.remove(id) {
            Some(AnswerValue::Choices(c)) => c,
            _ => Vec::new(),
        };
        match selected.iter().position(|v| v == value) {
            Some(pos) => {
                selected.remove(pos);
            }
            None => selected.push(value.to_string()),
        }
        answers.insert(id.to_string(), AnswerValue::Choices(selected));
        Ok(())
    }

    /// Step index clamped against the current visible list.
    pub fn effective_step(&self) -> Option<usize> {
        match &self.state {
            WizardState::InProgress { step, answers } => {
                let len = visible_questions(self.bank, answers).len();
                Some((*step).min(len.saturating_sub(1)))
            }
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&'a Question> {
        let answers = self.answers()?;
        let step = self.effective_step()?;
        visible_questions(self.bank, answers).get(step).copied()
    }

    /// Answer shown for the current step. A scale nobody touched reads
    /// as its minimum.
    pub fn current_answer(&self) -> Option<AnswerValue> {
        let question = self.current_question()?;
        let recorded = self.answers()?.get(question.id).cloned();
        match (&question.kind, recorded) {
            (QuestionKind::Scale { min, .. }, None) => Some(AnswerValue::Number(*min as f64)),
            (_, recorded) => recorded,
        }
    }

    /// `(1-based current step, visible total)`.
    pub fn progress(&self) -> Option<(usize, usize)> {
        let answers = self.answers()?;
        let step = self.effective_step()?;
        Some((step + 1, visible_questions(self.bank, answers).len()))
    }

    pub fn can_advance(&self) -> bool {
        match (self.current_question(), self.answers()) {
            (Some(q), Some(answers)) => is_answer_valid(q, answers.get(q.id)),
            _ => false,
        }
    }

    /// Move past the current step, or finalize when it is the last
    /// visible one.
    pub fn advance(&mut self) -> Result<Advance, WizardError> {
        let bank = self.bank;
        let current = self.current_question().ok_or(WizardError::NotInProgress)?;
        let idx = self.effective_step().ok_or(WizardError::NotInProgress)?;
        let answers = self.answers_mut()?;

        if let QuestionKind::Scale { min, .. } = current.kind {
            answers
                .entry(current.id.to_string())
                .or_insert(AnswerValue::Number(min as f64));
        }
        if !is_answer_valid(current, answers.get(current.id)) {
            return Err(WizardError::StepInvalid(current.id.to_string()));
        }

        let len = visible_questions(bank, answers).len();
        if idx + 1 >= len {
            let answers = prune_hidden(bank, std::mem::take(answers));
            let response = QuestionnaireResponse::full(answers, Utc::now());
            self.state = WizardState::NotStarted;
            tracing::debug!(answers = response.answers.len(), "Questionnaire completed");
            return Ok(Advance::Completed(response));
        }

        let step = (idx + 1).min(len - 1);
        if let WizardState::InProgress { step: stored, .. } = &mut self.state {
            *stored = step;
        }
        Ok(Advance::Moved { step })
    }

    /// Step back. Returns the new step, or `None` when the session fell
    /// back to the gate.
    pub fn retreat(&mut self) -> Result<Option<usize>, WizardError> {
        let idx = self.effective_step().ok_or(WizardError::NotInProgress)?;
        if idx == 0 {
            self.state = WizardState::NotStarted;
            return Ok(None);
        }
        if let WizardState::InProgress { step, .. } = &mut self.state {
            *step = idx - 1;
        }
        Ok(Some(idx - 1))
    }

    pub fn reset(&mut self) {
        self.state = WizardState::NotStarted;
    }

    fn question(&self, id: &str) -> Result<&'a Question, WizardError> {
        self.bank
            .iter()
            .find(|q| q.id == id)
            .ok_or_else(|| WizardError::UnknownQuestion(id.to_string()))
    }

    fn answers_mut(&mut self) -> Result<&mut AnswerSet, WizardError> {
        match &mut self.state {
            WizardState::InProgress { answers, .. } => Ok(answers),
            _ => Err(WizardError::NotInProgress),
        }
    }
}

/// Drop answers whose question is no longer visible. Repeats until
/// stable, since a dropped answer can close another gate.
fn prune_hidden(bank: &[Question], mut answers: AnswerSet) -> AnswerSet {
    loop {
        let before = answers.len();
        let snapshot = answers.clone();
        answers.retain(|id, _| {
            bank.iter()
                .find(|q| q.id == id.as_str())
                .is_some_and(|q| is_visible(q, &snapshot))
        });
        if answers.len() == before {
            return answers;
        }
    }
}

/// Check an incoming value against the question's kind and bring it to
/// its stored shape.
fn normalize_answer(question: &Question, value: AnswerValue) -> Result<AnswerValue, WizardError> {
    let mismatch = || WizardError::AnswerTypeMismatch {
        id: question.id.to_string(),
        expected: question.kind.name(),
    };
    let unknown = |v: &str| WizardError::UnknownOption {
        id: question.id.to_string(),
        value: v.to_string(),
    };

    match &question.kind {
        QuestionKind::SingleChoice { .. } => match value {
            AnswerValue::Text(v) if question.has_option(&v) => Ok(AnswerValue::Text(v)),
            AnswerValue::Text(v) => Err(unknown(&v)),
            _ => Err(mismatch()),
        },
        QuestionKind::MultiChoice { .. } => match value {
            AnswerValue::Choices(values) => {
                let mut selected: Vec<String> = Vec::with_capacity(values.len());
                for v in values {
                    if !question.has_option(&v) {
                        return Err(unknown(&v));
                    }
                    if !selected.contains(&v) {
                        selected.push(v);
                    }
                }
                Ok(AnswerValue::Choices(selected))
            }
            _ => Err(mismatch()),
        },
        QuestionKind::Scale { min, max } => {
            let n = value.as_number().ok_or_else(mismatch)?;
            if n.fract() != 0.0 || n < *min as f64 || n > *max as f64 {
                return Err(WizardError::OutOfRange {
                    id: question.id.to_string(),
                    min: *min,
                    max: *max,
                });
            }
            Ok(AnswerValue::Number(n))
        }
        // Raw input is kept as typed; it is parsed when the step is validated.
        QuestionKind::Number { .. } => match value {
            AnswerValue::Text(_) | AnswerValue::Number(_) => Ok(value),
            AnswerValue::Choices(_) => Err(mismatch()),
        },
        QuestionKind::FreeText => match value {
            AnswerValue::Text(_) => Ok(value),
            _ => Err(mismatch()),
        },
    }
}
