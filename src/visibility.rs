//! Dependency gating for the questionnaire.

use crate::models::{AnswerSet, AnswerValue, Question};

/// Whether a single question is shown for the given answers.
///
/// Gates compare strictly: only a text answer equal to the required
/// value opens a gate. Each question is evaluated on its own, without
/// following chains of dependencies.
pub fn is_visible(question: &Question, answers: &AnswerSet) -> bool {
    match &question.depends_on {
        None => true,
        Some(dep) => matches!(
            answers.get(dep.question_id),
            Some(AnswerValue::Text(v)) if v == dep.required_value
        ),
    }
}

/// Ordered sub-sequence of `bank` that should currently be presented.
pub fn visible_questions<'a>(bank: &'a [Question], answers: &AnswerSet) -> Vec<&'a Question> {
    bank.iter().filter(|q| is_visible(q, answers)).collect()
}
