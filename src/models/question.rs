use serde::Serialize;

use super::enums::Language;

/// A bilingual string from the static tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub he: &'static str,
    pub en: &'static str,
}

impl LocalizedText {
    pub const fn new(he: &'static str, en: &'static str) -> Self {
        Self { he, en }
    }

    pub fn get(&self, lang: Language) -> &'static str {
        match lang {
            Language::He => self.he,
            Language::En => self.en,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOption {
    pub value: &'static str,
    pub label: LocalizedText,
}

/// Closed set of question types. Choice kinds carry their options,
/// numeric kinds their inclusive bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    SingleChoice {
        options: Vec<QuestionOption>,
    },
    MultiChoice {
        options: Vec<QuestionOption>,
    },
    Scale {
        min: i64,
        max: i64,
    },
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    FreeText,
}

impl QuestionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SingleChoice { .. } => "single-choice",
            Self::MultiChoice { .. } => "multi-choice",
            Self::Scale { .. } => "scale",
            Self::Number { .. } => "number",
            Self::FreeText => "free-text",
        }
    }
}

/// Visibility gate: the question is shown only while the answer recorded
/// for `question_id` is exactly `required_value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub question_id: &'static str,
    pub required_value: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub section: LocalizedText,
    pub title: LocalizedText,
    pub help: Option<LocalizedText>,
    pub kind: QuestionKind,
    pub depends_on: Option<Dependency>,
}

impl Question {
    /// Options for choice kinds, empty otherwise.
    pub fn options(&self) -> &[QuestionOption] {
        match &self.kind {
            QuestionKind::SingleChoice { options } | QuestionKind::MultiChoice { options } => {
                options
            }
            _ => &[],
        }
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options().iter().any(|o| o.value == value)
    }

    /// Resolve every bilingual field for one language.
    pub fn localized(&self, lang: Language) -> QuestionView {
        let (min, max) = match &self.kind {
            QuestionKind::Scale { min, max } => (Some(*min as f64), Some(*max as f64)),
            QuestionKind::Number { min, max } => (*min, *max),
            _ => (None, None),
        };
        QuestionView {
            id: self.id.to_string(),
            section: self.section.get(lang).to_string(),
            question_type: self.kind.name(),
            title: self.title.get(lang).to_string(),
            help: self.help.map(|h| h.get(lang).to_string()),
            options: self
                .options()
                .iter()
                .map(|o| OptionView {
                    value: o.value.to_string(),
                    label: o.label.get(lang).to_string(),
                })
                .collect(),
            min,
            max,
            depends_on: self.depends_on.clone(),
        }
    }
}

/// Question rendered for one language, serialised to the client.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub section: String,
    #[serde(rename = "type")]
    pub question_type: &'static str,
    pub title: String,
    pub help: Option<String>,
    pub options: Vec<OptionView>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub depends_on: Option<Dependency>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionView {
    pub value: String,
    pub label: String,
}
