//! Named views of the app and the side menu.

use serde::Serialize;

use crate::i18n::translate;
use crate::models::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    Wizard,
    QuickView,
    Doctor,
    MedicalFile,
    Meds,
    MedHistory,
    Summaries,
    Sensitivities,
    Upload,
    QuestionnaireHistory,
    Journal,
    Info,
    Tutorial,
    Contact,
    Personal,
}

impl View {
    pub const ALL: [View; 16] = [
        View::Home,
        View::Wizard,
        View::QuickView,
        View::Doctor,
        View::MedicalFile,
        View::Meds,
        View::MedHistory,
        View::Summaries,
        View::Sensitivities,
        View::Upload,
        View::QuestionnaireHistory,
        View::Journal,
        View::Info,
        View::Tutorial,
        View::Contact,
        View::Personal,
    ];

    pub fn path(self) -> &'static str {
        match self {
            View::Home => "/",
            View::Wizard => "/wizard",
            View::QuickView => "/quick-view",
            View::Doctor => "/doctor",
            View::MedicalFile => "/medical-file",
            View::Meds => "/medical-file/meds",
            View::MedHistory => "/medical-file/history",
            View::Summaries => "/medical-file/summaries",
            View::Sensitivities => "/medical-file/sensitivities",
            View::Upload => "/medical-file/upload",
            View::QuestionnaireHistory => "/history",
            View::Journal => "/journal",
            View::Info => "/info",
            View::Tutorial => "/tutorial",
            View::Contact => "/contact",
            View::Personal => "/personal",
        }
    }

    /// Resolve a path. A trailing slash is ignored and `/record` is an
    /// alias of the medical file.
    pub fn from_path(path: &str) -> Option<View> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        if normalized == "/record" {
            return Some(View::MedicalFile);
        }
        View::ALL.into_iter().find(|v| v.path() == normalized)
    }

    fn label_key(self) -> &'static str {
        match self {
            View::Home => "home",
            View::Wizard => "statusAssessment",
            View::QuickView => "quickView",
            View::Doctor => "myDoctor",
            View::MedicalFile => "liveMedicalFile",
            View::Meds => "medications",
            View::MedHistory => "medHistory",
            View::Summaries => "visitSummaries",
            View::Sensitivities => "sensitivities",
            View::Upload => "uploadDocs",
            View::QuestionnaireHistory => "questHistory",
            View::Journal => "journal",
            View::Info => "infoAndGuidance",
            View::Tutorial => "tutorial",
            View::Contact => "contactUs",
            View::Personal => "personalArea",
        }
    }

    pub fn label(self, lang: Language) -> &'static str {
        translate(self.label_key(), lang)
    }

    /// Where "back" leads. Medical-file sections return to the file,
    /// everything else to home.
    pub fn parent(self) -> Option<View> {
        match self {
            View::Home => None,
            View::Meds
            | View::MedHistory
            | View::Summaries
            | View::Sensitivities
            | View::Upload
            | View::QuestionnaireHistory => Some(View::MedicalFile),
            _ => Some(View::Home),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItem {
    pub view: View,
    pub label: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
}

fn item(view: View, icon: &'static str, lang: Language) -> MenuItem {
    MenuItem {
        view,
        label: view.label(lang),
        path: view.path(),
        icon,
    }
}

/// Side-menu entries in display order.
pub fn menu(lang: Language) -> Vec<MenuItem> {
    [
        (View::QuickView, "👁️"),
        (View::Doctor, "👨‍⚕️"),
        (View::MedicalFile, "📁"),
        (View::Journal, "📅"),
        (View::Wizard, "📝"),
        (View::Tutorial, "🎓"),
        (View::Contact, "📞"),
        (View::Info, "💡"),
    ]
    .into_iter()
    .map(|(view, icon)| item(view, icon, lang))
    .collect()
}

/// The six sections of the medical file.
pub fn medical_file_sections(lang: Language) -> Vec<MenuItem> {
    [
        (View::Upload, "📤"),
        (View::Meds, "💊"),
        (View::Summaries, "📋"),
        (View::MedHistory, "🕘"),
        (View::QuestionnaireHistory, "📊"),
        (View::Sensitivities, "⚠️"),
    ]
    .into_iter()
    .map(|(view, icon)| item(view, icon, lang))
    .collect()
}
