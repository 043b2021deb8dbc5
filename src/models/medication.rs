use serde::Serialize;

use super::enums::Language;
use super::question::LocalizedText;

/// A medication currently taken. `time` holds comma-separated `HH:MM`
/// intake times, or a free description for injections on a fixed day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMedication {
    pub name: LocalizedText,
    pub dose: LocalizedText,
    pub time: LocalizedText,
    pub frequency: LocalizedText,
    pub form: LocalizedText,
}

impl ActiveMedication {
    pub fn localized(&self, lang: Language) -> MedicationView {
        MedicationView {
            name: self.name.get(lang).to_string(),
            dose: self.dose.get(lang).to_string(),
            time: self.time.get(lang).to_string(),
            frequency: self.frequency.get(lang).to_string(),
            form: self.form.get(lang).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicationView {
    pub name: String,
    pub dose: String,
    pub time: String,
    pub frequency: String,
    pub form: String,
}

/// A discontinued medication with the reason it was stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoppedMedication {
    pub name: LocalizedText,
    pub dose: LocalizedText,
    pub stop_date: &'static str,
    pub reason: LocalizedText,
}

impl StoppedMedication {
    pub fn localized(&self, lang: Language) -> StoppedMedicationView {
        StoppedMedicationView {
            name: self.name.get(lang).to_string(),
            dose: self.dose.get(lang).to_string(),
            stop_date: self.stop_date.to_string(),
            reason: self.reason.get(lang).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StoppedMedicationView {
    pub name: String,
    pub dose: String,
    pub stop_date: String,
    pub reason: String,
}
