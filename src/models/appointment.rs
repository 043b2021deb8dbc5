use serde::{Deserialize, Serialize};

use super::enums::Language;
use super::question::LocalizedText;

/// Directory entry for a bookable doctor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: &'static str,
    pub name: LocalizedText,
    pub specialty: LocalizedText,
    pub clinic: LocalizedText,
    pub address: LocalizedText,
    pub phone: &'static str,
}

impl Doctor {
    pub fn localized(&self, lang: Language) -> DoctorView {
        DoctorView {
            id: self.id.to_string(),
            name: self.name.get(lang).to_string(),
            specialty: self.specialty.get(lang).to_string(),
            clinic: self.clinic.get(lang).to_string(),
            address: self.address.get(lang).to_string(),
            phone: self.phone.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorView {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub clinic: String,
    pub address: String,
    pub phone: String,
}

/// A booked appointment. `date` is `YYYY-MM-DD`, `time` is `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub reason: String,
}

/// Booking input from the appointment sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub reason: Option<String>,
}
