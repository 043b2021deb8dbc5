//! Appointment booking against a small doctor directory.
//!
//! Availability is synthetic: each doctor has a fixed slot template, and
//! one slot per date is removed by a checksum of the date string. Slots
//! already booked for the same doctor and date are filtered out. Booking
//! also drops an `APPOINTMENT` entry into the journal.

use std::sync::{Arc, Mutex};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{load_collection, load_collection_or_empty, save_collection, DatabaseError, DocumentStore, APPOINTMENTS_KEY};
use crate::journal::{parse_ymd, JournalStore};
use crate::models::{
    Appointment, AppointmentRequest, CalendarEvent, CalendarEventType, Doctor, Language,
    LocalizedText,
};

const fn text(he: &'static str, en: &'static str) -> LocalizedText {
    LocalizedText::new(he, en)
}

pub static DOCTORS: [Doctor; 4] = [
    Doctor {
        id: "d1",
        name: text("ד\"ר מרים לוי", "Dr. Miriam Levi"),
        specialty: text("רפואת משפחה", "Family Medicine"),
        clinic: text("מרפאת העיר", "City Clinic"),
        address: text("רח׳ הרקפת 12, מרכז העיר", "12 HaRakefet St., City Center"),
        phone: "03-555-0192",
    },
    Doctor {
        id: "d2",
        name: text("ד\"ר יונתן כהן", "Dr. Yonatan Cohen"),
        specialty: text("נוירולוגיה", "Neurology"),
        clinic: text("מרפאת מומחים – קומה 3", "Specialists Clinic – Floor 3"),
        address: text("שד׳ הים 48, בניין B", "48 HaYam Blvd., Building B"),
        phone: "03-555-0137",
    },
    Doctor {
        id: "d3",
        name: text("ד\"ר נועה בן־דוד", "Dr. Noa Ben‑David"),
        specialty: text("פסיכיאטריה", "Psychiatry"),
        clinic: text("מרכז בריאות הנפש", "Mental Health Center"),
        address: text("רח׳ הדקל 7, קומה 2", "7 HaDekel St., Floor 2"),
        phone: "03-555-0110",
    },
    Doctor {
        id: "d4",
        name: text("ד\"ר דניאל רוזן", "Dr. Daniel Rosen"),
        specialty: text("ראומטולוגיה", "Rheumatology"),
        clinic: text("מרפאת מפרקים", "Joint & Rheum Clinic"),
        address: text("רח׳ הנגב 22, אגף מערבי", "22 HaNegev St., West Wing"),
        phone: "03-555-0178",
    },
];

const DEFAULT_REASON: LocalizedText = text("ביקורת כללית", "General checkup");

pub fn find_doctor(id: &str) -> Option<&'static Doctor> {
    DOCTORS.iter().find(|d| d.id == id)
}

/// Base slot list for a doctor. Unknown ids share one fallback template.
pub fn slot_template(doctor_id: &str) -> &'static [&'static str] {
    match doctor_id {
        "d1" => &["09:00", "09:30", "10:30", "11:00", "16:00", "16:30"],
        "d2" => &["08:30", "09:30", "10:00", "12:00", "15:00"],
        "d3" => &["10:00", "11:00", "13:00", "14:00", "18:00"],
        _ => &["09:00", "10:00", "11:30", "12:30", "17:00"],
    }
}

/// Sum of the UTF-16 code units of `date`.
pub fn date_checksum(date: &str) -> u32 {
    date.encode_utf16().map(u32::from).sum()
}

/// Template minus the one slot picked by the date checksum.
pub fn generate_slots(doctor_id: &str, date: &str) -> Vec<&'static str> {
    let template = slot_template(doctor_id);
    let removed = date_checksum(date) as usize % template.len();
    template
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != removed)
        .map(|(_, slot)| *slot)
        .collect()
}

/// Generated slots not yet booked for this doctor and date.
pub fn available_slots(doctor_id: &str, date: &str, booked: &[Appointment]) -> Vec<&'static str> {
    generate_slots(doctor_id, date)
        .into_iter()
        .filter(|slot| {
            !booked
                .iter()
                .any(|a| a.doctor_id == doctor_id && a.date == date && a.time == *slot)
        })
        .collect()
}

/// One selectable day in the booking sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    pub date: String,
    pub label: String,
}

/// `today` and the six days after it, labelled like "Thu 24" / "ה׳ 24".
pub fn week_days(today: NaiveDate, lang: Language) -> Vec<WeekDay> {
    (0..7)
        .map(|offset| {
            let day = today + Duration::days(offset);
            WeekDay {
                date: day.format("%Y-%m-%d").to_string(),
                label: format!("{} {}", weekday_label(day.weekday(), lang), day.day()),
            }
        })
        .collect()
}

fn weekday_label(weekday: Weekday, lang: Language) -> &'static str {
    let labels: [LocalizedText; 7] = [
        text("א׳", "Sun"),
        text("ב׳", "Mon"),
        text("ג׳", "Tue"),
        text("ד׳", "Wed"),
        text("ה׳", "Thu"),
        text("ו׳", "Fri"),
        text("ש׳", "Sat"),
    ];
    labels[weekday.num_days_from_sunday() as usize].get(lang)
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Unknown doctor: {0}")]
    UnknownDoctor(String),

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Slot {time} on {date} is not available")]
    SlotUnavailable { date: String, time: String },

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// Booked appointments, newest first.
#[derive(Clone)]
pub struct AppointmentStore {
    store: Arc<dyn DocumentStore>,
    journal: JournalStore,
    /// Held across the availability check and the write, shared by clones.
    booking: Arc<Mutex<()>>,
}

impl AppointmentStore {
    pub fn new(store: Arc<dyn DocumentStore>, journal: JournalStore) -> Self {
        Self {
            store,
            journal,
            booking: Arc::new(Mutex::new(())),
        }
    }

    pub fn list(&self) -> Vec<Appointment> {
        load_collection_or_empty(self.store.as_ref(), APPOINTMENTS_KEY)
    }

    pub fn available_slots(&self, doctor_id: &str, date: &str) -> Vec<&'static str> {
        available_slots(doctor_id, date, &self.list())
    }

    /// Book a free slot and mirror it into the journal. A failed journal
    /// write does not undo the booking.
    pub fn book(&self, request: AppointmentRequest, lang: Language) -> Result<Appointment, BookingError> {
        let doctor = find_doctor(&request.doctor_id)
            .ok_or_else(|| BookingError::UnknownDoctor(request.doctor_id.clone()))?;
        if parse_ymd(&request.date).is_none() {
            return Err(BookingError::InvalidDate(request.date));
        }

        let _guard = self.booking.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        let mut booked: Vec<Appointment> = match load_collection(self.store.as_ref(), APPOINTMENTS_KEY) {
            Ok(booked) => booked,
            Err(DatabaseError::Serialization(e)) => {
                tracing::warn!(error = %e, "Unreadable appointments, starting over");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        let free = available_slots(doctor.id, &request.date, &booked);
        if !free.iter().any(|slot| *slot == request.time) {
            return Err(BookingError::SlotUnavailable {
                date: request.date,
                time: request.time,
            });
        }

        let reason = request
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REASON.get(lang))
            .to_string();
        let appointment = Appointment {
            id: format!("appt_{}", Uuid::new_v4().simple()),
            doctor_id: doctor.id.to_string(),
            date: request.date,
            time: request.time,
            reason,
        };
        booked.insert(0, appointment.clone());
        save_collection(self.store.as_ref(), APPOINTMENTS_KEY, &booked)?;
        tracing::info!(id = %appointment.id, doctor = doctor.id, date = %appointment.date, "Appointment booked");

        if let Err(e) = self.journal.insert(journal_entry(&appointment, doctor, lang)) {
            tracing::warn!(error = %e, id = %appointment.id, "Could not add appointment to journal");
        }
        Ok(appointment)
    }
}

fn journal_entry(appointment: &Appointment, doctor: &Doctor, lang: Language) -> CalendarEvent {
    let name = doctor.name.get(lang);
    let specialty = doctor.specialty.get(lang);
    let title = match lang {
        Language::He => format!("תור אצל {name} ({specialty})"),
        Language::En => format!("Appointment with {name} ({specialty})"),
    };
    CalendarEvent {
        id: format!("cal_{}", appointment.id),
        event_type: CalendarEventType::Appointment,
        title,
        date: appointment.date.clone(),
        time: Some(appointment.time.clone()),
        notes: Some(format!(
            "{} • {} • {}",
            doctor.clinic.get(lang),
            doctor.address.get(lang),
            doctor.phone
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryDocumentStore, CALENDAR_KEY};

    fn stores() -> (Arc<MemoryDocumentStore>, AppointmentStore, JournalStore) {
        let docs = Arc::new(MemoryDocumentStore::new());
        let journal = JournalStore::new(docs.clone());
        (docs.clone(), AppointmentStore::new(docs, journal.clone()), journal)
    }

    fn request(time: &str, reason: Option<&str>) -> AppointmentRequest {
        AppointmentRequest {
            doctor_id: "d1".into(),
            date: "2025-07-24".into(),
            time: time.into(),
            reason: reason.map(String::from),
        }
    }

    #[test]
    fn checksum_is_utf16_sum() {
        // '2'=50 '0'=48 '5'=53 '-'=45 '7'=55 '4'=52
        assert_eq!(date_checksum("2025-07-24"), 50 + 48 + 50 + 53 + 45 + 48 + 55 + 45 + 50 + 52);
        assert_eq!(date_checksum(""), 0);
    }

    #[test]
    fn slots_drop_exactly_one_template_entry() {
        let slots = generate_slots("d1", "2025-07-24");
        // checksum 496 % 6 == 4 → "16:00" removed
        assert_eq!(slots, vec!["09:00", "09:30", "10:30", "11:00", "16:30"]);
        assert_eq!(slots, generate_slots("d1", "2025-07-24"));
    }

    #[test]
    fn unknown_doctor_uses_fallback_template() {
        assert_eq!(slot_template("zz"), slot_template("d4"));
        assert_eq!(generate_slots("zz", "2025-07-24").len(), 4);
    }

    #[test]
    fn booked_slots_are_excluded() {
        let booked = vec![Appointment {
            id: "a".into(),
            doctor_id: "d1".into(),
            date: "2025-07-24".into(),
            time: "09:30".into(),
            reason: "x".into(),
        }];
        let slots = available_slots("d1", "2025-07-24", &booked);
        assert!(!slots.contains(&"09:30"));
        assert_eq!(slots.len(), 4);
        // Other dates and doctors are unaffected.
        assert!(available_slots("d2", "2025-07-24", &booked).contains(&"09:30"));
    }

    #[test]
    fn concurrent_bookings_of_one_slot_admit_one() {
        let (_, appointments, journal) = stores();
        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let store = appointments.clone();
                    s.spawn(move || store.book(request("09:00", None), Language::En))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, BookingError::SlotUnavailable { .. })));
        assert_eq!(appointments.list().len(), 1);
        assert_eq!(journal.list().len(), 1);
    }

    #[test]
    fn book_prepends_and_injects_journal_event() {
        let (_, appointments, journal) = stores();
        appointments.book(request("09:00", None), Language::En).unwrap();
        let appt = appointments.book(request("10:30", Some("  Memory review ")), Language::En).unwrap();

        assert!(appt.id.starts_with("appt_"));
        assert_eq!(appt.reason, "Memory review");
        assert_eq!(appointments.list()[0].id, appt.id);

        let events = journal.list();
        assert_eq!(events.len(), 2);
        let event = &events[0];
        assert_eq!(event.id, format!("cal_{}", appt.id));
        assert_eq!(event.event_type, CalendarEventType::Appointment);
        assert_eq!(event.title, "Appointment with Dr. Miriam Levi (Family Medicine)");
        assert_eq!(
            event.notes.as_deref(),
            Some("City Clinic • 12 HaRakefet St., City Center • 03-555-0192")
        );
        assert_eq!(event.time.as_deref(), Some("10:30"));
    }

    #[test]
    fn default_reason_is_localized() {
        let (_, appointments, journal) = stores();
        let appt = appointments.book(request("09:00", Some("   ")), Language::He).unwrap();
        assert_eq!(appt.reason, "ביקורת כללית");
        assert!(journal.list()[0].title.starts_with("תור אצל"));
    }

    #[test]
    fn double_booking_is_rejected() {
        let (_, appointments, _) = stores();
        appointments.book(request("09:00", None), Language::En).unwrap();
        assert!(matches!(
            appointments.book(request("09:00", None), Language::En),
            Err(BookingError::SlotUnavailable { .. })
        ));
        assert!(!appointments.available_slots("d1", "2025-07-24").contains(&"09:00"));
    }

    #[test]
    fn removed_and_unknown_slots_are_rejected() {
        let (_, appointments, _) = stores();
        assert!(matches!(
            appointments.book(request("16:00", None), Language::En),
            Err(BookingError::SlotUnavailable { .. })
        ));
        assert!(matches!(
            appointments.book(request("03:00", None), Language::En),
            Err(BookingError::SlotUnavailable { .. })
        ));
    }

    #[test]
    fn invalid_doctor_or_date_is_rejected() {
        let (_, appointments, _) = stores();
        let mut bad = request("09:00", None);
        bad.doctor_id = "d9".into();
        assert!(matches!(appointments.book(bad, Language::En), Err(BookingError::UnknownDoctor(_))));
        let mut bad = request("09:00", None);
        bad.date = "tomorrow".into();
        assert!(matches!(appointments.book(bad, Language::En), Err(BookingError::InvalidDate(_))));
    }

    #[test]
    fn corrupt_journal_does_not_block_booking() {
        let (docs, appointments, _) = stores();
        docs.write(CALENDAR_KEY, "garbage").unwrap();
        assert!(appointments.book(request("09:00", None), Language::En).is_ok());
        assert_eq!(appointments.list().len(), 1);
    }

    #[test]
    fn week_has_seven_labelled_days() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 24).unwrap(); // Thursday
        let days = week_days(today, Language::En);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], WeekDay { date: "2025-07-24".into(), label: "Thu 24".into() });
        assert_eq!(days[3].label, "Sun 27");
        assert_eq!(days[6].date, "2025-07-30");
        assert_eq!(week_days(today, Language::He)[0].label, "ה׳ 24");
    }
}
