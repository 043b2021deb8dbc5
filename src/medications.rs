//! Medication lists and the daily intake schedule.
//!
//! The active and discontinued lists are fixed bilingual tables. The
//! daily schedule is a projection: one `MED_TIME` entry per listed intake
//! time, recomputed on every call and never stored.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::models::{
    ActiveMedication, CalendarEvent, CalendarEventType, Language, LocalizedText,
    MedicationView, StoppedMedication, StoppedMedicationView,
};

const fn text(he: &'static str, en: &'static str) -> LocalizedText {
    LocalizedText::new(he, en)
}

const fn same(value: &'static str) -> LocalizedText {
    LocalizedText::new(value, value)
}

const PILL: LocalizedText = text("כדור", "Pill");
const INJECTION: LocalizedText = text("זריקה", "Injection");
const ONCE_DAILY: LocalizedText = text("1 ביום", "Once daily");
const TWICE_DAILY: LocalizedText = text("2 ביום", "Twice daily");
const NO_DOSE: LocalizedText = same("—");

pub static ACTIVE_MEDICATIONS: [ActiveMedication; 9] = [
    ActiveMedication {
        name: text("נקסיום", "Nexium"),
        dose: text("20 מ״ג", "20mg"),
        time: same("08:00, 18:00"),
        frequency: TWICE_DAILY,
        form: PILL,
    },
    ActiveMedication {
        name: text("טריטייס", "Tritace"),
        dose: text("5 מ״ג", "5mg"),
        time: same("08:00"),
        frequency: ONCE_DAILY,
        form: PILL,
    },
    ActiveMedication {
        name: text("אומניק אוקאס", "Omnic Ocas"),
        dose: text("0.4 מ״ג", "0.4mg"),
        time: same("08:00"),
        frequency: ONCE_DAILY,
        form: PILL,
    },
    ActiveMedication {
        name: text("אנברל", "Enbrel"),
        dose: text("50 מ״ג", "50mg"),
        time: text("יום קבוע", "Fixed day"),
        frequency: text("זריקה פעם בשבוע", "Weekly injection"),
        form: INJECTION,
    },
    ActiveMedication {
        name: text("חומצה פולית", "Folic Acid"),
        dose: NO_DOSE,
        time: same("08:00"),
        frequency: ONCE_DAILY,
        form: text("תוסף", "Supplement"),
    },
    ActiveMedication {
        name: text("פלאביקס", "Plavix"),
        dose: text("75 מ״ג", "75mg"),
        time: same("08:00"),
        frequency: ONCE_DAILY,
        form: PILL,
    },
    ActiveMedication {
        name: text("פנרגן", "Phenergan"),
        dose: NO_DOSE,
        time: same("08:00, 13:00, 18:00"),
        frequency: text("3 ביום", "3 times daily"),
        form: PILL,
    },
    ActiveMedication {
        name: text("קלופיקסול", "Clopixol"),
        dose: text("200 מ״ל", "200ml"),
        time: text("תאריך קבוע", "Scheduled"),
        frequency: text("זריקה פעם בחודש", "Monthly injection"),
        form: INJECTION,
    },
    ActiveMedication {
        name: text("ארטן", "Artane"),
        dose: NO_DOSE,
        time: same("08:00, 13:00"),
        frequency: TWICE_DAILY,
        form: PILL,
    },
];

const WORSENS_MOOD: LocalizedText = text("הופסק • מחמיר מצב רוח", "Stopped • Worsens mood");
const SHORT_EFFECT: LocalizedText = text("הופסק • השפעה קצרה", "Stopped • Short effect");
const EFFECT_ENDED: LocalizedText = text("הופסק • תמה ההשפעה", "Stopped • Effect ended");

pub static STOPPED_MEDICATIONS: [StoppedMedication; 7] = [
    StoppedMedication {
        name: text("ריספרדל", "Risperdal"),
        dose: text("0.25 מ״ג", "0.25mg"),
        stop_date: "—",
        reason: WORSENS_MOOD,
    },
    StoppedMedication {
        name: text("ובן", "Ben"),
        dose: text("10 מ״ג", "10mg"),
        stop_date: "—",
        reason: WORSENS_MOOD,
    },
    StoppedMedication {
        name: text("דונפזיל", "Donepezil"),
        dose: text("5 מ״ג", "5mg"),
        stop_date: "—",
        reason: SHORT_EFFECT,
    },
    StoppedMedication {
        name: text("מירטזפין", "Mirtazapine"),
        dose: text("30 מ״ג", "30mg"),
        stop_date: "—",
        reason: SHORT_EFFECT,
    },
    StoppedMedication {
        name: text("ציפרלקס", "Cipralex"),
        dose: text("10 מ״ג", "10mg"),
        stop_date: "—",
        reason: EFFECT_ENDED,
    },
    StoppedMedication {
        name: text("פוסאבנס", "Fosavance"),
        dose: text("70 מ״ג", "70mg"),
        stop_date: "—",
        reason: EFFECT_ENDED,
    },
    StoppedMedication {
        name: text("יו־לקטין פורטה", "U‑Lactin Forte"),
        dose: NO_DOSE,
        stop_date: "—",
        reason: text("הופסק", "Stopped"),
    },
];

/// Both lists rendered for one language.
#[derive(Debug, Clone, Serialize)]
pub struct MedicationListData {
    pub active: Vec<MedicationView>,
    pub stopped: Vec<StoppedMedicationView>,
}

pub fn medication_lists(lang: Language) -> MedicationListData {
    MedicationListData {
        active: ACTIVE_MEDICATIONS.iter().map(|m| m.localized(lang)).collect(),
        stopped: STOPPED_MEDICATIONS.iter().map(|m| m.localized(lang)).collect(),
    }
}

/// `"08:00, 18:00"` → `["08:00", "18:00"]`. Tokens that are not exactly
/// `HH:MM` (two digits, colon, two digits) are dropped.
pub fn parse_times(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|t| is_hhmm(t))
        .map(String::from)
        .collect()
}

/// Shape check only: two digits, a colon, two digits.
pub(crate) fn is_hhmm(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit())
}

/// Intake entries for `date`, ordered by time.
pub fn daily_schedule(date: NaiveDate, lang: Language) -> Vec<CalendarEvent> {
    let day = date.format("%Y-%m-%d").to_string();
    let mut schedule: Vec<CalendarEvent> = ACTIVE_MEDICATIONS
        .iter()
        .flat_map(|m| {
            let name = m.name.get(lang);
            let title = format!("{} {}", name, m.dose.get(lang));
            let notes = m.frequency.get(lang);
            let day = day.clone();
            parse_times(m.time.get(lang))
                .into_iter()
                .map(move |time| CalendarEvent {
                    id: format!("{name}-{day}-{time}"),
                    event_type: CalendarEventType::MedTime,
                    title: title.clone(),
                    date: day.clone(),
                    time: Some(time),
                    notes: Some(notes.to_string()),
                })
        })
        .collect();
    schedule.sort_by(|a, b| a.time.cmp(&b.time));
    schedule
}

/// First entry at or after `now`; past the last dose, the first of the day.
pub fn next_dose(schedule: &[CalendarEvent], now: NaiveTime) -> Option<&CalendarEvent> {
    let now = now.format("%H:%M").to_string();
    schedule
        .iter()
        .find(|e| e.time.as_deref().is_some_and(|t| t >= now.as_str()))
        .or_else(|| schedule.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 24).unwrap()
    }

    #[test]
    fn parse_times_keeps_only_hhmm() {
        assert_eq!(parse_times("08:00, 18:00"), vec!["08:00", "18:00"]);
        assert_eq!(parse_times("08:00,13:00 , 18:00"), vec!["08:00", "13:00", "18:00"]);
        assert!(parse_times("Fixed day").is_empty());
        assert!(parse_times("").is_empty());
        assert!(parse_times("8:00, 08:0, 0800, ab:cd").is_empty());
    }

    #[test]
    fn lists_have_expected_sizes() {
        let lists = medication_lists(Language::En);
        assert_eq!(lists.active.len(), 9);
        assert_eq!(lists.stopped.len(), 7);
        assert_eq!(lists.active[0].name, "Nexium");
        assert_eq!(medication_lists(Language::He).stopped[0].name, "ריספרדל");
    }

    #[test]
    fn schedule_projects_one_entry_per_time() {
        let schedule = daily_schedule(date(), Language::En);
        // Nexium 2, Tritace 1, Omnic 1, Folic 1, Plavix 1, Phenergan 3, Artane 2.
        assert_eq!(schedule.len(), 11);
        assert!(schedule.iter().all(|e| e.event_type == CalendarEventType::MedTime));
        assert!(schedule.iter().all(|e| e.date == "2025-07-24"));
        assert!(schedule.iter().any(|e| e.id == "Nexium-2025-07-24-18:00"));
        assert!(!schedule.iter().any(|e| e.title.starts_with("Enbrel")));
    }

    #[test]
    fn schedule_is_sorted_by_time() {
        let schedule = daily_schedule(date(), Language::He);
        let times: Vec<_> = schedule.iter().map(|e| e.time.clone().unwrap()).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
        assert_eq!(schedule[0].time.as_deref(), Some("08:00"));
    }

    #[test]
    fn schedule_entry_fields() {
        let schedule = daily_schedule(date(), Language::En);
        let nexium = schedule.iter().find(|e| e.id == "Nexium-2025-07-24-08:00").unwrap();
        assert_eq!(nexium.title, "Nexium 20mg");
        assert_eq!(nexium.notes.as_deref(), Some("Twice daily"));
    }

    #[test]
    fn next_dose_picks_upcoming_or_wraps() {
        let schedule = daily_schedule(date(), Language::En);
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(next_dose(&schedule, at(12, 0)).unwrap().time.as_deref(), Some("13:00"));
        assert_eq!(next_dose(&schedule, at(13, 0)).unwrap().time.as_deref(), Some("13:00"));
        assert_eq!(next_dose(&schedule, at(22, 0)).unwrap().time.as_deref(), Some("08:00"));
        assert!(next_dose(&[], at(8, 0)).is_none());
    }
}
