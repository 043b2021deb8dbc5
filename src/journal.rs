//! Journal, calendar events the caregiver records, plus the medication
//! schedule projected onto each day.
//!
//! Stored events live in one document, newest first. Projected
//! medication entries are merged in when a day is viewed or exported
//! and can never be removed.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{load_collection, load_collection_or_empty, save_collection, DatabaseError, DocumentStore, CALENDAR_KEY};
use crate::medications::{daily_schedule, is_hhmm};
use crate::models::{CalendarEvent, CalendarEventType, Language, NewCalendarEvent};

/// Time used in the export for events recorded without one.
const DEFAULT_EXPORT_TIME: &str = "T090000";
/// Maximum content line length in octets before folding.
const ICS_LINE_LIMIT: usize = 75;

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("Event title is required")]
    EmptyTitle,

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Invalid time (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// Strict `YYYY-MM-DD`.
pub fn parse_ymd(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Strict `HH:MM` on a 24-hour clock.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    if !is_hhmm(value) {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// One line of a day view.
#[derive(Debug, Clone, Serialize)]
pub struct AgendaEntry {
    #[serde(flatten)]
    pub event: CalendarEvent,
    /// Stored events can be deleted; projected medication times cannot.
    pub removable: bool,
}

#[derive(Clone)]
pub struct JournalStore {
    store: Arc<dyn DocumentStore>,
}

impl JournalStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Stored events, newest first. Unreadable data reads as empty.
    pub fn list(&self) -> Vec<CalendarEvent> {
        load_collection_or_empty(self.store.as_ref(), CALENDAR_KEY)
    }

    /// Validate and store a manually created event.
    pub fn add(&self, draft: NewCalendarEvent) -> Result<CalendarEvent, JournalError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(JournalError::EmptyTitle);
        }
        if parse_ymd(&draft.date).is_none() {
            return Err(JournalError::InvalidDate(draft.date));
        }
        // Only intake entries carry a time; other kinds are all-day.
        let time = match draft
            .time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && draft.event_type == CalendarEventType::MedTime)
        {
            Some(t) if parse_hhmm(t).is_some() => Some(t.to_string()),
            Some(t) => return Err(JournalError::InvalidTime(t.to_string())),
            None => None,
        };
        let notes = draft
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);

        let event = CalendarEvent {
            id: format!("evt-{}", Uuid::new_v4()),
            event_type: draft.event_type,
            title: title.to_string(),
            date: draft.date,
            time,
            notes,
        };
        self.insert(event.clone())?;
        tracing::info!(id = %event.id, kind = %event.event_type, "Journal event added");
        Ok(event)
    }

    /// Prepend an already-built event (appointment bookings).
    pub fn insert(&self, event: CalendarEvent) -> Result<(), JournalError> {
        let mut events = self.load()?;
        events.insert(0, event);
        save_collection(self.store.as_ref(), CALENDAR_KEY, &events)?;
        Ok(())
    }

    /// Delete a stored event. Projected entries are never stored, so
    /// their ids are reported as not found.
    pub fn remove(&self, id: &str) -> Result<(), JournalError> {
        let mut events = self.load()?;
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(JournalError::NotFound(id.to_string()));
        }
        save_collection(self.store.as_ref(), CALENDAR_KEY, &events)?;
        tracing::info!(id, "Journal event removed");
        Ok(())
    }

    /// Projected medication times and stored events for `date`, by time.
    /// Entries without a time sort first.
    pub fn day_agenda(&self, date: NaiveDate, lang: Language) -> Vec<AgendaEntry> {
        let day = date.format("%Y-%m-%d").to_string();
        let mut entries: Vec<AgendaEntry> = daily_schedule(date, lang)
            .into_iter()
            .map(|event| AgendaEntry {
                event,
                removable: false,
            })
            .chain(
                self.list()
                    .into_iter()
                    .filter(|e| e.date == day)
                    .map(|event| AgendaEntry {
                        event,
                        removable: true,
                    }),
            )
            .collect();
        entries.sort_by(|a, b| a.event.time.cmp(&b.event.time));
        entries
    }

    /// Everything the calendar export covers: stored events plus the
    /// medication times of `today`.
    pub fn export_events(&self, today: NaiveDate, lang: Language) -> Vec<CalendarEvent> {
        let mut events = self.list();
        events.extend(daily_schedule(today, lang));
        events
    }

    /// Read for mutation. A corrupt document is replaced.
    fn load(&self) -> Result<Vec<CalendarEvent>, DatabaseError> {
        match load_collection(self.store.as_ref(), CALENDAR_KEY) {
            Ok(events) => Ok(events),
            Err(DatabaseError::Serialization(e)) => {
                tracing::warn!(error = %e, "Unreadable journal, starting over");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

// ═══════════════════════════════════════════
// iCalendar export
// ═══════════════════════════════════════════

pub fn export_file_name(lang: Language) -> &'static str {
    match lang {
        Language::He => "awarecare_יומן.ics",
        Language::En => "awarecare_journal.ics",
    }
}

/// Render events as an iCalendar document with CRLF line endings.
pub fn export_ics(events: &[CalendarEvent]) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        "PRODID:-//AwareCare//Journal//EN".into(),
        "CALSCALE:GREGORIAN".into(),
    ];

    for event in events {
        let uid = dash_whitespace(&event.id);
        let date = event.date.replace('-', "");
        let start = match &event.time {
            Some(time) => format!("{date}T{}00", time.replace(':', "")),
            None => format!("{date}{DEFAULT_EXPORT_TIME}"),
        };

        lines.push("BEGIN:VEVENT".into());
        lines.push(format!("UID:{uid}@awarecare"));
        lines.push(format!("DTSTART:{start}"));
        lines.push(format!("SUMMARY:{}", escape_text(&event.title)));
        if let Some(notes) = &event.notes {
            lines.push(format!("DESCRIPTION:{}", escape_text(notes)));
        }
        lines.push("END:VEVENT".into());
    }
    lines.push("END:VCALENDAR".into());

    let mut out = String::new();
    for line in &lines {
        out.push_str(&fold_line(line));
        out.push_str("\r\n");
    }
    out
}

/// TEXT value escaping: backslash, semicolon, comma and newlines.
/// Replace every run of whitespace with a single `-`.
fn dash_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_run = false;
    for c in value.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push('-');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Split a content line into 75-octet chunks, continuation lines
/// starting with a space. Never splits inside a UTF-8 sequence.
fn fold_line(line: &str) -> String {
    if line.len() <= ICS_LINE_LIMIT {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + line.len() / ICS_LINE_LIMIT * 3);
    let mut width = 0;
    for c in line.chars() {
        if width + c.len_utf8() > ICS_LINE_LIMIT {
            out.push_str("\r\n ");
            // The leading space counts toward the limit.
            width = 1;
        }
        out.push(c);
        width += c.len_utf8();
    }
    out
}
