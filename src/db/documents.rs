//! Whole-document persistence.
//!
//! Each logical collection is one JSON array stored under a string key.
//! Every mutation reads the full collection, changes it in memory and
//! writes it back; there are no partial updates and no transactions
//! across keys. Last writer wins.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::sqlite::{open_database, open_memory_database};
use super::DatabaseError;

/// Questionnaire responses, newest first.
pub const HISTORY_KEY: &str = "awareCareHistory";
/// Manually created and appointment-derived journal events.
pub const CALENDAR_KEY: &str = "awarecare_calendar_events_v1";
/// Booked appointments.
pub const APPOINTMENTS_KEY: &str = "awarecare_appointments_v1";

/// String-keyed store of whole documents.
pub trait DocumentStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn write(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
}

// ═══════════════════════════════════════════
// SQLite-backed store
// ═══════════════════════════════════════════

pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: Mutex::new(open_database(path)?),
        })
    }

    pub fn in_memory() -> Result<Self, DatabaseError> {
        Ok(Self {
            conn: Mutex::new(open_memory_database()?),
        })
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn read(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}

// ═══════════════════════════════════════════
// In-memory store
// ═══════════════════════════════════════════

#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: Mutex<HashMap<String, String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn read(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let docs = self.docs.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        Ok(docs.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        let mut docs = self.docs.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        docs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ═══════════════════════════════════════════
// JSON collection helpers
// ═══════════════════════════════════════════

/// Load a collection. A missing document is an empty collection;
/// unreadable or unparsable documents are errors.
pub fn load_collection<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: &str,
) -> Result<Vec<T>, DatabaseError> {
    match store.read(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Load a collection, treating any failure as an empty collection.
pub fn load_collection_or_empty<T: DeserializeOwned>(store: &dyn DocumentStore, key: &str) -> Vec<T> {
    load_collection(store, key).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "Unreadable document, treating as empty");
        Vec::new()
    })
}

/// Rewrite a whole collection.
pub fn save_collection<T: Serialize>(
    store: &dyn DocumentStore,
    key: &str,
    items: &[T],
) -> Result<(), DatabaseError> {
    let raw = serde_json::to_string(items)?;
    store.write(key, &raw)
}
