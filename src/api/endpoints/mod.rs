//! API endpoint handlers.
//!
//! Each module corresponds to a screen of the app. Handlers are thin:
//! the stores and the questionnaire session on `CoreState` do the work.

pub mod analysis;
pub mod appointments;
pub mod health;
pub mod journal;
pub mod medical_file;
pub mod medications;
pub mod navigation;
pub mod questions;
pub mod wizard;
