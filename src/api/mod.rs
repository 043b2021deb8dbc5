//! HTTP API.
//!
//! Exposes the questionnaire, history, analysis, journal, medications,
//! appointments and navigation as JSON endpoints nested under `/api/`.
//! Every route passes through the request-logging middleware.
//!
//! The router is composable: `api_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::ApiContext;
