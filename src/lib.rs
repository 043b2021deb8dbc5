pub mod analysis; // Turning-point analysis via Ollama
pub mod api; // HTTP API
pub mod appointment; // Doctors, slots and booking
pub mod config;
pub mod core_state; // Shared state behind every handler
pub mod db;
pub mod history; // Questionnaire response log
pub mod i18n;
pub mod journal; // Calendar journal and iCalendar export
pub mod medical_file;
pub mod medications;
pub mod models;
pub mod navigation;
pub mod questions; // Daily question bank
pub mod visibility;
pub mod wizard; // Questionnaire state machine

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Start the app: logging, state, HTTP server until Ctrl-C.
pub fn run() -> Result<(), String> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("AwareCare starting v{}", config::APP_VERSION);

    let settings = config::Settings::from_env();
    let bind_addr = settings.bind_addr;
    let core = core_state::CoreState::open(settings).map_err(|e| {
        tracing::error!(error = %e, "Failed to open application state");
        e.to_string()
    })?;

    let core = Arc::new(core);
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let result = runtime.block_on(serve(core.clone(), bind_addr));
    // The blocking HTTP client must be dropped outside the runtime.
    drop(runtime);
    drop(core);
    result
}

async fn serve(core: Arc<core_state::CoreState>, addr: std::net::SocketAddr) -> Result<(), String> {
    let mut server = api::start_api_server(core, addr).await?;
    tracing::info!(addr = %server.info.addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {e}");
    }
    server.shutdown();
    server.stopped().await;
    Ok(())
}
