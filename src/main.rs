use chairbook::api;
use chairbook::config::CONFIG;
use chairbook::core::services::ReservationService;
use chairbook::infrastructure::{
    clock::{Clock, SystemClock},
    logging::in_memory::InMemoryLogging,
    storage::{Storage, in_memory::InMemoryStorage},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&CONFIG.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!(config = ?*CONFIG, "Starting chairbook");

    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    let logging = InMemoryLogging::new();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let service = Arc::new(ReservationService::new(storage, logging, clock, CONFIG.auth_settings()));

    let app = api::app(service);

    // Start server
    let addr = SocketAddr::from((CONFIG.host, CONFIG.port));
    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
