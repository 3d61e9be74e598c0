use betterpf_backend::config::BackendConfig;
use betterpf_backend::module::pf::{ListingScraper, ListingUpdater, SnapshotStore};
use betterpf_backend::module::scheduled::{ScheduledTaskConfig, ScheduledTaskManager};
use betterpf_backend::{logging, service};

use anyhow::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = BackendConfig::load_or_default("config.toml")?;

    // Initialize logging
    let _logging_guard = logging::init_logging("logs", "betterpf-backend", &config.log_level);

    tracing::info!("BetterPF backend starting...");
    tracing::info!("Server will listen on {}", config.server_address());

    // Snapshot store: load any persisted snapshot so queries can be
    // answered before the first scrape completes
    tokio::fs::create_dir_all(&config.cache_dir).await?;
    let store = Arc::new(SnapshotStore::new(&config.cache_dir));
    match store.load().await {
        Ok(true) => tracing::info!("Serving persisted snapshot until next scrape"),
        Ok(false) => tracing::info!("No persisted snapshot, waiting for first scrape"),
        Err(e) => tracing::warn!("Failed to load persisted snapshot: {:#}", e),
    }

    // Scheduled scrape: initial run immediately, then on a fixed interval
    let scraper = ListingScraper::new(config.listings_url.clone());
    let updater = Arc::new(ListingUpdater::new(scraper, store.clone()));
    let task_config = ScheduledTaskConfig {
        scrape_interval_minutes: config.scrape_interval_minutes,
        scrape_timeout_secs: config.scrape_timeout_secs,
        perform_initial_update: true,
    };
    let mut task_manager = ScheduledTaskManager::new(task_config, updater);
    task_manager.start_all();

    // HTTP server
    let app = service::router(service::AppState { store }, &config.static_dir);
    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;
    tracing::info!("HTTP server listening on {}", config.server_address());
    axum::serve(listener, app).await?;

    Ok(())
}
