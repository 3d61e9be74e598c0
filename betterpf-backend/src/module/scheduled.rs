///! Scheduled task manager - centralize all periodic tasks
///!
///! Currently one background task: the listing scrape, run once at startup
///! and then on a fixed interval, independent of request serving.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::pf::ListingUpdater;

/// Configuration for scheduled tasks
#[derive(Debug, Clone)]
pub struct ScheduledTaskConfig {
    /// Interval between listing scrapes (in minutes)
    pub scrape_interval_minutes: u64,

    /// Upper bound on one whole scrape cycle (in seconds)
    pub scrape_timeout_secs: u64,

    /// Perform an initial scrape immediately at startup
    pub perform_initial_update: bool,
}

impl Default for ScheduledTaskConfig {
    fn default() -> Self {
        Self {
            scrape_interval_minutes: 5,
            scrape_timeout_secs: 60,
            perform_initial_update: true,
        }
    }
}

/// Scheduled task manager
pub struct ScheduledTaskManager {
    config: ScheduledTaskConfig,
    updater: Arc<ListingUpdater>,
    task_handles: Vec<JoinHandle<()>>,
}

impl ScheduledTaskManager {
    pub fn new(config: ScheduledTaskConfig, updater: Arc<ListingUpdater>) -> Self {
        Self {
            config,
            updater,
            task_handles: Vec::new(),
        }
    }

    /// Start all scheduled tasks
    pub fn start_all(&mut self) {
        tracing::info!(
            "Starting scheduled tasks (listing scrape every {} min, initial: {})",
            self.config.scrape_interval_minutes,
            self.config.perform_initial_update
        );

        let updater = self.updater.clone();
        let interval = Duration::from_secs(self.config.scrape_interval_minutes * 60);
        let timeout = Duration::from_secs(self.config.scrape_timeout_secs);
        let perform_initial = self.config.perform_initial_update;

        let handle = tokio::spawn(async move {
            if perform_initial {
                tracing::info!("Performing initial listing scrape...");
                Self::run_scrape(&updater, timeout).await;
            }
            loop {
                tokio::time::sleep(interval).await;
                Self::run_scrape(&updater, timeout).await;
            }
        });
        self.task_handles.push(handle);
    }

    /// Run one bounded scrape cycle. Failures are logged here and never
    /// stop the loop; the last-known-good snapshot stays authoritative.
    async fn run_scrape(updater: &Arc<ListingUpdater>, timeout: Duration) {
        match tokio::time::timeout(timeout, updater.update()).await {
            Ok(Ok(count)) => {
                tracing::info!("Listing scrape completed: {} listings", count);
            }
            Ok(Err(e)) => {
                tracing::error!(
                    "Listing scrape failed: {:#}; keeping last cached results",
                    e
                );
            }
            Err(_) => {
                tracing::error!(
                    "Listing scrape timed out after {}s; keeping last cached results",
                    timeout.as_secs()
                );
            }
        }
    }

    /// Gracefully shut down all tasks
    pub fn shutdown(self) {
        tracing::info!("Shutting down scheduled tasks...");
        for handle in self.task_handles {
            handle.abort();
        }
    }
}
