///! Listing updater
///!
///! One scrape cycle: fetch the listings page, stamp the batch with a
///! single timestamp, swap the snapshot store wholesale, then mirror it to
///! the cache file. A failed fetch leaves the previous snapshot fully
///! intact and servable.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;

use super::scraper::ListingScraper;
use super::store::SnapshotStore;
use super::types::ListingSnapshot;

/// Shared listing updater – owns the scraper and a handle to the store.
pub struct ListingUpdater {
    scraper: ListingScraper,
    store: Arc<SnapshotStore>,
}

impl ListingUpdater {
    pub fn new(scraper: ListingScraper, store: Arc<SnapshotStore>) -> Self {
        Self { scraper, store }
    }

    /// Fetch → stamp → swap → persist one cycle. Returns the number of
    /// listings in the new snapshot.
    ///
    /// Fetch errors propagate to the scheduler without touching the store.
    /// A failed durable write only logs: the fresh in-memory snapshot keeps
    /// serving, and the next cycle writes again.
    pub async fn update(&self) -> Result<usize> {
        let mut listings = self.scraper.fetch_listings().await?;

        let fetched_at = Utc::now();
        for listing in &mut listings {
            listing.fetched_at = Some(fetched_at);
        }
        let count = listings.len();

        self.store
            .replace(ListingSnapshot {
                updated_at: fetched_at,
                listings,
            })
            .await;

        if let Err(e) = self.store.persist().await {
            tracing::warn!(
                "Failed to persist listing cache: {:#}; serving the in-memory snapshot",
                e
            );
        }

        tracing::info!("Cache updated with {} listings", count);
        Ok(count)
    }
}
