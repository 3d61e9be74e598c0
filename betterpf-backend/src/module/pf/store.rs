///! Snapshot store
///!
///! Holds the latest listings snapshot behind a read/write lock and mirrors
///! it to a single JSON cache file. The in-memory pair (updated_at,
///! listings) is swapped as one unit, so readers never see a torn snapshot.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::types::ListingSnapshot;

const CACHE_FILE: &str = "listings_cache.json";

/// Shared snapshot store – in-memory snapshot plus its durable JSON mirror.
/// None until the first successful scrape or a cache file load.
pub struct SnapshotStore {
    snapshot: RwLock<Option<ListingSnapshot>>,
    cache_path: PathBuf,
}

impl SnapshotStore {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            snapshot: RwLock::new(None),
            cache_path: cache_dir.as_ref().join(CACHE_FILE),
        }
    }

    /// Load the persisted snapshot, if any. Returns whether one was loaded.
    pub async fn load(&self) -> Result<bool> {
        if !self.cache_path.exists() {
            return Ok(false);
        }

        let content = tokio::fs::read_to_string(&self.cache_path)
            .await
            .context(format!("Failed to read cache file {:?}", self.cache_path))?;
        let cached: ListingSnapshot = serde_json::from_str(&content)
            .context(format!("Failed to parse cache file {:?}", self.cache_path))?;

        tracing::info!(
            "Loaded {} listings from cache (updated at {})",
            cached.listings.len(),
            cached.updated_at
        );

        *self.snapshot.write().await = Some(cached);
        Ok(true)
    }

    /// Clone of the current snapshot, for read-only use by handlers.
    pub async fn current(&self) -> Option<ListingSnapshot> {
        self.snapshot.read().await.clone()
    }

    /// When the current snapshot was taken, if one exists.
    pub async fn last_updated(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.snapshot.read().await.as_ref().map(|s| s.updated_at)
    }

    /// Replace the snapshot wholesale. Timestamp and listings swap together.
    pub async fn replace(&self, snapshot: ListingSnapshot) {
        *self.snapshot.write().await = Some(snapshot);
    }

    /// Write the current snapshot to the JSON cache file (idempotent
    /// singleton overwrite). No-op when no snapshot exists yet.
    pub async fn persist(&self) -> Result<()> {
        let json = {
            let guard = self.snapshot.read().await;
            match guard.as_ref() {
                Some(snapshot) => serde_json::to_string_pretty(snapshot)
                    .context("Failed to serialize snapshot")?,
                None => return Ok(()),
            }
        };

        tokio::fs::write(&self.cache_path, json)
            .await
            .context(format!("Failed to write cache file {:?}", self.cache_path))?;

        tracing::debug!("Persisted snapshot to {:?}", self.cache_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::pf::parser::parse_listings;
    use chrono::Utc;

    fn sample_snapshot(duties: &[&str]) -> ListingSnapshot {
        let html = format!(
            "<div id=\"listings\">{}</div>",
            duties
                .iter()
                .map(|d| format!(
                    "<div class=\"listing\"><div class=\"duty\">{d}</div></div>"
                ))
                .collect::<String>()
        );
        ListingSnapshot {
            updated_at: Utc::now(),
            listings: parse_listings(&html).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_store_starts_empty() {
        let store = SnapshotStore::new(std::env::temp_dir());
        assert!(store.current().await.is_none());
        assert!(store.last_updated().await.is_none());
    }

    #[tokio::test]
    async fn test_replace_swaps_whole_snapshot() {
        let store = SnapshotStore::new(std::env::temp_dir());

        let first = sample_snapshot(&["Alpha"]);
        store.replace(first.clone()).await;
        let seen = store.current().await.unwrap();
        assert_eq!(seen.updated_at, first.updated_at);
        assert_eq!(seen.listings.len(), 1);

        let second = sample_snapshot(&["Beta", "Gamma"]);
        store.replace(second.clone()).await;
        let seen = store.current().await.unwrap();
        assert_eq!(seen.updated_at, second.updated_at);
        assert_eq!(seen.listings.len(), 2);
        assert_eq!(seen.listings[0].duty, "Beta");
    }

    #[tokio::test]
    async fn test_persist_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!(
            "betterpf-store-test-{}",
            std::process::id()
        ));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let store = SnapshotStore::new(&dir);
        // Persisting with no snapshot is a no-op
        store.persist().await.unwrap();
        assert!(!dir.join(CACHE_FILE).exists());

        let snapshot = sample_snapshot(&["Alpha", "Beta"]);
        store.replace(snapshot.clone()).await;
        store.persist().await.unwrap();

        let reloaded = SnapshotStore::new(&dir);
        assert!(reloaded.load().await.unwrap());
        let seen = reloaded.current().await.unwrap();
        assert_eq!(seen.updated_at, snapshot.updated_at);
        assert_eq!(seen.listings.len(), 2);
        assert_eq!(seen.listings[1].duty, "Beta");

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_load_missing_file_is_not_an_error() {
        let store = SnapshotStore::new("/nonexistent/betterpf-cache-dir");
        assert!(!store.load().await.unwrap());
        assert!(store.current().await.is_none());
    }
}
