///! Listings page fetcher
///!
///! Owns the HTTP client and fetches the raw listings HTML. Fetch failures
///! (transport, timeout, non-2xx) surface as [`FetchError`] and are handled
///! at the updater boundary; the cached snapshot is never touched here.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::parser;
use super::types::Listing;

pub const DEFAULT_LISTINGS_URL: &str = "https://xivpf.com/listings";

const REQUEST_TIMEOUT_SECS: u64 = 20;
const USER_AGENT: &str = "BetterPF/1.0 (+https://example.local)";
const ACCEPT: &str = "text/html,application/xhtml+xml";

/// Why a fetch cycle produced no HTML
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
}

/// Listing scraper – owns the HTTP client and the source URL.
pub struct ListingScraper {
    client: Client,
    url: String,
}

impl ListingScraper {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .user_agent(USER_AGENT)
                .build()
                .expect("Failed to build reqwest client"),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the listings page and return the raw HTML body.
    async fn fetch_raw(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status,
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: self.url.clone(),
            source,
        })
    }

    /// Fetch → parse one cycle. Records come back unstamped; the updater
    /// assigns the batch timestamp.
    pub async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        tracing::debug!("Fetching listings from {}", self.url);

        let html = self.fetch_raw().await?;
        let listings =
            parser::parse_listings(&html).context("Failed to parse listings page HTML")?;

        tracing::info!("Fetched {} listings from {}", listings.len(), self.url);

        if listings.is_empty() {
            tracing::warn!("No listings found on {}", self.url);
        }

        Ok(listings)
    }
}

impl Default for ListingScraper {
    fn default() -> Self {
        Self::new(DEFAULT_LISTINGS_URL)
    }
}
