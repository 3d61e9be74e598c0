use serde::{Deserialize, Serialize};

use crate::module::pf::scraper::DEFAULT_LISTINGS_URL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Source URL for the party finder listings page
    #[serde(default = "default_listings_url")]
    pub listings_url: String,

    #[serde(default = "default_scrape_interval_minutes")]
    pub scrape_interval_minutes: u64,

    #[serde(default = "default_scrape_timeout_secs")]
    pub scrape_timeout_secs: u64,

    /// Directory holding the persisted snapshot cache
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Directory with the static web UI files
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_listings_url() -> String {
    DEFAULT_LISTINGS_URL.to_string()
}

fn default_scrape_interval_minutes() -> u64 {
    5
}

fn default_scrape_timeout_secs() -> u64 {
    60
}

fn default_cache_dir() -> String {
    "data".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            listings_url: default_listings_url(),
            scrape_interval_minutes: default_scrape_interval_minutes(),
            scrape_timeout_secs: default_scrape_timeout_secs(),
            cache_dir: default_cache_dir(),
            static_dir: default_static_dir(),
        }
    }
}

impl BackendConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BackendConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, falling back to defaults when it is absent.
    /// A present-but-invalid file is an error, not a silent default.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::info!("No config file at {}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
