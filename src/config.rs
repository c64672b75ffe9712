//! Configuration for the odds scraper.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Source site and request pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Index page path, relative to `base_url`
    #[serde(default = "default_index_path")]
    pub index_path: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Minimum gap between consecutive requests
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Ceiling across all workers
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Event pages fetched in parallel; 1 keeps the crawl sequential
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,
}

fn default_base_url() -> String {
    "https://www.betmma.tips/".to_string()
}

fn default_index_path() -> String {
    "mma_betting_favorites_vs_underdogs.php?Org=1".to_string()
}

fn default_user_agent() -> String {
    concat!("mma-odds-scraper/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_request_delay_ms() -> u64 {
    2000
}

fn default_requests_per_minute() -> u32 {
    30
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_concurrency() -> usize {
    1
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_initial_delay_ms() -> u64 {
    500
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            index_path: default_index_path(),
            user_agent: default_user_agent(),
            request_delay_ms: default_request_delay_ms(),
            requests_per_minute: default_requests_per_minute(),
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            max_retries: default_max_retries(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
        }
    }
}

impl ScraperConfig {
    /// Spacing between limiter grants: the larger of the fixed delay and
    /// the per-minute ceiling
    pub fn grant_interval(&self) -> Duration {
        let per_minute = 60_000 / u64::from(self.requests_per_minute.max(1));
        Duration::from_millis(self.request_delay_ms.max(per_minute))
    }

    /// Upper bound on one event fetch, retries included.
    ///
    /// Every attempt may queue behind one reservation per worker in the
    /// shared limiter before its request timeout starts.
    pub fn event_timeout(&self) -> Duration {
        let attempts = self.max_retries + 1;
        let workers = u32::try_from(self.concurrency.max(1)).unwrap_or(u32::MAX);
        let backoff_ms: u64 = (0..self.max_retries)
            .map(|i| self.retry_initial_delay_ms.saturating_mul(1 << i.min(16)))
            .sum();

        let per_attempt = Duration::from_secs(self.timeout_secs) + self.grant_interval().saturating_mul(workers);
        per_attempt.saturating_mul(attempts) + Duration::from_millis(backoff_ms)
    }
}

/// Dataset location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,
}

fn default_dataset_path() -> String {
    "odds_data.csv".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file, and environment
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            // MMA_SCRAPER__CONCURRENCY=2, MMA_STORAGE__DATASET_PATH=..., etc.
            .add_source(
                config::Environment::with_prefix("MMA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
