//! Page fetching.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::rate_limiter::RateLimiter;
use crate::config::ScraperConfig;
use crate::error::TransportError;
use crate::retry::{retry_if, RetryConfig};

/// Something that turns a URL into page markup
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, TransportError>;
}

/// reqwest-backed transport with pacing, timeout and retries
pub struct HttpTransport {
    client: reqwest::Client,
    limiter: RateLimiter,
    retry: RetryConfig,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ScraperConfig, limiter: RateLimiter) -> Result<Self, TransportError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Network {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            limiter,
            retry: RetryConfig::from_scraper(config),
            timeout,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, TransportError> {
        self.limiter.acquire().await;
        debug!("GET {}", url);

        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|source| network_error(url, source, self.timeout))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            response.text().await.map_err(|source| network_error(url, source, self.timeout))
        };

        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| TransportError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            })?
    }
}

fn network_error(url: &str, source: reqwest::Error, timeout: Duration) -> TransportError {
    if source.is_timeout() {
        return TransportError::Timeout {
            url: url.to_string(),
            secs: timeout.as_secs(),
        };
    }
    TransportError::Network {
        url: url.to_string(),
        source,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<String, TransportError> {
        retry_if(
            &self.retry,
            &format!("GET {}", url),
            TransportError::is_transient,
            || self.fetch_once(url),
        )
        .await
    }
}
