//! Resource fetcher
//!
//! Thin transport wrapper behind the `Fetcher` trait: given a URL, return
//! raw bytes or fail. The traversal engine treats every failure as empty
//! content plus a diagnostic, so nothing here aborts a job.

use crate::{Result, TendrilError, UrlError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Transport seam consumed by the traversal engine
///
/// Implementations must not panic on ordinary network failures; they return
/// an error the engine recovers from locally.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Production fetcher backed by a reqwest client
///
/// Speaks `http` and `https`; any other scheme is reported as unsupported
/// and follows the same empty-content recovery path as a network failure.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the HTTP client used for the whole job
    ///
    /// # Arguments
    ///
    /// * `timeout_secs` - Per-request timeout from the job configuration
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tendril/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        // Request-shape check only; crawl identity never goes through Url.
        let parsed = url::Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string()).into()),
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| TendrilError::Fetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TendrilError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {status}"),
            });
        }

        let bytes = response.bytes().await.map_err(|e| TendrilError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(bytes.to_vec())
    }
}
