use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::BookFeed;
use crate::error::UpstreamError;

/// Default upstream endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.example.com/books";

/// Default timeout for a single upstream request.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-backed implementation of [`BookFeed`].
///
/// Issues a plain GET and expects a JSON body. Non-2xx statuses, timeouts and
/// undecodable bodies are all reported as [`UpstreamError`].
#[derive(Clone)]
pub struct HttpBookFeed {
    client: Client,
    url: String,
}

impl HttpBookFeed {
    /// Create a feed for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, UpstreamError> {
        Self::with_timeout(url, DEFAULT_UPSTREAM_TIMEOUT)
    }

    /// Create a feed for `url` whose requests give up after `timeout`.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The upstream URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl BookFeed for HttpBookFeed {
    async fn fetch_books(&self) -> Result<Value, UpstreamError> {
        debug!(url = %self.url, "Fetching books from upstream");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<Value>().await?;
        Ok(body)
    }

    fn identifier(&self) -> &str {
        &self.url
    }
}
