//! Remote book catalog used by `GET /fetch-books`.
//!
//! [`BookFeed`] abstracts the upstream so handlers can be exercised against an
//! in-process mock; [`HttpBookFeed`] is the production implementation.

mod http_feed;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::UpstreamError;

pub use http_feed::{HttpBookFeed, DEFAULT_UPSTREAM_TIMEOUT, DEFAULT_UPSTREAM_URL};

/// Source of book data living outside this process.
#[async_trait]
pub trait BookFeed: Send + Sync {
    /// Fetch the upstream catalog as raw JSON.
    async fn fetch_books(&self) -> Result<Value, UpstreamError>;

    /// Human-readable identifier for logs (typically the URL).
    fn identifier(&self) -> &str;
}
