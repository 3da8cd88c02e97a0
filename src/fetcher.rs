//! Binary fetching for images and deck files.

use crate::error::{Error, Result};
use async_trait::async_trait;

/// Source of raw bytes for a URL
///
/// The PDF exporter loads images through this trait and the deck downloader
/// loads PDFs through it, so both can run against in-memory fixtures.
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    /// Fetch the full body at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Plain HTTP GET fetcher
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a fresh HTTP client
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        tracing::debug!(url = %url, bytes = bytes.len(), "fetched blob");
        Ok(bytes.to_vec())
    }
}
