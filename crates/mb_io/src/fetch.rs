//! Raw document reads: local files via tokio::fs, URLs via reqwest.
//!
//! HTTP requests always send `Cache-Control: no-cache` and `Pragma: no-cache`
//! so a re-run of the offline pipeline is picked up immediately. There is no
//! retry policy: a failed read is final for that document.

use std::path::Path;

use log::debug;

use crate::source::Source;
use crate::{fetch_err, LoadError};

/// Per-document size cap (8 MiB).
pub const MAX_DOCUMENT_BYTES: u64 = 8 * 1024 * 1024;

/// Shared reader. Cheap to clone; one HTTP connection pool per instance.
#[derive(Clone, Debug, Default)]
pub struct Fetcher {
    #[cfg(feature = "http")]
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the full body of `src`.
    pub async fn fetch_bytes(&self, src: &Source) -> Result<Vec<u8>, LoadError> {
        debug!("fetch start: {src}");
        let out = match src {
            Source::Local(path) => read_local(path).await,
            Source::Http(url) => self.get_http(url).await,
        };
        if let Ok(bytes) = &out {
            debug!("fetch done: {src} ({} bytes)", bytes.len());
        }
        out
    }

    /// True when `src` exists (local regular file) or answers a success status to HEAD.
    pub async fn exists(&self, src: &Source) -> bool {
        match src {
            Source::Local(path) => tokio::fs::metadata(path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false),
            Source::Http(url) => self.head_ok(url).await,
        }
    }

    #[cfg(feature = "http")]
    async fn get_http(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        use reqwest::header::{CACHE_CONTROL, PRAGMA};

        let resp = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| fetch_err(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_err(url, format!("HTTP {status}")));
        }
        if resp.content_length().is_some_and(|n| n > MAX_DOCUMENT_BYTES) {
            return Err(fetch_err(url, "document too large"));
        }
        let body = resp.bytes().await.map_err(|e| fetch_err(url, e))?;
        if body.len() as u64 > MAX_DOCUMENT_BYTES {
            return Err(fetch_err(url, "document too large"));
        }
        Ok(body.to_vec())
    }

    #[cfg(not(feature = "http"))]
    async fn get_http(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        Err(fetch_err(url, "http support disabled (build with feature `http`)"))
    }

    #[cfg(feature = "http")]
    async fn head_ok(&self, url: &str) -> bool {
        use reqwest::header::CACHE_CONTROL;

        match self.client.head(url).header(CACHE_CONTROL, "no-cache").send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("probe {url}: {e}");
                false
            }
        }
    }

    #[cfg(not(feature = "http"))]
    async fn head_ok(&self, _url: &str) -> bool {
        false
    }
}

async fn read_local(path: &Path) -> Result<Vec<u8>, LoadError> {
    let label = path.display().to_string();
    let meta = tokio::fs::metadata(path).await.map_err(|e| fetch_err(&label, e))?;
    if !meta.is_file() {
        return Err(fetch_err(&label, "not a regular file"));
    }
    if meta.len() > MAX_DOCUMENT_BYTES {
        return Err(fetch_err(&label, "document too large"));
    }
    tokio::fs::read(path).await.map_err(|e| fetch_err(&label, e))
}
