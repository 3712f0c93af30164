//! Remote URL fetching.
//!
//! Downloads are buffered fully into memory before the relay call; there is
//! no streaming and no retry. A batch of URLs is fetched concurrently and
//! fails as a whole on the first individual failure.

use crate::config::FetchConfig;
use crate::errors::{Error, Result};
use crate::relay::UploadedFile;
use futures::future::try_join_all;

/// Downloads remote URLs into in-memory files.
#[derive(Debug, Clone)]
pub struct RemoteFetcher {
    client: reqwest::Client,
}

impl RemoteFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create fetch HTTP client");
        Self { client }
    }

    /// Fetch a single URL, buffering the whole body.
    ///
    /// The file name is derived from the URL path; see [`filename_from_url`].
    pub async fn fetch(&self, url: &str) -> Result<UploadedFile> {
        tracing::debug!(url = %url, "Fetching remote file");

        let response = self.client.get(url).send().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let data = response.bytes().await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let name = filename_from_url(url);
        tracing::debug!(url = %url, name = %name, bytes = data.len(), "Fetched remote file");

        Ok(UploadedFile { name, data })
    }

    /// Fetch all URLs concurrently, in input order, with no concurrency cap.
    ///
    /// Fail-fast: the first error aborts the batch and the results of any
    /// in-flight siblings are discarded.
    pub async fn fetch_many(&self, urls: &[String]) -> Result<Vec<UploadedFile>> {
        try_join_all(urls.iter().map(|url| self.fetch(url))).await
    }
}

/// Derive a file name from a URL: the substring after the last path
/// separator, with any trailing query string or fragment stripped.
///
/// Falls back to `"download"` when the path yields an empty name (trailing
/// slash, bare host).
pub(crate) fn filename_from_url(url: &str) -> String {
    let without_suffix = url.split(['?', '#']).next().unwrap_or(url);
    let name = without_suffix.rsplit('/').next().unwrap_or("");
    if name.is_empty() {
        "download".to_string()
    } else {
        name.to_string()
    }
}
