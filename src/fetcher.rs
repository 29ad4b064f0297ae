//! Readers for local blocklist files and remote blocklist URLs.
//!
//! Every source is best-effort: an unreadable file or a failed HTTP request
//! yields a [`FetchOutcome::Failed`] that contributes an empty text to the
//! pipeline, and the run continues with whatever other sources succeeded.

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const TIMEOUT_SECS: u64 = 30;

/// Outcome of reading a single source. Failures are recorded, never thrown.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Raw text of the source, carriage returns already stripped.
    Fetched(String),
    /// Recovered failure; the source contributes nothing to the run.
    Failed { source: String, reason: String },
}

impl FetchOutcome {
    /// Text contribution of this source (empty when the fetch failed).
    pub fn text(&self) -> &str {
        match self {
            FetchOutcome::Fetched(text) => text,
            FetchOutcome::Failed { .. } => "",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed { .. })
    }
}

/// Reader for blocklist sources.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a new fetcher with a bounded request timeout.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(format!("synoblock/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Read every source, local files first then URLs, each in argument
    /// order. The outcome order matches the source order.
    pub async fn fetch_all(&self, files: &[PathBuf], urls: &[Url]) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::with_capacity(files.len() + urls.len());
        for path in files {
            outcomes.push(self.fetch_local(path));
        }
        for url in urls {
            outcomes.push(self.fetch_remote(url).await);
        }
        outcomes
    }

    /// Read a local list file.
    pub fn fetch_local(&self, path: &Path) -> FetchOutcome {
        debug!("Reading {}", path.display());
        match std::fs::read_to_string(path) {
            Ok(text) => FetchOutcome::Fetched(strip_carriage_returns(&text)),
            Err(e) => {
                warn!("Unable to read {}: {}", path.display(), e);
                FetchOutcome::Failed {
                    source: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Fetch a remote list with a single GET, no retries. A transport error
    /// or a non-2xx status is a recovered failure.
    pub async fn fetch_remote(&self, url: &Url) -> FetchOutcome {
        debug!("Fetching {}", url);
        match self.client.get(url.clone()).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => FetchOutcome::Fetched(strip_carriage_returns(&body)),
                Err(e) => {
                    warn!("Unable to connect to {}: {}", url, e);
                    FetchOutcome::Failed {
                        source: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            },
            Ok(response) => {
                warn!("Unable to connect to {}: HTTP {}", url, response.status());
                FetchOutcome::Failed {
                    source: url.to_string(),
                    reason: format!("HTTP {}", response.status()),
                }
            }
            Err(e) => {
                warn!("Unable to connect to {}: {}", url, e);
                FetchOutcome::Failed {
                    source: url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }
}

// Note: Default is intentionally not implemented for Fetcher
// because new() can fail and we want explicit error handling.

/// Tolerate Windows-style line endings without affecting line counts.
fn strip_carriage_returns(text: &str) -> String {
    text.replace('\r', "")
}
