//! Downloading remote references.
//!
//! Remote URLs are requested exactly once. Any transport error or non-success status is
//! fatal for the build, independent of `ignoreMissingAsset`.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::error::{SriError, SriResult};

/// Default request timeout (30s).
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of bytes for remote references.
pub trait RemoteFetcher: Send + Sync {
  /// Return the full response body for `url`.
  fn fetch(&self, url: &str) -> SriResult<Vec<u8>>;
}

/// [`RemoteFetcher`] backed by a blocking `reqwest` client.
///
/// The client is built on first use, so builds without remote references never start
/// the HTTP stack.
#[derive(Debug)]
pub struct HttpFetcher {
  timeout: Duration,
  client: OnceLock<Client>,
}

impl Default for HttpFetcher {
  fn default() -> Self {
    Self::new()
  }
}

impl HttpFetcher {
  /// Create a fetcher using [`DEFAULT_FETCH_TIMEOUT`].
  pub fn new() -> Self {
    Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
  }

  /// Create a fetcher with a custom request timeout.
  pub fn with_timeout(timeout: Duration) -> Self {
    Self {
      timeout,
      client: OnceLock::new(),
    }
  }

  /// Wrap an already configured client.
  pub fn from_client(client: Client) -> Self {
    Self {
      timeout: DEFAULT_FETCH_TIMEOUT,
      client: OnceLock::from(client),
    }
  }

  fn client(&self) -> reqwest::Result<&Client> {
    if let Some(client) = self.client.get() {
      return Ok(client);
    }
    let client = Client::builder().timeout(self.timeout).build()?;
    Ok(self.client.get_or_init(|| client))
  }
}

impl RemoteFetcher for HttpFetcher {
  fn fetch(&self, url: &str) -> SriResult<Vec<u8>> {
    let remote_error = |reason: String| SriError::RemoteFetch {
      url: url.to_string(),
      reason,
    };

    let response = self
      .client()
      .map_err(|err| remote_error(format!("failed to build HTTP client: {err}")))?
      .get(url)
      .send()
      .map_err(|err| remote_error(err.to_string()))?;

    check_status(url, response.status())?;
    let body = response
      .bytes()
      .map_err(|err| remote_error(err.to_string()))?;
    tracing::debug!(url, size = body.len(), "fetched remote asset");
    Ok(body.to_vec())
  }
}

/// Reject any response that is not a 2xx.
fn check_status(url: &str, status: StatusCode) -> SriResult<()> {
  if status.is_success() {
    return Ok(());
  }
  Err(SriError::RemoteFetch {
    url: url.to_string(),
    reason: format!("unexpected status {status}"),
  })
}
