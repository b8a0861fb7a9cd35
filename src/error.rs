//! Error type shared by every stage of integrity injection.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions raised while injecting integrity attributes.
///
/// Path traversal attempts and tags without an extractable URL never surface here: the
/// former is treated as a missing asset, the latter is silently skipped.
#[derive(Debug, Error)]
pub enum SriError {
  /// A local reference could not be resolved from the bundle or the static directory.
  #[error("asset {url} not found in bundle")]
  MissingAsset {
    /// URL as it appears in the document.
    url: String,
  },

  /// A remote reference could not be downloaded.
  #[error("failed to fetch remote asset {url}: {reason}")]
  RemoteFetch {
    /// Remote URL that failed.
    url: String,
    /// Transport error or unexpected status.
    reason: String,
  },

  /// A file inside the static directory exists but could not be read.
  #[error("failed to read static asset {}", path.display())]
  StaticRead {
    /// Resolved path inside the static directory.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },

  /// The configuration file could not be read.
  #[error("failed to read {}", path.display())]
  Config {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },

  /// The configuration file is not valid JSON for [`crate::SriConfig`].
  #[error("failed to parse {}", path.display())]
  ConfigParse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    #[source]
    source: serde_json::Error,
  },
}

impl SriError {
  /// Returns `true` for the only error class that `ignoreMissingAsset` may suppress.
  pub fn is_missing_asset(&self) -> bool {
    matches!(self, Self::MissingAsset { .. })
  }
}

/// Result alias used across the crate.
pub type SriResult<T> = Result<T, SriError>;
