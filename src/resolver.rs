//! Resolution of a document reference to the bytes it points at.
//!
//! Sources are tried in a fixed order and the first hit wins:
//! 1. remote URLs are downloaded,
//! 2. the bundle output set is consulted,
//! 3. the static directory is read, when one is configured.
//!
//! A reference no source can satisfy is a [`SriError::MissingAsset`], or silently absent
//! when `ignoreMissingAsset` is set. Remote failures are never softened.

use std::borrow::Cow;
use std::fs;

use crate::asset_paths::{bundle_key, is_remote_url, remote_fetch_url, resolve_static_path};
use crate::config::SriConfig;
use crate::error::{SriError, SriResult};
use crate::fetch::RemoteFetcher;
use crate::models::OutputSet;

/// Strategy that supplied an asset's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
  /// Downloaded over the network.
  Remote,
  /// Found among the bundle outputs.
  Output,
  /// Read from the static passthrough directory.
  Static,
}

/// Bytes of a resolved reference together with where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset<'a> {
  /// Strategy that produced the bytes.
  pub source: AssetSource,
  /// Content to digest.
  pub bytes: Cow<'a, [u8]>,
}

/// Resolves references for documents of one output set.
pub struct AssetResolver<'a> {
  config: &'a SriConfig,
  outputs: &'a OutputSet,
  fetcher: &'a dyn RemoteFetcher,
}

impl<'a> AssetResolver<'a> {
  /// Create a resolver over a read-only output set.
  pub fn new(config: &'a SriConfig, outputs: &'a OutputSet, fetcher: &'a dyn RemoteFetcher) -> Self {
    Self {
      config,
      outputs,
      fetcher,
    }
  }

  /// Resolve `url` as referenced from the document stored at `document_path`.
  ///
  /// Returns `Ok(None)` only for unresolved local references when missing assets are
  /// tolerated.
  pub fn resolve(&self, document_path: &str, url: &str) -> SriResult<Option<ResolvedAsset<'a>>> {
    if let Some(asset) = self.from_remote(url)? {
      return Ok(Some(asset));
    }

    // a key that escapes the output root is a miss for every local source
    if let Some(key) = bundle_key(document_path, url, self.config.base_path()) {
      if let Some(asset) = self.from_outputs(&key) {
        return Ok(Some(asset));
      }
      if let Some(asset) = self.from_static_dir(&key)? {
        return Ok(Some(asset));
      }
    }

    if self.config.ignore_missing_asset {
      tracing::warn!(document = document_path, url, "asset not found, leaving reference without integrity");
      return Ok(None);
    }
    Err(SriError::MissingAsset {
      url: url.to_string(),
    })
  }

  fn from_remote(&self, url: &str) -> SriResult<Option<ResolvedAsset<'a>>> {
    if !is_remote_url(url) {
      return Ok(None);
    }
    let bytes = self.fetcher.fetch(&remote_fetch_url(url))?;
    Ok(Some(ResolvedAsset {
      source: AssetSource::Remote,
      bytes: Cow::Owned(bytes),
    }))
  }

  fn from_outputs(&self, key: &str) -> Option<ResolvedAsset<'a>> {
    let outputs: &'a OutputSet = self.outputs;
    outputs.lookup(key).map(|record| ResolvedAsset {
      source: AssetSource::Output,
      bytes: Cow::Borrowed(record.bytes()),
    })
  }

  fn from_static_dir(&self, key: &str) -> SriResult<Option<ResolvedAsset<'a>>> {
    let Some(root) = self.config.static_dir.as_deref() else {
      return Ok(None);
    };
    let Some(path) = resolve_static_path(root, key) else {
      return Ok(None);
    };
    let bytes = fs::read(&path).map_err(|source| SriError::StaticRead {
      path: path.clone(),
      source,
    })?;
    Ok(Some(ResolvedAsset {
      source: AssetSource::Static,
      bytes: Cow::Owned(bytes),
    }))
  }
}
