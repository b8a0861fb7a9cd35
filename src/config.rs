//! Injection configuration and its JSON loader.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SriError, SriResult};

const DEFAULT_CONFIG_FILE: &str = "sri.config.json";

/// Options controlling how references are mapped onto build outputs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SriConfig {
  /// Public base path the bundle was built with (`/`, `/app/`, `./`, ...).
  pub base: String,
  /// Directory whose files are copied verbatim into the output (a "public" folder).
  pub static_dir: Option<PathBuf>,
  /// Leave unresolved local references untouched instead of failing the build.
  pub ignore_missing_asset: bool,
}

impl Default for SriConfig {
  fn default() -> Self {
    Self {
      base: "/".into(),
      static_dir: None,
      ignore_missing_asset: false,
    }
  }
}

/// How reference URLs are mapped to output keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasePath<'a> {
  /// `""` or `"./"`: resolve each URL relative to the referencing document.
  Relative,
  /// Any other value: strip this literal prefix from the URL.
  Prefix(&'a str),
}

impl SriConfig {
  /// Load configuration from `sri.config.json` in the provided directory.
  ///
  /// Missing or malformed files fall back to the defaults so callers without a config
  /// file keep working.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    match Self::from_path(&candidate) {
      Ok(config) => config,
      Err(err) => {
        tracing::debug!(path = %candidate.display(), error = %err, "using default SRI configuration");
        Self::default()
      }
    }
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> SriResult<Self> {
    let content = fs::read_to_string(path).map_err(|source| SriError::Config {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| SriError::ConfigParse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Replace the public base path.
  pub fn with_base(mut self, base: impl Into<String>) -> Self {
    self.base = base.into();
    self
  }

  /// Enable the static passthrough directory.
  pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.static_dir = Some(dir.into());
    self
  }

  /// Toggle tolerance of unresolved local references.
  pub fn ignore_missing_asset(mut self, ignore: bool) -> Self {
    self.ignore_missing_asset = ignore;
    self
  }

  /// Classify the configured base path.
  pub fn base_path(&self) -> BasePath<'_> {
    match self.base.as_str() {
      "" | "./" => BasePath::Relative,
      prefix => BasePath::Prefix(prefix),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn classifies_relative_and_prefixed_bases() {
    assert_eq!(SriConfig::default().with_base("").base_path(), BasePath::Relative);
    assert_eq!(SriConfig::default().with_base("./").base_path(), BasePath::Relative);
    assert_eq!(SriConfig::default().base_path(), BasePath::Prefix("/"));
    assert_eq!(
      SriConfig::default().with_base("/app/").base_path(),
      BasePath::Prefix("/app/")
    );
  }

  #[test]
  fn reads_camel_case_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sri.config.json");
    fs::write(
      &path,
      r#"{"base": "./", "staticDir": "public", "ignoreMissingAsset": true}"#,
    )
    .unwrap();

    let config = SriConfig::from_path(&path).unwrap();
    assert_eq!(config.base, "./");
    assert_eq!(config.static_dir, Some(PathBuf::from("public")));
    assert!(config.ignore_missing_asset);
  }

  #[test]
  fn partial_file_keeps_defaults() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("sri.config.json"), r#"{"ignoreMissingAsset": true}"#).unwrap();

    let config = SriConfig::discover(dir.path());
    assert_eq!(config.base, "/");
    assert_eq!(config.static_dir, None);
    assert!(config.ignore_missing_asset);
  }

  #[test]
  fn discover_falls_back_on_missing_or_invalid_file() {
    let dir = tempdir().unwrap();
    assert_eq!(SriConfig::discover(dir.path()), SriConfig::default());

    fs::write(dir.path().join("sri.config.json"), "{ not json").unwrap();
    assert_eq!(SriConfig::discover(dir.path()), SriConfig::default());
  }

  #[test]
  fn from_path_reports_parse_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "[1, 2]").unwrap();

    let err = SriConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, SriError::ConfigParse { .. }));
  }
}
