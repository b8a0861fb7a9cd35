//! Data structures shared between the scanner, resolver and injector.

use std::collections::BTreeMap;
use std::collections::btree_map;

/// Content of a single build output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRecord {
  /// Emitted JavaScript chunk.
  Code(String),
  /// Any other emitted file, HTML documents included.
  Asset(Vec<u8>),
}

impl OutputRecord {
  /// Bytes that an integrity digest is computed over.
  pub fn bytes(&self) -> &[u8] {
    match self {
      Self::Code(code) => code.as_bytes(),
      Self::Asset(source) => source,
    }
  }
}

/// Every artifact produced by the bundler, keyed by output-relative path.
#[derive(Debug, Clone, Default)]
pub struct OutputSet {
  entries: BTreeMap<String, OutputRecord>,
}

impl OutputSet {
  /// Create an empty output set.
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert or replace an output, returning the previous record.
  pub fn insert(&mut self, path: impl Into<String>, record: OutputRecord) -> Option<OutputRecord> {
    self.entries.insert(path.into(), record)
  }

  /// Exact lookup by key.
  pub fn get(&self, path: &str) -> Option<&OutputRecord> {
    self.entries.get(path)
  }

  /// Lookup that tolerates a leading `/` on either the key or the stored path.
  ///
  /// Bundlers key outputs without a leading slash while absolute references carry one.
  pub fn lookup(&self, key: &str) -> Option<&OutputRecord> {
    if let Some(record) = self.entries.get(key) {
      return Some(record);
    }
    let trimmed = key.trim_start_matches('/');
    self
      .entries
      .get(trimmed)
      .or_else(|| self.entries.get(&format!("/{trimmed}")))
  }

  /// Paths of every output that is an HTML document.
  pub fn html_paths(&self) -> Vec<String> {
    self
      .entries
      .keys()
      .filter(|path| is_html_path(path))
      .cloned()
      .collect()
  }

  /// Number of outputs.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Returns `true` when there are no outputs.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Iterate over all outputs in key order.
  pub fn iter(&self) -> btree_map::Iter<'_, String, OutputRecord> {
    self.entries.iter()
  }
}

impl FromIterator<(String, OutputRecord)> for OutputSet {
  fn from_iter<I: IntoIterator<Item = (String, OutputRecord)>>(iter: I) -> Self {
    Self {
      entries: iter.into_iter().collect(),
    }
  }
}

/// Returns `true` for outputs the injector rewrites.
pub fn is_html_path(path: &str) -> bool {
  path.ends_with(".html") || path.ends_with(".htm")
}

/// Element class an [`AssetReference`] was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
  /// `<script src="..."></script>`
  Script,
  /// `<link rel="stylesheet" href="...">`
  Stylesheet,
  /// `<link rel="modulepreload" href="...">`
  ModulePreload,
}

impl TagKind {
  /// Fixed order in which the document is scanned.
  pub const SCAN_ORDER: [TagKind; 3] = [Self::Script, Self::Stylesheet, Self::ModulePreload];
}

/// External resource reference located in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
  /// Element class of the match.
  pub tag_kind: TagKind,
  /// Raw matched markup.
  pub raw: String,
  /// URL extracted from `src`/`href`.
  pub url: String,
  /// Byte offset in the scanned text where an attribute may be inserted.
  pub insert_at: usize,
}

/// Attribute text to splice into the original document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityEdit {
  /// Offset relative to the unpatched text.
  pub position: usize,
  /// Text inserted verbatim, including its leading space.
  pub text: String,
}

impl IntegrityEdit {
  /// Build the ` integrity="..."` insertion for a digest.
  pub fn integrity(position: usize, digest: &str) -> Self {
    Self {
      position,
      text: format!(" integrity=\"{digest}\""),
    }
  }
}

/// Counters reported after a document or a whole output set was processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionSummary {
  /// HTML documents rewritten.
  pub documents: usize,
  /// Integrity attributes added.
  pub injected: usize,
  /// References that opted out with the skip marker.
  pub skipped: usize,
  /// Unresolved references tolerated by `ignoreMissingAsset`.
  pub missing: usize,
}

impl std::ops::AddAssign for InjectionSummary {
  fn add_assign(&mut self, other: Self) {
    self.documents += other.documents;
    self.injected += other.injected;
    self.skipped += other.skipped;
    self.missing += other.missing;
  }
}
