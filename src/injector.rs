//! Integrity injection orchestrator for the HTML documents of a build.

use std::borrow::Cow;
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::SriConfig;
use crate::error::SriResult;
use crate::fetch::{HttpFetcher, RemoteFetcher};
use crate::html::{
  apply_insertions, find_asset_references, has_integrity_attribute, has_skip_marker,
  strip_skip_markers,
};
use crate::integrity::compute_integrity;
use crate::models::{AssetReference, InjectionSummary, IntegrityEdit, OutputRecord, OutputSet, TagKind};
use crate::resolver::AssetResolver;

/// Adds `integrity` attributes to every external script, stylesheet and module preload
/// referenced from the HTML outputs of a build.
pub struct SriInjector {
  config: SriConfig,
  fetcher: Arc<dyn RemoteFetcher>,
}

impl SriInjector {
  /// Create an injector that downloads remote references with [`HttpFetcher`].
  pub fn new(config: SriConfig) -> Self {
    Self::with_fetcher(config, HttpFetcher::new())
  }

  /// Create an injector with a caller-supplied remote fetcher.
  pub fn with_fetcher(config: SriConfig, fetcher: impl RemoteFetcher + 'static) -> Self {
    Self {
      config,
      fetcher: Arc::new(fetcher),
    }
  }

  /// Active configuration.
  pub fn config(&self) -> &SriConfig {
    &self.config
  }

  /// Rewrite every `.html`/`.htm` output in place.
  ///
  /// Documents are processed in parallel against the unmodified output set. Nothing is
  /// written back unless every document succeeds.
  pub fn apply(&self, outputs: &mut OutputSet) -> SriResult<InjectionSummary> {
    let paths = outputs.html_paths();
    let snapshot: &OutputSet = outputs;

    let rewritten = paths
      .par_iter()
      .filter_map(|path| snapshot.get(path).map(|record| (path, record)))
      .map(|(path, record)| -> SriResult<(String, OutputRecord, InjectionSummary)> {
        let html = String::from_utf8_lossy(record.bytes());
        let (patched, summary) = self.process_document(path, &html, snapshot)?;
        let record = match record {
          // untouched documents keep their original bytes, invalid UTF-8 included
          _ if patched == html => record.clone(),
          OutputRecord::Code(_) => OutputRecord::Code(patched),
          OutputRecord::Asset(_) => {
            if let Cow::Owned(_) = html {
              tracing::warn!(document = path.as_str(), "document is not valid UTF-8, invalid sequences were replaced");
            }
            OutputRecord::Asset(patched.into_bytes())
          }
        };
        Ok((path.clone(), record, summary))
      })
      .collect::<SriResult<Vec<_>>>()?;

    let mut total = InjectionSummary::default();
    for (path, record, summary) in rewritten {
      outputs.insert(path, record);
      total += summary;
    }
    Ok(total)
  }

  /// Transform a single document stored at `document_path` in `outputs`.
  pub fn transform_document(
    &self,
    document_path: &str,
    html: &str,
    outputs: &OutputSet,
  ) -> SriResult<String> {
    self
      .process_document(document_path, html, outputs)
      .map(|(patched, _)| patched)
  }

  fn process_document(
    &self,
    document_path: &str,
    html: &str,
    outputs: &OutputSet,
  ) -> SriResult<(String, InjectionSummary)> {
    let resolver = AssetResolver::new(&self.config, outputs, self.fetcher.as_ref());
    let mut summary = InjectionSummary {
      documents: 1,
      ..Default::default()
    };

    // each pass is flushed before the next scan so offsets always refer to current text
    let mut document = html.to_string();
    for kind in TagKind::SCAN_ORDER {
      document = inject_pass(&resolver, document_path, &document, kind, &mut summary)?;
    }
    let document = strip_skip_markers(&document);

    tracing::info!(
      document = document_path,
      injected = summary.injected,
      skipped = summary.skipped,
      missing = summary.missing,
      "injected subresource integrity"
    );
    Ok((document, summary))
  }
}

fn inject_pass(
  resolver: &AssetResolver<'_>,
  document_path: &str,
  html: &str,
  kind: TagKind,
  summary: &mut InjectionSummary,
) -> SriResult<String> {
  let mut candidates: Vec<AssetReference> = Vec::new();
  for reference in find_asset_references(html, kind) {
    if has_skip_marker(&reference.raw) {
      tracing::debug!(document = document_path, url = %reference.url, "integrity skipped by marker");
      summary.skipped += 1;
    } else if has_integrity_attribute(&reference.raw) {
      tracing::debug!(document = document_path, url = %reference.url, "integrity already declared");
    } else {
      candidates.push(reference);
    }
  }

  let resolved = candidates
    .par_iter()
    .map(|reference| -> SriResult<Option<IntegrityEdit>> {
      let asset = resolver.resolve(document_path, &reference.url)?;
      Ok(asset.map(|asset| {
        tracing::debug!(url = %reference.url, source = ?asset.source, "resolved asset");
        IntegrityEdit::integrity(reference.insert_at, &compute_integrity(&asset.bytes))
      }))
    })
    .collect::<SriResult<Vec<_>>>()?;

  let edits: Vec<IntegrityEdit> = resolved.into_iter().flatten().collect();
  summary.missing += candidates.len() - edits.len();
  summary.injected += edits.len();
  Ok(apply_insertions(html, &edits))
}
