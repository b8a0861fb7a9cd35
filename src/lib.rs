#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod error;
pub mod fetch;
pub mod html;
pub mod injector;
pub mod integrity;
pub mod models;
pub mod resolver;

pub use config::{BasePath, SriConfig};
pub use error::{SriError, SriResult};
pub use fetch::{HttpFetcher, RemoteFetcher};
pub use html::{SKIP_MARKER, apply_insertions, find_asset_references, has_skip_marker, strip_skip_markers};
pub use injector::SriInjector;
pub use integrity::{compute_integrity, verify_integrity};
pub use models::{
  AssetReference, InjectionSummary, IntegrityEdit, OutputRecord, OutputSet, TagKind,
};
pub use resolver::{AssetResolver, AssetSource, ResolvedAsset};
