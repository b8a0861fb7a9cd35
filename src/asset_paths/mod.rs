//! Helpers for mapping document references onto bundle outputs and static files.
//!
//! The responsibilities are split so that remote detection, bundle-key normalisation and
//! the traversal-safe static lookup can each be tested on their own.

mod bundle;
mod filters;
mod static_dir;

pub use bundle::{bundle_key, normalize_posix};
pub use filters::{is_remote_url, remote_fetch_url};
pub use static_dir::{resolve_static_path, strip_query_and_fragment};
