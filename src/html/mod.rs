//! Markup scanning and patching for integrity injection.

mod patcher;
mod scanner;
mod skip;

pub use patcher::apply_insertions;
pub use scanner::{find_asset_references, has_integrity_attribute};
pub use skip::{SKIP_MARKER, has_skip_marker, strip_skip_markers};
