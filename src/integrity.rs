//! SHA-384 digests in Subresource Integrity notation.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha384};

const SRI_PREFIX: &str = "sha384-";

/// Digest `bytes` as `sha384-<base64>`.
pub fn compute_integrity(bytes: &[u8]) -> String {
  format!("{SRI_PREFIX}{}", STANDARD.encode(Sha384::digest(bytes)))
}

/// Check `bytes` against a previously computed `sha384-...` value.
///
/// Values using any other algorithm never verify.
pub fn verify_integrity(bytes: &[u8], sri: &str) -> bool {
  let sri = sri.trim();
  sri.starts_with(SRI_PREFIX) && compute_integrity(bytes) == sri
}
