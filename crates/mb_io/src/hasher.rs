//! SHA-256 digests of loaded documents (lowercase hex).
//!
//! Digests are taken over the raw bytes as read, so the footer of a report
//! identifies exactly which artifact versions were rendered.

use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// First `n` chars of a digest (for compact display). Never splits a char.
pub fn short_hex(hex64: &str, n: usize) -> &str {
    match hex64.char_indices().nth(n) {
        Some((end, _)) => &hex64[..end],
        None => hex64,
    }
}
