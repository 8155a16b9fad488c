//! Strong validators for conditional responses.

use sha2::{Digest, Sha256};

/// Compute the strong ETag for a served byte representation: the quoted
/// lower-case hex SHA-256 digest.
pub fn etag(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    format!("\"{}\"", hex::encode(digest))
}

/// True when an `If-None-Match` value matches `etag` exactly.
pub fn matches(if_none_match: &[u8], etag: &str) -> bool {
    if_none_match == etag.as_bytes()
}
