use crate::CoreError;
use sha2::{Digest, Sha256};
use trex_remote::ReadContent;

/// SHA-256 over `content` followed by `location`, as lowercase hex.
///
/// Mixing the location in keeps two packages with identical content (or two
/// local entries sharing the sentinel) from colliding.
pub fn digest(content: &str, location: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(location.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Read `location` through `reader` and fingerprint it.
pub fn fingerprint(reader: &dyn ReadContent, location: &str) -> Result<String, CoreError> {
    let content = reader.read_content(location)?;
    Ok(digest(&content, location))
}
