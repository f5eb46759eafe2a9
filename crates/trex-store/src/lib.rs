//! Key-value persistence for trex bookkeeping and integrity fingerprints.
//!
//! This crate provides the storage layer: the `KvBackend` trait with a
//! JSON-file implementation (`FileBackend`, atomic writes and advisory
//! locking) and an in-memory one (`MemoryBackend`), plus `HashStore`, which
//! keeps one fingerprint per package under the reserved
//! `internal__<ns>__hash:` key prefix.

pub mod backend;
pub mod file;
pub mod hashes;

pub use backend::{KvBackend, MemoryBackend};
pub use file::FileBackend;
pub use hashes::{HashStore, DEFAULT_NAMESPACE};

use std::path::Path;
use thiserror::Error;

/// Fsync a directory to ensure that a preceding `rename()` is durable.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store file '{path}' is corrupt: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("lock acquisition failed: {0}")]
    LockFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display_corrupt() {
        let e = StoreError::Corrupt {
            path: "/tmp/storage.json".to_owned(),
            reason: "expected value".to_owned(),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/storage.json"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn store_error_display_lock_failed() {
        let e = StoreError::LockFailed("reason".to_owned());
        assert!(e.to_string().contains("reason"));
    }
}
