//! Core integrity engine for trex.
//!
//! This crate ties the schema, store, and content reader together: SHA-256
//! fingerprints over content plus location (`fingerprint`), the
//! `IntegrityValidator` with its hash-history bootstrap rule, the
//! `ManifestWriter` that records fingerprints before rewriting the manifest,
//! and the `Engine` facade used by the CLI for install, uninstall, verify, and
//! dependency-graph location lookups.

pub mod concurrency;
pub mod config;
pub mod engine;
pub mod fingerprint;
pub mod graph;
pub mod validate;
pub mod writer;

pub use concurrency::StoreLock;
pub use config::{expand_tilde, TrexConfig};
pub use engine::Engine;
pub use fingerprint::{digest, fingerprint};
pub use graph::{
    graph_location, is_std_module, ModuleProxy, NoProxy, ProxyTable, STD_MODULES,
};
pub use validate::{IntegrityFailure, IntegrityReport, IntegrityValidator};
pub use writer::{CommitResult, ManifestWriter, DEFAULT_WORKERS};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("read failure: {0}")]
    Read(#[from] trex_remote::RemoteError),
    #[error("manifest error: {0}")]
    Manifest(#[from] trex_schema::ManifestError),
    #[error("store error: {0}")]
    Store(#[from] trex_store::StoreError),
    #[error("package not found in manifest: {0}")]
    PackageNotFound(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("store lock: {0}")]
    Lock(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fingerprint worker panicked")]
    WorkerPanicked,
}
