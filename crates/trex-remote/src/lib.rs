//! Source content reading for trex fingerprints.
//!
//! This crate turns a manifest location into text: remote URLs are fetched
//! over HTTP through a pluggable `Fetcher` (`HttpFetcher` by default), plain
//! paths are read from disk, and working-tree references short-circuit to
//! the fixed local sentinel.

pub mod http;
pub mod reader;

pub use http::HttpFetcher;
pub use reader::SourceReader;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Transport used for remote locations.
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the raw response body.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, RemoteError>;
}

/// Anything that can produce the text of a manifest location.
pub trait ReadContent: Send + Sync {
    fn read_content(&self, location: &str) -> Result<String, RemoteError>;
}
