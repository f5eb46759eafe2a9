use crate::http::HttpFetcher;
use crate::{Fetcher, ReadContent, RemoteError};
use std::path::PathBuf;
use trex_schema::{Location, LOCAL_SENTINEL};

/// Reads the content behind a manifest location.
///
/// - remote URLs go through the fetcher;
/// - working-tree references return [`LOCAL_SENTINEL`] without touching disk;
/// - other paths are read from disk, relative to `base_dir` when set.
///
/// Bytes that are not valid UTF-8 decode to U+FFFD rather than failing.
pub struct SourceReader {
    fetcher: Box<dyn Fetcher>,
    base_dir: Option<PathBuf>,
}

impl SourceReader {
    pub fn new() -> Self {
        Self::with_fetcher(HttpFetcher::new())
    }

    pub fn with_fetcher(fetcher: impl Fetcher + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            base_dir: None,
        }
    }

    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}

impl Default for SourceReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadContent for SourceReader {
    fn read_content(&self, location: &str) -> Result<String, RemoteError> {
        match Location::classify(location) {
            Location::Remote(url) => {
                let body = self.fetcher.fetch(url)?;
                Ok(String::from_utf8_lossy(&body).into_owned())
            }
            Location::Local(_) => Ok(LOCAL_SENTINEL.to_owned()),
            Location::File(path) => {
                let full = match &self.base_dir {
                    Some(dir) => dir.join(path),
                    None => PathBuf::from(path),
                };
                let bytes = std::fs::read(&full).map_err(|source| RemoteError::Io {
                    path: full.display().to_string(),
                    source,
                })?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
        }
    }
}
