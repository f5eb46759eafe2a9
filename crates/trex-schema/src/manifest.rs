use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const DEFAULT_MANIFEST_FILE: &str = "import_map.json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("the {path} file does not have a valid format: {reason}")]
    Format { path: String, reason: String },
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The import map: package name to location.
///
/// `imports` is a `BTreeMap`, so serialization always emits keys in
/// lexicographic order no matter how entries were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub imports: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            imports: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.imports.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, location: impl Into<String>) {
        self.imports.insert(name.into(), location.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.imports.remove(name)
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    /// Canonical on-disk form: 2-space indentation, sorted keys, trailing newline.
    pub fn to_canonical_json(&self) -> Result<String, ManifestError> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}

/// Reads and rewrites the manifest file.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Returns `Ok(None)` when no manifest has been written yet.
    pub fn read(&self) -> Result<Option<Manifest>, ManifestError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ManifestError::Io(e)),
        };
        let manifest =
            serde_json::from_str::<Manifest>(&content).map_err(|e| ManifestError::Format {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Some(manifest))
    }

    /// Replace the manifest file with the canonical form of `manifest`.
    pub fn write(&self, manifest: &Manifest) -> Result<(), ManifestError> {
        let content = manifest.to_canonical_json()?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| ManifestError::Io(e.error))?;
        // Fsync parent directory to ensure rename durability on power loss.
        if let Ok(f) = fs::File::open(dir) {
            let _ = f.sync_all();
        }
        tracing::debug!(
            "wrote {} ({} imports)",
            self.path.display(),
            manifest.len()
        );
        Ok(())
    }
}
