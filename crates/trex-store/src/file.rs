use crate::backend::KvBackend;
use crate::{fsync_dir, StoreError};
use fs2::FileExt;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Key-value store persisted as a single JSON object file.
///
/// Every `set` is a full read-modify-write of the file, serialized by an
/// in-process mutex and an advisory lock on a sibling `.lock` file, and
/// committed with an atomic rename.
///
/// The file may hold bookkeeping written by other tools. Non-string values
/// are carried through rewrites untouched but are not visible as entries.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    lock_path: PathBuf,
    write_guard: Mutex<()>,
}

struct FileLock(File);

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.0.unlock();
    }
}

impl FileBackend {
    /// Open (or prepare to create) the store at `path`.
    ///
    /// An existing file is parsed eagerly so a corrupt store is reported
    /// before anything is written to it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path: PathBuf = path.into();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("storage.json");
        let lock_path = path.with_file_name(format!(".{file_name}.lock"));

        let backend = Self {
            path,
            lock_path,
            write_guard: Mutex::new(()),
        };
        if let Some(dir) = backend.parent_dir() {
            fs::create_dir_all(dir)?;
        }
        let entries = backend.load_raw()?;
        tracing::debug!(
            "opened store {} ({} entries)",
            backend.path.display(),
            entries.len()
        );
        Ok(backend)
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn load_raw(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(self
            .load_raw()?
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect())
    }

    fn persist(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(entries)?;
        let dir = self.parent_dir().unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;
        fsync_dir(dir)?;
        Ok(())
    }

    fn lock_file(&self) -> Result<FileLock, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)?;
        file.lock_exclusive()
            .map_err(|e| StoreError::LockFailed(format!("{}: {e}", self.lock_path.display())))?;
        Ok(FileLock(file))
    }
}

impl KvBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(match self.load_raw()?.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self
            .write_guard
            .lock()
            .map_err(|e| StoreError::LockFailed(e.to_string()))?;
        let _lock = self.lock_file()?;

        let mut entries = self.load_raw()?;
        if entries.get(key).and_then(Value::as_str) == Some(value) {
            return Ok(());
        }
        entries.insert(key.to_owned(), Value::String(value.to_owned()));
        self.persist(&entries)?;
        tracing::trace!("set {key} in {}", self.path.display());
        Ok(())
    }

    fn list_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        self.load()
    }
}
