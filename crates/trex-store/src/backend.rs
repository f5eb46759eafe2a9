use crate::StoreError;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Trait for key-value storage backends.
///
/// Implementations must tolerate concurrent `set` calls on distinct keys
/// without losing writes.
pub trait KvBackend: Send + Sync {
    /// Fetch a single value.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or replace a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Snapshot of every entry, sorted by key.
    fn list_all(&self) -> Result<BTreeMap<String, String>, StoreError>;

    /// Entries whose key starts with `prefix`.
    fn scan_prefix(&self, prefix: &str) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect())
    }
}

/// Volatile backend, mostly for tests and embedders that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::LockFailed(e.to_string()))
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn list_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(self.entries()?.clone())
    }

    fn scan_prefix(&self, prefix: &str) -> Result<BTreeMap<String, String>, StoreError> {
        let entries = self.entries()?;
        Ok(entries
            .range(prefix.to_owned()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
