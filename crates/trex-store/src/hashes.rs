use crate::backend::KvBackend;
use crate::StoreError;
use std::collections::BTreeMap;

pub const DEFAULT_NAMESPACE: &str = "trex";

/// Fingerprint records layered over a shared key-value backend.
///
/// Keys are `internal__<ns>__hash:<package>`; anything else the backend
/// holds is ignored.
pub struct HashStore {
    backend: Box<dyn KvBackend>,
    prefix: String,
}

impl HashStore {
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self::with_namespace(backend, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(backend: impl KvBackend + 'static, namespace: &str) -> Self {
        Self {
            backend: Box::new(backend),
            prefix: format!("internal__{namespace}__hash:"),
        }
    }

    /// The reserved prefix shared by every fingerprint key.
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    pub fn key_for(&self, package: &str) -> String {
        format!("{}{package}", self.prefix)
    }

    pub fn backend(&self) -> &dyn KvBackend {
        self.backend.as_ref()
    }

    pub fn get_hash(&self, package: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(&self.key_for(package))
    }

    pub fn set_hash(&self, package: &str, digest: &str) -> Result<(), StoreError> {
        self.backend.set(&self.key_for(package), digest)
    }

    /// Whether any fingerprint has ever been recorded in this namespace.
    pub fn has_any_hash(&self) -> Result<bool, StoreError> {
        Ok(!self.backend.scan_prefix(&self.prefix)?.is_empty())
    }

    /// Package name to digest for every recorded fingerprint.
    pub fn hashes(&self) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(self
            .backend
            .scan_prefix(&self.prefix)?
            .into_iter()
            .filter_map(|(k, v)| k.strip_prefix(&self.prefix).map(|name| (name.to_owned(), v)))
            .collect())
    }
}

impl std::fmt::Debug for HashStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
