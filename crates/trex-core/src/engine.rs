use crate::concurrency::StoreLock;
use crate::config::TrexConfig;
use crate::fingerprint::fingerprint;
use crate::graph::{graph_location, ModuleProxy};
use crate::validate::{IntegrityReport, IntegrityValidator};
use crate::writer::{CommitResult, ManifestWriter, DEFAULT_WORKERS};
use crate::CoreError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use trex_remote::{ReadContent, SourceReader};
use trex_schema::{Manifest, ManifestStore};
use trex_store::{FileBackend, HashStore};

/// Entry point for manifest operations.
///
/// Owns the manifest store, the hash store, and the content reader; every
/// mutating call holds an exclusive lock next to the manifest.
pub struct Engine {
    manifests: ManifestStore,
    hashes: HashStore,
    reader: Box<dyn ReadContent>,
    workers: usize,
    lock_path: PathBuf,
}

impl Engine {
    pub fn new(
        manifests: ManifestStore,
        hashes: HashStore,
        reader: impl ReadContent + 'static,
    ) -> Self {
        let lock_path = lock_path_for(manifests.path());
        Self {
            manifests,
            hashes,
            reader: Box::new(reader),
            workers: DEFAULT_WORKERS,
            lock_path,
        }
    }

    /// Open the file-backed stores named in `config`.
    ///
    /// Plain relative paths in the manifest are read relative to the
    /// manifest's directory.
    pub fn from_config(config: &TrexConfig) -> Result<Self, CoreError> {
        let manifest_path = config.manifest_path();
        let backend = FileBackend::open(config.store_path())?;
        let hashes = HashStore::with_namespace(backend, &config.namespace);

        let mut reader = SourceReader::new();
        if let Some(dir) = manifest_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            reader = reader.with_base_dir(dir);
        }

        Ok(
            Self::new(ManifestStore::new(manifest_path), hashes, reader)
                .with_workers(config.workers),
        )
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn manifest_store(&self) -> &ManifestStore {
        &self.manifests
    }

    pub fn hash_store(&self) -> &HashStore {
        &self.hashes
    }

    pub fn reader(&self) -> &dyn ReadContent {
        self.reader.as_ref()
    }

    fn writer(&self) -> ManifestWriter<'_> {
        ManifestWriter::new(&self.hashes, self.reader.as_ref(), &self.manifests)
            .with_workers(self.workers)
    }

    fn validator(&self) -> IntegrityValidator<'_> {
        IntegrityValidator::new(&self.hashes, self.reader.as_ref())
    }

    fn lock(&self) -> Result<StoreLock, CoreError> {
        StoreLock::acquire(&self.lock_path)
    }

    /// Current manifest, empty when none has been written.
    pub fn list(&self) -> Result<Manifest, CoreError> {
        Ok(self.manifests.read()?.unwrap_or_default())
    }

    /// Replace the manifest with exactly `entries`.
    pub fn commit(&self, entries: &BTreeMap<String, String>) -> Result<CommitResult, CoreError> {
        let _lock = self.lock()?;
        self.writer().commit(entries)
    }

    /// Add or update entries, keeping everything else in the manifest.
    pub fn install(&self, entries: &BTreeMap<String, String>) -> Result<CommitResult, CoreError> {
        let _lock = self.lock()?;
        let mut merged = self.list()?.imports;
        for (name, location) in entries {
            if let Some(prev) = merged.insert(name.clone(), location.clone()) {
                if prev != *location {
                    info!("{name}: {prev} -> {location}");
                }
            }
        }
        self.writer().commit(&merged)
    }

    /// Drop packages from the manifest. Their fingerprints stay in the store.
    pub fn uninstall(&self, names: &[String]) -> Result<CommitResult, CoreError> {
        let _lock = self.lock()?;
        let mut manifest = self.list()?;
        for name in names {
            if manifest.remove(name).is_none() {
                return Err(CoreError::PackageNotFound(name.clone()));
            }
        }
        self.writer().commit(&manifest.imports)
    }

    /// Check one location against an expected digest.
    pub fn validate(&self, location: &str, expected: &str) -> Result<bool, CoreError> {
        self.validator().validate(location, expected)
    }

    /// Check every manifest entry against its recorded fingerprint.
    pub fn verify(&self) -> Result<IntegrityReport, CoreError> {
        let manifest = self.list()?;
        self.validator().verify_manifest(&manifest)
    }

    pub fn fingerprint(&self, location: &str) -> Result<String, CoreError> {
        fingerprint(self.reader.as_ref(), location)
    }

    /// Location to feed the dependency-graph builder for `name`.
    pub fn graph_location(
        &self,
        name: &str,
        proxy: &dyn ModuleProxy,
    ) -> Result<String, CoreError> {
        let manifest = self.list()?;
        graph_location(&manifest, name, proxy)
            .ok_or_else(|| CoreError::PackageNotFound(name.to_owned()))
    }
}

fn lock_path_for(manifest: &Path) -> PathBuf {
    let name = manifest
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("import_map.json");
    manifest.with_file_name(format!(".{name}.lock"))
}
