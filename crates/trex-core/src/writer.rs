use crate::fingerprint::fingerprint;
use crate::CoreError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use trex_remote::ReadContent;
use trex_schema::{Manifest, ManifestStore};
use trex_store::HashStore;

pub const DEFAULT_WORKERS: usize = 4;

/// Outcome of a successful commit.
#[derive(Debug, Clone)]
pub struct CommitResult {
    pub manifest: Manifest,
    /// Package name to the digest recorded for it.
    pub fingerprints: BTreeMap<String, String>,
}

/// Records fingerprints for a set of entries, then persists the manifest.
pub struct ManifestWriter<'a> {
    hashes: &'a HashStore,
    reader: &'a dyn ReadContent,
    manifests: &'a ManifestStore,
    workers: usize,
}

impl<'a> ManifestWriter<'a> {
    pub fn new(
        hashes: &'a HashStore,
        reader: &'a dyn ReadContent,
        manifests: &'a ManifestStore,
    ) -> Self {
        Self {
            hashes,
            reader,
            manifests,
            workers: DEFAULT_WORKERS,
        }
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Fingerprint every entry, store the hashes, then rewrite the manifest.
    ///
    /// Fingerprints are computed on a fixed-size scoped worker group and each
    /// hash is written as soon as it is known. The manifest is written only
    /// after every worker has joined without error; a failure leaves the
    /// manifest untouched (hashes already written are kept).
    pub fn commit(&self, entries: &BTreeMap<String, String>) -> Result<CommitResult, CoreError> {
        let fingerprints = self.record_fingerprints(entries)?;

        let manifest = Manifest {
            imports: entries.clone(),
        };
        self.manifests.write(&manifest)?;
        tracing::info!(
            "committed {} imports to {}",
            manifest.len(),
            self.manifests.path().display()
        );

        Ok(CommitResult {
            manifest,
            fingerprints,
        })
    }

    fn record_fingerprints(
        &self,
        entries: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, CoreError> {
        if entries.is_empty() {
            return Ok(BTreeMap::new());
        }

        let pairs: Vec<(&String, &String)> = entries.iter().collect();
        let chunk_size = pairs.len().div_ceil(self.workers);
        let abort = AtomicBool::new(false);

        let results: Vec<Result<Vec<(String, String)>, CoreError>> = std::thread::scope(|s| {
            let handles: Vec<_> = pairs
                .chunks(chunk_size)
                .map(|chunk| {
                    let abort = &abort;
                    s.spawn(move || self.fingerprint_chunk(chunk, abort))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(Err(CoreError::WorkerPanicked)))
                .collect()
        });

        let mut fingerprints = BTreeMap::new();
        for result in results {
            fingerprints.extend(result?);
        }
        Ok(fingerprints)
    }

    fn fingerprint_chunk(
        &self,
        chunk: &[(&String, &String)],
        abort: &AtomicBool,
    ) -> Result<Vec<(String, String)>, CoreError> {
        let mut out = Vec::with_capacity(chunk.len());
        for (name, location) in chunk {
            if abort.load(Ordering::SeqCst) {
                break;
            }
            let outcome = fingerprint(self.reader, location).and_then(|digest| {
                self.hashes.set_hash(name, &digest)?;
                Ok(digest)
            });
            match outcome {
                Ok(digest) => {
                    tracing::debug!("{name}: {digest}");
                    out.push(((*name).clone(), digest));
                }
                Err(e) => {
                    tracing::warn!("fingerprint failed for {name} ({location}): {e}");
                    abort.store(true, Ordering::SeqCst);
                    return Err(e);
                }
            }
        }
        Ok(out)
    }
}
