use crate::fingerprint::fingerprint;
use crate::CoreError;
use serde::Serialize;
use trex_remote::ReadContent;
use trex_schema::Manifest;
use trex_store::HashStore;

#[derive(Debug, Default, Serialize)]
pub struct IntegrityReport {
    pub checked: usize,
    pub passed: usize,
    /// Entries with no recorded fingerprint. Not a failure.
    pub unrecorded: Vec<String>,
    pub failed: Vec<IntegrityFailure>,
    /// True when the store had no hash history and nothing was recomputed.
    pub bootstrap: bool,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct IntegrityFailure {
    pub package: String,
    pub location: String,
    pub reason: String,
}

/// Decides whether recorded sources are still unmodified.
pub struct IntegrityValidator<'a> {
    hashes: &'a HashStore,
    reader: &'a dyn ReadContent,
}

impl<'a> IntegrityValidator<'a> {
    pub fn new(hashes: &'a HashStore, reader: &'a dyn ReadContent) -> Self {
        Self { hashes, reader }
    }

    /// Check `location` against `expected`.
    ///
    /// A store with no fingerprints at all predates hashing: everything
    /// validates. Otherwise the fingerprint is recomputed and compared.
    pub fn validate(&self, location: &str, expected: &str) -> Result<bool, CoreError> {
        if !self.hashes.has_any_hash()? {
            tracing::debug!("no hash history; accepting {location}");
            return Ok(true);
        }
        let actual = fingerprint(self.reader, location)?;
        Ok(actual == expected)
    }

    /// Validate every manifest entry against its recorded fingerprint.
    ///
    /// Read failures are reported per entry rather than aborting the scan.
    pub fn verify_manifest(&self, manifest: &Manifest) -> Result<IntegrityReport, CoreError> {
        let mut report = IntegrityReport {
            checked: manifest.len(),
            ..Default::default()
        };

        if !self.hashes.has_any_hash()? {
            report.passed = manifest.len();
            report.bootstrap = true;
            return Ok(report);
        }

        let recorded = self.hashes.hashes()?;
        for (name, location) in &manifest.imports {
            let Some(expected) = recorded.get(name) else {
                report.unrecorded.push(name.clone());
                continue;
            };
            match fingerprint(self.reader, location) {
                Ok(actual) if actual == *expected => report.passed += 1,
                Ok(actual) => {
                    tracing::warn!("fingerprint mismatch for {name}");
                    report.failed.push(IntegrityFailure {
                        package: name.clone(),
                        location: location.clone(),
                        reason: format!("fingerprint mismatch: expected {expected}, got {actual}"),
                    });
                }
                Err(e) => {
                    report.failed.push(IntegrityFailure {
                        package: name.clone(),
                        location: location.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}
