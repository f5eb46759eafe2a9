use crate::writer::DEFAULT_WORKERS;
use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use trex_schema::DEFAULT_MANIFEST_FILE;
use trex_store::DEFAULT_NAMESPACE;

/// User configuration, stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrexConfig {
    /// Import map path, relative to the working directory.
    pub manifest: String,
    /// Key-value store file holding fingerprints. `~/` is expanded.
    pub store: String,
    /// Namespace in `internal__<ns>__hash:` keys.
    pub namespace: String,
    /// Fingerprint worker count for commits.
    pub workers: usize,
    /// Standard module entry points used by `locate` instead of `<dir>mod.ts`.
    pub proxies: BTreeMap<String, String>,
}

impl Default for TrexConfig {
    fn default() -> Self {
        Self {
            manifest: DEFAULT_MANIFEST_FILE.to_owned(),
            store: "~/.local/share/trex/storage.json".to_owned(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            workers: DEFAULT_WORKERS,
            proxies: BTreeMap::new(),
        }
    }
}

impl TrexConfig {
    /// Load `~/.config/trex/config.json`, or defaults when it does not exist.
    pub fn load_default() -> Result<Self, CoreError> {
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!("invalid config {}: {e}", path.display()))
        })?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn manifest_path(&self) -> PathBuf {
        expand_tilde(&self.manifest)
    }

    pub fn store_path(&self) -> PathBuf {
        expand_tilde(&self.store)
    }
}

fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/trex/config.json"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
