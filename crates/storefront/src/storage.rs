//! File-backed cart persistence.
//!
//! Each storage key maps to `<dir>/<key>.json` holding one
//! [`CartSnapshot`]. Writes go to a sibling temp file that is then renamed
//! over the target, so a crash mid-write never leaves a truncated snapshot.

use std::io;
use std::path::{Path, PathBuf};

use atelier_core::cart::{CartSnapshot, CartStorage, StorageError};
use tracing::debug;

use crate::config::CartStorageConfig;

/// Cart storage slot backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage slot `key` inside `dir`. The directory is created on first save.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// Storage slot described by configuration.
    #[must_use]
    pub fn from_config(config: &CartStorageConfig) -> Self {
        Self::new(&config.dir, &config.key)
    }

    /// File holding the snapshot.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No saved cart");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        CartSnapshot::from_json(&raw).map(Some)
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }

        let temp = self.temp_path();
        std::fs::write(&temp, snapshot.to_json()?)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
