//! Persisted storage seam for the cart.
//!
//! The store depends on the [`CartStorage`] capability rather than on any
//! concrete backend. A snapshot is one named entry holding the serialized
//! cart:
//!
//! ```json
//! {"state": {"items": [...], "isOpen": false}, "version": 0}
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::CartState;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Errors that can occur when reading or writing a cart snapshot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be (de)serialized.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot was written by a newer format.
    #[error("unsupported snapshot version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Serialized form of a cart, as written to persisted storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub state: CartState,
    #[serde(default)]
    pub version: u32,
}

impl CartSnapshot {
    /// Snapshot the given state at the current format version.
    #[must_use]
    pub fn new(state: CartState) -> Self {
        Self {
            state,
            version: SNAPSHOT_VERSION,
        }
    }

    /// Parse a snapshot from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Render the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if serialization fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Unwrap the cart state, rejecting snapshots from a newer format.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::UnsupportedVersion` if `version` is newer than
    /// [`SNAPSHOT_VERSION`].
    pub fn into_state(self) -> Result<CartState, StorageError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(self.state)
    }
}

/// Durable key-value slot holding one cart snapshot.
///
/// `load` is called once at startup; `save` after every mutation. Both are
/// synchronous. Implementations must not panic on failure.
pub trait CartStorage {
    /// Read the stored snapshot, `Ok(None)` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError>;
}

impl<T: CartStorage + ?Sized> CartStorage for &T {
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }
}

impl<T: CartStorage + ?Sized> CartStorage for Arc<T> {
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }
}

impl<T: CartStorage + ?Sized> CartStorage for Box<T> {
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage slot.
///
/// Clones share the same slot, so a test can keep one handle, hand another to
/// a store, and later build a second store from the same data to simulate a
/// reload. Snapshots are kept as JSON text so the serialization round-trip is
/// exercised exactly as with a durable backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryStorageInner>>,
}

#[derive(Debug, Default)]
struct MemoryStorageInner {
    raw: Option<String>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStorage {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-filled with raw snapshot text.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.lock().raw = Some(raw.into());
        storage
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Raw snapshot text currently stored.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.lock().raw.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStorageInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        self.lock()
            .raw
            .as_deref()
            .map(CartSnapshot::from_json)
            .transpose()
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        let raw = snapshot.to_json()?;
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        inner.raw = Some(raw);
        inner.writes += 1;
        Ok(())
    }
}
