//! Local storage seam
//!
//! Browsers can refuse storage at any time (private mode, quota, disabled
//! cookies). Every operation therefore returns a [`StorageError`] that callers
//! log and absorb, keeping their in-memory state authoritative for the session.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Storage failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Storage is disabled or absent in this environment
    #[error("storage unavailable")]
    Unavailable,

    /// Write rejected for lack of space
    #[error("storage quota exceeded writing '{key}'")]
    QuotaExceeded {
        /// Key being written
        key: String,
    },

    /// Stored text is not the expected JSON
    #[error("stored value under '{key}' is malformed: {source}")]
    Malformed {
        /// Key being read
        key: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be encoded
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        /// Key being written
        key: String,
        /// Encoder error
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Whether this is a quota failure
    #[inline]
    #[must_use]
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// Key/value string storage (browser `localStorage` semantics)
pub trait StorageBackend: Send + Sync {
    /// Read `key`
    ///
    /// # Errors
    /// [`StorageError::Unavailable`] when storage cannot be accessed.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `key`
    ///
    /// # Errors
    /// Unavailable storage or quota exhaustion.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`
    ///
    /// # Errors
    /// [`StorageError::Unavailable`] when storage cannot be accessed.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    #[inline]
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    #[inline]
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    #[inline]
    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Read and decode a JSON value
///
/// # Errors
/// Backend failures, or [`StorageError::Malformed`] when the text is not `T`.
pub fn read_json<T, S>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: StorageBackend + ?Sized,
{
    let Some(text) = storage.get_item(key)? else {
        return Ok(None);
    };
    if text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StorageError::Malformed {
            key: key.to_owned(),
            source,
        })
}

/// Encode and write a JSON value
///
/// # Errors
/// Encoding or backend failures.
pub fn write_json<T, S>(storage: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: StorageBackend + ?Sized,
{
    let text = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_owned(),
        source,
    })?;
    storage.set_item(key, &text)
}

/// Failure simulation for [`MemoryStorage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// Reads and writes succeed
    #[default]
    Available,
    /// Reads succeed, writes fail with quota errors
    Full,
    /// Every operation fails
    Disabled,
}

/// In-memory storage for tests and non-browser hosts
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    mode: Mutex<StorageMode>,
}

impl MemoryStorage {
    /// Empty, available storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with entries
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let storage = Self::new();
        storage
            .entries
            .lock()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        storage
    }

    /// Switch failure mode
    #[inline]
    pub fn set_mode(&self, mode: StorageMode) {
        *self.mode.lock() = mode;
    }

    /// Raw stored text, bypassing the failure mode
    #[inline]
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    /// Drop everything (user clearing site data)
    #[inline]
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if *self.mode.lock() == StorageMode::Disabled {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match *self.mode.lock() {
            StorageMode::Disabled => Err(StorageError::Unavailable),
            StorageMode::Full => Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
            }),
            StorageMode::Available => {
                self.entries.lock().insert(key.to_owned(), value.to_owned());
                Ok(())
            }
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if *self.mode.lock() == StorageMode::Disabled {
            return Err(StorageError::Unavailable);
        }
        self.entries.lock().remove(key);
        Ok(())
    }
}
