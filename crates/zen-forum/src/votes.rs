//! Vote ledger
//!
//! Which threads this browser has upvoted. Stored as a JSON object mapping
//! thread id to `true`; toggling off deletes the entry rather than storing
//! `false`. Storage failures are logged and the in-memory ledger stays
//! authoritative for the session.

use crate::error::ForumError;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use zen_model::{ThreadId, ThreadRecord};
use zen_ui::{read_json, write_json, StorageBackend};

/// Per-browser upvote flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteLedger {
    key: String,
    voted: BTreeSet<ThreadId>,
}

impl VoteLedger {
    /// Empty ledger persisted under `key`
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            voted: BTreeSet::new(),
        }
    }

    /// Load from storage, falling back to an empty ledger on any failure
    #[must_use]
    pub fn load<S: StorageBackend + ?Sized>(storage: &S, key: &str) -> Self {
        match Self::try_load(storage, key) {
            Ok(ledger) => ledger,
            Err(e) => {
                tracing::warn!("Unable to read forum votes: {e}");
                Self::new(key)
            }
        }
    }

    /// Load from storage
    ///
    /// Entries whose value is not `true` are ignored.
    ///
    /// # Errors
    /// Storage is unavailable or holds something other than a JSON object.
    pub fn try_load<S: StorageBackend + ?Sized>(storage: &S, key: &str) -> Result<Self, ForumError> {
        let stored: Option<Map<String, Value>> = read_json(storage, key)?;
        let voted = stored
            .into_iter()
            .flatten()
            .filter(|(_, v)| *v == Value::Bool(true))
            .map(|(id, _)| ThreadId::new(id))
            .collect();
        Ok(Self {
            key: key.to_owned(),
            voted,
        })
    }

    /// Storage key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether this browser upvoted `id`
    #[inline]
    #[must_use]
    pub fn has_voted(&self, id: &str) -> bool {
        self.voted.contains(id)
    }

    /// Number of flagged threads
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.voted.len()
    }

    /// Whether nothing is flagged
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.voted.is_empty()
    }

    /// Base upvotes plus this browser's vote
    #[inline]
    #[must_use]
    pub fn display_count(&self, thread: &ThreadRecord) -> u32 {
        thread
            .upvotes
            .saturating_add(u32::from(self.has_voted(thread.id.as_str())))
    }

    /// Flip the flag for `id` and persist the whole ledger.
    ///
    /// Returns the new flag. A persistence failure is logged; the flip still
    /// applies in memory.
    pub fn toggle<S: StorageBackend + ?Sized>(&mut self, id: &ThreadId, storage: &S) -> bool {
        let voted = self.flip(id);
        if let Err(e) = self.persist(storage) {
            tracing::warn!(thread_id = %id, "Unable to save forum votes: {e}");
        }
        voted
    }

    fn flip(&mut self, id: &ThreadId) -> bool {
        if self.voted.remove(id) {
            false
        } else {
            self.voted.insert(id.clone());
            true
        }
    }

    /// Write the ledger to storage
    ///
    /// # Errors
    /// Storage write failures.
    pub fn persist<S: StorageBackend + ?Sized>(&self, storage: &S) -> Result<(), ForumError> {
        write_json(storage, &self.key, &self.to_document())?;
        Ok(())
    }

    /// Stored representation
    #[must_use]
    pub fn to_document(&self) -> Map<String, Value> {
        self.voted
            .iter()
            .map(|id| (id.as_str().to_owned(), Value::Bool(true)))
            .collect()
    }
}
