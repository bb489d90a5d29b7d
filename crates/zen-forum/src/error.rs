//! Forum error types

use zen_model::{ModelError, ThreadId};
use zen_ui::{FetchError, StorageError};

/// Forum failures
///
/// None of these reach the user as a blocking error; the session logs them
/// and degrades (empty state, session-only votes, ignored deep link).
#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    /// Thread document could not be fetched
    #[error("failed to load forum threads: {0}")]
    Fetch(#[from] FetchError),

    /// Thread document could not be decoded
    #[error("failed to decode forum threads: {0}")]
    Model(#[from] ModelError),

    /// Vote ledger could not be read or written
    #[error("vote ledger storage failed: {0}")]
    Storage(#[from] StorageError),

    /// No loaded thread has this id
    #[error("thread not found: {0}")]
    UnknownThread(ThreadId),

    /// Unrecognised sort mode
    #[error("invalid sort mode: '{0}'")]
    InvalidSortMode(String),
}

impl ForumError {
    /// Whether reloading might help
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_retryable(),
            _ => false,
        }
    }
}
