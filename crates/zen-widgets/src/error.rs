//! Widget error types

use zen_model::ModelError;
use zen_ui::{FetchError, StorageError};

/// Widget failures
///
/// Widgets log these and fall back to an empty or default state.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    /// Document could not be fetched
    #[error("failed to load widget document: {0}")]
    Fetch(#[from] FetchError),

    /// Document fetched but not in the expected shape
    #[error("widget document is malformed: {0}")]
    Document(#[from] ModelError),

    /// Local storage could not be read or written
    #[error("widget storage failed: {0}")]
    Storage(#[from] StorageError),

    /// Product id not configured
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// Unrecognised events filter
    #[error("invalid events filter: '{0}'")]
    InvalidFilter(String),
}

impl WidgetError {
    /// Whether reloading might help
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_retryable(),
            _ => false,
        }
    }
}
