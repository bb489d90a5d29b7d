//! Document fetch seam
//!
//! The site reads a handful of static JSON documents. Transport is the host's
//! concern; this module defines the seam, its error type, and the generation
//! counter used to discard responses that a newer load has superseded.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Document fetch failures
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Non-success HTTP status
    #[error("GET {path} returned status {status}")]
    Status {
        /// Requested path
        path: String,
        /// HTTP status
        status: u16,
    },

    /// Network or host failure
    #[error("GET {path} failed: {message}")]
    Transport {
        /// Requested path
        path: String,
        /// Host-provided description
        message: String,
    },

    /// Body is not JSON
    #[error("GET {path} returned invalid JSON: {source}")]
    Decode {
        /// Requested path
        path: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Path of the failed request
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Status { path, .. } | Self::Transport { path, .. } | Self::Decode { path, .. } => {
                path
            }
        }
    }

    /// Whether retrying might succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Transport { .. } => true,
            Self::Decode { .. } => false,
        }
    }
}

/// Fetches JSON documents by path (`GET`, `cache: no-store`)
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch and decode the document at `path`
    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError>;
}

#[async_trait]
impl<T: DocumentSource + ?Sized> DocumentSource for Arc<T> {
    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        (**self).fetch_json(path).await
    }
}

/// Proof that a load was started; compare with [`GenerationCounter::is_current`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    /// Generation number
    #[inline]
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Monotonic load generation
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: AtomicU64,
}

impl GenerationCounter {
    /// Fresh counter
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load, superseding all earlier tickets
    #[inline]
    pub fn next(&self) -> LoadTicket {
        LoadTicket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` belongs to the latest load
    #[inline]
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}

enum Canned {
    Document(Value),
    Status(u16),
    Transport(String),
}

/// In-memory document source for tests and prerendering
#[derive(Default)]
pub struct StaticDocuments {
    documents: RwLock<HashMap<String, Canned>>,
}

impl std::fmt::Debug for StaticDocuments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticDocuments")
            .field("paths", &self.documents.read().keys().cloned().collect::<Vec<_>>())
            .finish()
    }
}

impl StaticDocuments {
    /// Empty source; every path is a 404
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` at `path`
    #[must_use]
    pub fn with_document(self, path: impl Into<String>, document: Value) -> Self {
        self.insert(path, document);
        self
    }

    /// Serve or replace `document` at `path`
    pub fn insert(&self, path: impl Into<String>, document: Value) {
        self.documents
            .write()
            .insert(path.into(), Canned::Document(document));
    }

    /// Answer `path` with an HTTP error status
    pub fn fail_with_status(&self, path: impl Into<String>, status: u16) {
        self.documents
            .write()
            .insert(path.into(), Canned::Status(status));
    }

    /// Answer `path` with a transport failure
    pub fn fail_with_transport(&self, path: impl Into<String>, message: impl Into<String>) {
        self.documents
            .write()
            .insert(path.into(), Canned::Transport(message.into()));
    }
}

#[async_trait]
impl DocumentSource for StaticDocuments {
    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        match self.documents.read().get(path) {
            Some(Canned::Document(value)) => Ok(value.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                path: path.to_owned(),
                status: *status,
            }),
            Some(Canned::Transport(message)) => Err(FetchError::Transport {
                path: path.to_owned(),
                message: message.clone(),
            }),
            None => Err(FetchError::Status {
                path: path.to_owned(),
                status: 404,
            }),
        }
    }
}
