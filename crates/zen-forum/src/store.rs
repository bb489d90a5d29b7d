//! Thread store
//!
//! Threads in load order with id lookup. Built once per load; a reload
//! replaces the whole store so lookups never see stale records.

use crate::error::ForumError;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::Value;
use zen_model::{parse_thread_document, ThreadId, ThreadRecord};

/// Loaded forum threads
#[derive(Debug, Clone, Default)]
pub struct ThreadStore {
    threads: IndexMap<ThreadId, ThreadRecord>,
}

impl ThreadStore {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records; a repeated id keeps the first record
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ThreadRecord>) -> Self {
        let mut threads = IndexMap::new();
        for record in records {
            match threads.entry(record.id.clone()) {
                Entry::Occupied(_) => {
                    tracing::warn!(thread_id = %record.id, "Duplicate thread id; keeping first record");
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }
        Self { threads }
    }

    /// Build from the decoded forum document
    #[must_use]
    pub fn from_document(document: Value) -> Self {
        Self::from_records(parse_thread_document(document))
    }

    /// Build from raw JSON text
    ///
    /// # Errors
    /// [`ForumError::Model`] when the text is not JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ForumError> {
        let records = zen_model::parse_thread_document_str(text)?;
        Ok(Self::from_records(records))
    }

    /// Number of threads
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Whether no threads are loaded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Thread by id
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ThreadRecord> {
        self.threads.get(id)
    }

    /// Whether a thread with `id` is loaded
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.threads.contains_key(id)
    }

    /// Threads in load order
    pub fn iter(&self) -> impl Iterator<Item = &ThreadRecord> {
        self.threads.values()
    }

    /// Whether any thread belongs to `category`
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        !category.is_empty() && self.iter().any(|t| t.category == category)
    }

    /// Distinct non-empty categories, sorted case-insensitively
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for thread in self.iter() {
            if !thread.category.is_empty() && !categories.contains(&thread.category) {
                categories.push(thread.category.clone());
            }
        }
        categories.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        categories
    }
}

impl<'a> IntoIterator for &'a ThreadStore {
    type Item = &'a ThreadRecord;
    type IntoIter = indexmap::map::Values<'a, ThreadId, ThreadRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.threads.values()
    }
}
