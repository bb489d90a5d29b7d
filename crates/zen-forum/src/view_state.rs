//! Forum view-state
//!
//! What the reader has selected: category, sort, search text and the thread
//! they deep-linked to. The session mirrors it into the URL after every
//! pipeline run.

use crate::error::ForumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zen_model::ThreadId;

/// Category sentinel meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// Thread list ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Composite score of votes, replies, answered and recency
    #[default]
    Trending,
    /// Newest first by creation time
    Newest,
    /// Unanswered threads only, newest first
    Unanswered,
}

impl SortMode {
    /// All modes in selector order
    pub const ALL: [SortMode; 3] = [Self::Trending, Self::Newest, Self::Unanswered];

    /// URL / selector value
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Newest => "newest",
            Self::Unanswered => "unanswered",
        }
    }

    /// Whether this is the default (omitted from the URL)
    #[inline]
    #[must_use]
    pub fn is_default(self) -> bool {
        self == Self::default()
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ForumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trending" => Ok(Self::Trending),
            "newest" => Ok(Self::Newest),
            "unanswered" => Ok(Self::Unanswered),
            other => Err(ForumError::InvalidSortMode(other.to_owned())),
        }
    }
}

/// Current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    active_category: String,
    sort_mode: SortMode,
    search_raw: String,
    search_term: String,
    focused_thread: Option<ThreadId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_category: ALL_CATEGORIES.to_owned(),
            sort_mode: SortMode::default(),
            search_raw: String::new(),
            search_term: String::new(),
            focused_thread: None,
        }
    }
}

impl ViewState {
    /// Unfiltered, trending, no search
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With category
    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        self.set_category(category);
        self
    }

    /// With sort mode
    #[inline]
    #[must_use]
    pub fn with_sort(mut self, mode: SortMode) -> Self {
        self.sort_mode = mode;
        self
    }

    /// With search text
    #[must_use]
    pub fn with_search(mut self, raw: &str) -> Self {
        self.set_search(raw);
        self
    }

    /// Active category, [`ALL_CATEGORIES`] when unfiltered
    #[inline]
    #[must_use]
    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    /// Category filter, `None` when unfiltered
    #[inline]
    #[must_use]
    pub fn category_filter(&self) -> Option<&str> {
        (self.active_category != ALL_CATEGORIES).then_some(self.active_category.as_str())
    }

    /// Sort mode
    #[inline]
    #[must_use]
    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    /// Search text as typed
    #[inline]
    #[must_use]
    pub fn search_raw(&self) -> &str {
        &self.search_raw
    }

    /// Trimmed, lower-cased search text
    #[inline]
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Deep-linked thread
    #[inline]
    #[must_use]
    pub fn focused_thread(&self) -> Option<&ThreadId> {
        self.focused_thread.as_ref()
    }

    /// Select a category; blank or the sentinel clears the filter
    pub fn set_category(&mut self, category: &str) {
        let category = category.trim();
        self.active_category = if category.is_empty() {
            ALL_CATEGORIES.to_owned()
        } else {
            category.to_owned()
        };
    }

    /// Select a sort mode
    #[inline]
    pub fn set_sort(&mut self, mode: SortMode) {
        self.sort_mode = mode;
    }

    /// Replace the search text
    pub fn set_search(&mut self, raw: &str) {
        raw.clone_into(&mut self.search_raw);
        self.search_term = raw.trim().to_lowercase();
    }

    /// Clear the search text
    #[inline]
    pub fn clear_search(&mut self) {
        self.search_raw.clear();
        self.search_term.clear();
    }

    /// Record the deep-linked thread
    #[inline]
    pub fn set_focused_thread(&mut self, id: Option<ThreadId>) {
        self.focused_thread = id;
    }
}
