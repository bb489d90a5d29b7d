//! Forum configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// URL query parameter names used by the forum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForumQueryKeys {
    /// Raw search text
    pub search: String,
    /// Active category (omitted for all)
    pub category: String,
    /// Sort mode (omitted for trending)
    pub sort: String,
    /// Thread to scroll to and focus
    pub thread: String,
    /// Thread shown in the detail modal
    pub modal: String,
}

impl Default for ForumQueryKeys {
    fn default() -> Self {
        Self {
            search: "forum".to_owned(),
            category: "forumKategori".to_owned(),
            sort: "forumSort".to_owned(),
            thread: "forumThread".to_owned(),
            modal: "forumModal".to_owned(),
        }
    }
}

/// Ordering applied among threads with equal sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep load order
    #[default]
    Stable,
    /// Ascending thread id
    IdAscending,
}

/// Forum settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForumConfig {
    /// Thread document path
    pub data_path: String,
    /// Local storage key of the vote ledger
    pub votes_key: String,
    /// Query parameter names
    pub query_keys: ForumQueryKeys,
    /// Search input quiet period in milliseconds
    pub search_debounce_ms: u64,
    /// Equal-key ordering
    pub tie_break: TieBreak,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            data_path: "/data/forum.json".to_owned(),
            votes_key: "forum_votes".to_owned(),
            query_keys: ForumQueryKeys::default(),
            search_debounce_ms: 300,
            tie_break: TieBreak::Stable,
        }
    }
}

impl ForumConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With document path
    #[inline]
    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = path.into();
        self
    }

    /// With vote ledger storage key
    #[inline]
    #[must_use]
    pub fn with_votes_key(mut self, key: impl Into<String>) -> Self {
        self.votes_key = key.into();
        self
    }

    /// With query parameter names
    #[inline]
    #[must_use]
    pub fn with_query_keys(mut self, keys: ForumQueryKeys) -> Self {
        self.query_keys = keys;
        self
    }

    /// With search debounce
    #[inline]
    #[must_use]
    pub fn with_search_debounce_ms(mut self, ms: u64) -> Self {
        self.search_debounce_ms = ms;
        self
    }

    /// With tie-break rule
    #[inline]
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Search quiet period
    #[inline]
    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_urls() {
        let config = ForumConfig::default();
        assert_eq!(config.query_keys.category, "forumKategori");
        assert_eq!(config.votes_key, "forum_votes");
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.tie_break, TieBreak::Stable);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ForumConfig =
            serde_json::from_str(r#"{ "tie_break": "id_ascending", "query_keys": { "search": "q" } }"#)
                .unwrap();
        assert_eq!(config.tie_break, TieBreak::IdAscending);
        assert_eq!(config.query_keys.search, "q");
        assert_eq!(config.query_keys.sort, "forumSort");
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(serde_json::from_str::<ForumConfig>(r#"{ "votes": "x" }"#).is_err());
    }
}
