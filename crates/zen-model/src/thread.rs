//! Forum thread records
//!
//! One [`ThreadRecord`] per discussion in `/data/forum.json`. Records are
//! immutable once loaded; vote adjustments live in the vote ledger, not here.

use crate::error::ModelError;
use crate::lenient::{self, non_blank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

/// Stable thread identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Wrap an identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ThreadId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ThreadId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ThreadId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Thread or reply author
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    /// Role within the community (e.g. "Mahasiswa", "Alumni")
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub role: String,
}

impl Author {
    /// Create author with name and role
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
        }
    }
}

/// Summary of the most helpful reply, shown under the excerpt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightReply {
    /// Who wrote the reply
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub author: String,
    /// One-line summary
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub summary: String,
}

impl HighlightReply {
    /// Both author and summary are present
    #[inline]
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        non_blank(&self.author).is_some() && non_blank(&self.summary).is_some()
    }
}

/// Reply inside a thread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Reply author
    #[serde(default, deserialize_with = "lenient::optional")]
    pub author: Option<Author>,
    /// When the reply was posted
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Paragraphs
    #[serde(default, deserialize_with = "lenient::list")]
    pub content: Vec<String>,
    /// Marked as the accepted answer
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub is_answer: bool,
}

/// Forum discussion record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadRecord {
    /// Unique, stable identifier
    pub id: ThreadId,
    /// Thread title
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,
    /// Short teaser shown in the list
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub excerpt: String,
    /// Category label (also the filter key)
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub category: String,
    /// Ordered tags
    #[serde(default, deserialize_with = "lenient::list")]
    pub tags: Vec<String>,
    /// Thread author
    #[serde(default, deserialize_with = "lenient::optional")]
    pub author: Option<Author>,
    /// Creation time
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Last reply or edit
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_activity: Option<DateTime<Utc>>,
    /// Reply count
    #[serde(default, deserialize_with = "lenient::count")]
    pub replies: u32,
    /// Server-seeded vote count
    #[serde(default, deserialize_with = "lenient::count")]
    pub upvotes: u32,
    /// Has an accepted answer
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub answered: bool,
    /// Highlighted reply summary
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub highlight_reply: Option<HighlightReply>,
    /// Opening post paragraphs
    #[serde(default, deserialize_with = "lenient::list")]
    pub body: Vec<String>,
    /// Replies in posting order
    #[serde(default, deserialize_with = "lenient::list")]
    pub posts: Vec<Post>,
}

impl ThreadRecord {
    /// Minimal record with only an id and title
    #[must_use]
    pub fn new(id: impl Into<ThreadId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            excerpt: String::new(),
            category: String::new(),
            tags: Vec::new(),
            author: None,
            created_at: None,
            last_activity: None,
            replies: 0,
            upvotes: 0,
            answered: false,
            highlight_reply: None,
            body: Vec::new(),
            posts: Vec::new(),
        }
    }

    /// Author name, if present and non-blank
    #[inline]
    #[must_use]
    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().and_then(|a| non_blank(&a.name))
    }

    /// Author role, if present and non-blank
    #[inline]
    #[must_use]
    pub fn author_role(&self) -> Option<&str> {
        self.author.as_ref().and_then(|a| non_blank(&a.role))
    }

    /// Highlighted reply when both parts are present
    #[inline]
    #[must_use]
    pub fn highlight(&self) -> Option<&HighlightReply> {
        self.highlight_reply
            .as_ref()
            .filter(|h| h.is_displayable())
    }

    /// Most recent activity: last activity, else creation time
    #[inline]
    #[must_use]
    pub fn activity_at(&self) -> Option<DateTime<Utc>> {
        self.last_activity.or(self.created_at)
    }

    /// Creation time in epoch milliseconds; missing is epoch 0
    #[inline]
    #[must_use]
    pub fn created_at_millis(&self) -> i64 {
        self.created_at.map_or(0, |t| t.timestamp_millis())
    }

    /// Lower-cased text searched by the forum search box
    ///
    /// Non-blank title, excerpt, category, author name, author role and tags,
    /// joined with single spaces.
    #[must_use]
    pub fn search_haystack(&self) -> String {
        let fields = [
            Some(self.title.as_str()),
            Some(self.excerpt.as_str()),
            Some(self.category.as_str()),
            self.author_name(),
            self.author_role(),
        ];

        fields
            .into_iter()
            .flatten()
            .chain(self.tags.iter().map(String::as_str))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Whether `term` (already trimmed and lower-cased) occurs in the haystack
    #[inline]
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        term.is_empty() || self.search_haystack().contains(term)
    }
}

/// Decode the forum document.
///
/// A non-array document yields no threads. Entries that fail to decode (for
/// example a missing `id`) are skipped with a warning.
#[must_use]
pub fn parse_thread_document(document: Value) -> Vec<ThreadRecord> {
    let Value::Array(items) = document else {
        tracing::warn!("Forum document is not an array; treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<ThreadRecord>(item) {
            Ok(record) => Some(record),
            Err(source) => {
                tracing::warn!("{}", ModelError::InvalidRecord { index, source });
                None
            }
        })
        .collect()
}

/// Decode the forum document from raw JSON text
///
/// # Errors
/// Returns [`ModelError::Json`] when the text is not JSON at all.
pub fn parse_thread_document_str(text: &str) -> Result<Vec<ThreadRecord>, ModelError> {
    let document: Value = serde_json::from_str(text)?;
    Ok(parse_thread_document(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_full_record() {
        let record: ThreadRecord = serde_json::from_value(json!({
            "id": "rust-101",
            "title": "Belajar Rust dari nol",
            "excerpt": "Mulai dari mana?",
            "category": "Pemrograman",
            "tags": ["rust", "pemula"],
            "author": { "name": "Rina", "role": "Mahasiswa" },
            "createdAt": "2025-02-01T08:00:00Z",
            "lastActivity": "2025-02-03T10:00:00Z",
            "replies": 4,
            "upvotes": 12,
            "answered": true,
            "highlightReply": { "author": "Bima", "summary": "Mulai dari The Book" },
            "body": ["Paragraf satu"],
            "posts": [{ "author": { "name": "Bima" }, "content": ["Coba ini"], "isAnswer": true }]
        }))
        .unwrap();

        assert_eq!(record.id.as_str(), "rust-101");
        assert_eq!(record.tags, vec!["rust", "pemula"]);
        assert_eq!(record.author_role(), Some("Mahasiswa"));
        assert_eq!(record.replies, 4);
        assert!(record.posts[0].is_answer);
        assert!(record.highlight().is_some());
    }

    #[test]
    fn tolerates_nulls_and_bad_values() {
        let record: ThreadRecord = serde_json::from_value(json!({
            "id": "x",
            "title": null,
            "tags": null,
            "replies": "many",
            "upvotes": -3,
            "createdAt": "not a date"
        }))
        .unwrap();

        assert_eq!(record.title, "");
        assert!(record.tags.is_empty());
        assert_eq!(record.replies, 0);
        assert_eq!(record.upvotes, 0);
        assert!(record.created_at.is_none());
        assert_eq!(record.created_at_millis(), 0);
    }

    #[test]
    fn wrong_typed_fields_keep_the_thread() {
        let threads = parse_thread_document(json!([
            { "id": "tags-string", "tags": "rust" },
            { "id": "author-string", "author": "Rina" },
            { "id": "answered-string", "answered": "yes" },
            { "id": "highlight-string", "highlightReply": "ok" },
            { "id": "posts-mixed", "posts": ["oops", { "content": ["Balasan", 7] }], "body": "teks" },
            { "id": "ok" }
        ]));

        let ids: Vec<&str> = threads.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            ["tags-string", "author-string", "answered-string", "highlight-string", "posts-mixed", "ok"]
        );
        assert!(threads[0].tags.is_empty());
        assert!(threads[1].author.is_none());
        assert!(!threads[2].answered);
        assert!(threads[3].highlight_reply.is_none());
        assert_eq!(threads[4].posts.len(), 1);
        assert_eq!(threads[4].posts[0].content, ["Balasan"]);
        assert!(threads[4].body.is_empty());
    }

    #[test]
    fn haystack_joins_non_blank_fields() {
        let mut record = ThreadRecord::new("a", "Judul");
        record.category = "Karier".into();
        record.author = Some(Author::new("Dewi", ""));
        record.tags = vec!["Magang".into()];

        assert_eq!(record.search_haystack(), "judul karier dewi magang");
        assert!(record.matches_search("dewi"));
        assert!(!record.matches_search("alumni"));
        assert!(record.matches_search(""));
    }

    #[test]
    fn highlight_requires_both_parts() {
        let mut record = ThreadRecord::new("a", "Judul");
        record.highlight_reply = Some(HighlightReply {
            author: "Bima".into(),
            summary: " ".into(),
        });
        assert!(record.highlight().is_none());
    }

    #[test]
    fn document_skips_undecodable_entries() {
        let threads = parse_thread_document(json!([
            { "id": "ok", "title": "Valid" },
            { "title": "No id" },
            42
        ]));
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].id.as_str(), "ok");
    }

    #[test]
    fn non_array_document_is_empty() {
        assert!(parse_thread_document(json!({ "threads": [] })).is_empty());
    }

    #[test]
    fn invalid_json_text_is_an_error() {
        assert!(matches!(
            parse_thread_document_str("{oops"),
            Err(ModelError::Json(_))
        ));
    }
}
