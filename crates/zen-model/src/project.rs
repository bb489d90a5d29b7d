//! Community project records (`/data/community.json`)

use crate::error::ModelError;
use crate::lenient::{self, non_blank};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Project showcased in the community grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Anchor id chosen by the publisher
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Project title
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub title: String,
    /// Who built it
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub author: String,
    /// Short description
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub description: String,
    /// Tags, also the filter values
    #[serde(default, deserialize_with = "lenient::list")]
    pub tags: Vec<String>,
    /// Project link
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub link: String,
    /// Cover image URL
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
}

impl ProjectRecord {
    /// Create a project with a title and author
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Set the tags
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Publisher-chosen id, trimmed, when non-blank
    #[inline]
    #[must_use]
    pub fn manual_id(&self) -> Option<&str> {
        self.id.as_deref().and_then(non_blank).map(str::trim)
    }

    /// Cover image, when non-blank
    #[inline]
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_deref().and_then(non_blank)
    }

    /// Exact tag membership
    #[inline]
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether `term` (trimmed, lower-cased) occurs in the title, description
    /// or author
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        term.is_empty()
            || [&self.title, &self.description, &self.author]
                .iter()
                .any(|field| field.to_lowercase().contains(term))
    }
}

/// Decode the community document.
///
/// # Errors
/// [`ModelError::NotAnArray`] when the root is not an array. Entries that are
/// not objects are skipped with a warning.
pub fn parse_project_document(document: Value) -> Result<Vec<ProjectRecord>, ModelError> {
    let Value::Array(items) = document else {
        return Err(ModelError::NotAnArray {
            document: "community",
        });
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<ProjectRecord>(item) {
            Ok(record) => Some(record),
            Err(source) => {
                tracing::warn!("{}", ModelError::InvalidRecord { index, source });
                None
            }
        })
        .collect())
}
