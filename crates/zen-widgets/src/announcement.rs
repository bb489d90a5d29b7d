//! Announcement bar
//!
//! Shows the current announcement unless the reader dismissed that same
//! announcement before. Storage trouble never hides or breaks the bar; it is
//! logged and the bar behaves as if nothing was stored.

use crate::error::WidgetError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zen_model::{resolve_announcement, Announcement};
use zen_ui::{DocumentSource, StorageBackend};

/// Announcement bar settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnouncementConfig {
    /// Announcements document path
    pub data_path: String,
    /// Local storage key holding the dismissed announcement id
    pub dismissed_key: String,
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        Self {
            data_path: "/data/announcements.json".to_owned(),
            dismissed_key: "zen_announcement_dismissed".to_owned(),
        }
    }
}

impl AnnouncementConfig {
    /// Set the document path
    #[must_use]
    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Set the dismissal key
    #[must_use]
    pub fn with_dismissed_key(mut self, key: impl Into<String>) -> Self {
        self.dismissed_key = key.into();
        self
    }
}

/// Call-to-action link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToAction {
    /// Link text
    pub label: String,
    /// Target
    pub href: String,
}

/// What the bar displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementView {
    /// Dismissal id; empty ids cannot be remembered
    pub id: String,
    /// Bar text
    pub message: String,
    /// Link, hidden when the announcement has none
    pub cta: Option<CallToAction>,
}

impl AnnouncementView {
    fn from_announcement(announcement: Announcement) -> Self {
        let cta = announcement.cta_link.map(|href| CallToAction {
            label: announcement.cta_label,
            href,
        });
        Self {
            id: announcement.id,
            message: announcement.message,
            cta,
        }
    }
}

/// Announcement bar controller
#[derive(Debug, Clone, Default)]
pub struct AnnouncementBar {
    config: AnnouncementConfig,
    shown: Option<AnnouncementView>,
}

impl AnnouncementBar {
    /// Hidden bar
    #[must_use]
    pub fn new(config: AnnouncementConfig) -> Self {
        Self {
            config,
            shown: None,
        }
    }

    /// Announcement currently displayed
    #[inline]
    #[must_use]
    pub fn shown(&self) -> Option<&AnnouncementView> {
        self.shown.as_ref()
    }

    /// Fetch the announcements document and decide what to show
    pub async fn load<D, S>(&mut self, source: &D, storage: &S) -> Option<&AnnouncementView>
    where
        D: DocumentSource + ?Sized,
        S: StorageBackend + ?Sized,
    {
        match source.fetch_json(&self.config.data_path).await {
            Ok(document) => self.apply(&document, storage),
            Err(e) => {
                tracing::error!("Failed to fetch announcements: {}", WidgetError::from(e));
                self.shown = None;
                None
            }
        }
    }

    /// Resolve `document` and show it unless inactive, empty or dismissed
    pub fn apply<S: StorageBackend + ?Sized>(
        &mut self,
        document: &Value,
        storage: &S,
    ) -> Option<&AnnouncementView> {
        self.shown = resolve_announcement(document)
            .filter(Announcement::is_displayable)
            .filter(|a| !self.is_dismissed(&a.id, storage))
            .map(AnnouncementView::from_announcement);

        if let Some(view) = &self.shown {
            tracing::debug!(announcement_id = %view.id, "Showing announcement");
        }
        self.shown.as_ref()
    }

    fn is_dismissed<S: StorageBackend + ?Sized>(&self, id: &str, storage: &S) -> bool {
        if id.is_empty() {
            return false;
        }
        match storage.get_item(&self.config.dismissed_key) {
            Ok(stored) => stored.as_deref() == Some(id),
            Err(e) => {
                tracing::warn!("Unable to read announcement dismissal state: {e}");
                false
            }
        }
    }

    /// Hide the bar and remember its id. Returns whether it was showing.
    pub fn dismiss<S: StorageBackend + ?Sized>(&mut self, storage: &S) -> bool {
        let Some(view) = self.shown.take() else {
            return false;
        };
        if !view.id.is_empty() {
            if let Err(e) = storage.set_item(&self.config.dismissed_key, &view.id) {
                tracing::warn!("Unable to persist announcement dismissal: {e}");
            }
        }
        true
    }
}
