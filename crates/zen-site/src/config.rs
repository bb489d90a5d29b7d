//! Site configuration
//!
//! One [`SiteConfig`] aggregates every component's settings. It loads from
//! TOML or JSON; unknown keys are rejected at every level so a typo in a
//! deployment file fails loudly instead of silently using a default.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use zen_forum::ForumConfig;
use zen_ui::RevealOptions;
use zen_widgets::{AnnouncementConfig, CommunityConfig, EventsConfig, MerchConfig, ThemeConfig};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info,zen_forum=debug".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete site configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Logging
    pub log: LogConfig,
    /// Forum list
    pub forum: ForumConfig,
    /// Fade-in reveal
    pub reveal: RevealOptions,
    /// Events listing
    pub events: EventsConfig,
    /// Community projects grid
    pub community: CommunityConfig,
    /// Announcement bar
    pub announcement: AnnouncementConfig,
    /// Theme preference
    pub theme: ThemeConfig,
    /// Merch interest tracker
    pub merch: MerchConfig,
}

impl SiteConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set logging
    #[must_use]
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Set forum settings
    #[must_use]
    pub fn with_forum(mut self, forum: ForumConfig) -> Self {
        self.forum = forum;
        self
    }

    /// Set reveal options
    #[must_use]
    pub fn with_reveal(mut self, reveal: RevealOptions) -> Self {
        self.reveal = reveal;
        self
    }

    /// Set events settings
    #[must_use]
    pub fn with_events(mut self, events: EventsConfig) -> Self {
        self.events = events;
        self
    }

    /// Set community grid settings
    #[must_use]
    pub fn with_community(mut self, community: CommunityConfig) -> Self {
        self.community = community;
        self
    }

    /// Set announcement settings
    #[must_use]
    pub fn with_announcement(mut self, announcement: AnnouncementConfig) -> Self {
        self.announcement = announcement;
        self
    }

    /// Set theme settings
    #[must_use]
    pub fn with_theme(mut self, theme: ThemeConfig) -> Self {
        self.theme = theme;
        self
    }

    /// Set merch settings
    #[must_use]
    pub fn with_merch(mut self, merch: MerchConfig) -> Self {
        self.merch = merch;
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Syntax errors, unknown keys, or values rejected by [`Self::validate`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON
    ///
    /// # Errors
    /// Syntax errors, unknown keys, or values rejected by [`Self::validate`].
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` files are JSON, anything else TOML
    ///
    /// # Errors
    /// I/O failures plus everything [`Self::from_toml_str`] rejects.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_toml_str(&text)
        }
    }

    /// Check ranges serde cannot express
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(invalid("reveal.threshold", "must be between 0 and 1"));
        }
        if self.reveal.bottom_margin_px < 0.0 {
            return Err(invalid("reveal.bottom_margin_px", "must not be negative"));
        }
        if self.forum.votes_key.trim().is_empty() {
            return Err(invalid("forum.votes_key", "must not be empty"));
        }

        let keys = &self.forum.query_keys;
        let mut names = vec![
            keys.search.as_str(),
            keys.category.as_str(),
            keys.sort.as_str(),
            keys.thread.as_str(),
            keys.modal.as_str(),
            self.events.query_key.as_str(),
            self.community.search_key.as_str(),
            self.community.tag_key.as_str(),
        ];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(invalid("forum.query_keys", "query keys must not be empty"));
        }
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigError::Invalid {
                field: "forum.query_keys",
                reason: format!("'{}' is used twice", pair[0]),
            });
        }

        for (field, path) in [
            ("forum.data_path", &self.forum.data_path),
            ("events.data_path", &self.events.data_path),
            ("community.data_path", &self.community.data_path),
            ("announcement.data_path", &self.announcement.data_path),
        ] {
            if path.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        if self.merch.default_goal == 0 {
            return Err(invalid("merch.default_goal", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn threshold_out_of_range() {
        let config = SiteConfig::new().with_reveal(RevealOptions::default().with_threshold(1.5));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "reveal.threshold",
                ..
            })
        ));
    }

    #[test]
    fn duplicate_query_keys_rejected() {
        let mut forum = ForumConfig::default();
        forum.query_keys.sort = "acara".to_owned();
        let err = SiteConfig::new().with_forum(forum).validate().unwrap_err();
        assert!(err.to_string().contains("acara"));
    }

    #[test]
    fn community_keys_join_the_uniqueness_check() {
        let community = CommunityConfig::default().with_query_keys("komunitas", "acara");
        let err = SiteConfig::new().with_community(community).validate().unwrap_err();
        assert!(err.to_string().contains("'acara' is used twice"));

        let community = CommunityConfig::default().with_data_path(" ");
        assert!(matches!(
            SiteConfig::new().with_community(community).validate(),
            Err(ConfigError::Invalid {
                field: "community.data_path",
                ..
            })
        ));
    }
}
