//! Light/dark theme preference

use serde::{Deserialize, Serialize};
use std::fmt;
use zen_ui::StorageBackend;

/// Theme settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Local storage key of the chosen theme
    pub storage_key: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_owned(),
        }
    }
}

/// Colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light scheme
    Light,
    /// Dark scheme
    #[default]
    Dark,
}

impl Theme {
    /// `light` is light; anything else is dark
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        if raw == "light" {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// Theme implied by the system colour-scheme preference
    #[inline]
    #[must_use]
    pub fn from_system(prefers_light: bool) -> Self {
        if prefers_light {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// Stored and document value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved theme and whether it still follows the system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePreference {
    key: String,
    current: Theme,
    explicit: bool,
}

impl ThemePreference {
    /// Resolve from the stored choice, else the document default, else the
    /// system preference.
    #[must_use]
    pub fn resolve<S: StorageBackend + ?Sized>(
        config: &ThemeConfig,
        storage: &S,
        document_default: Option<&str>,
        system_prefers_light: bool,
    ) -> Self {
        let stored = match storage.get_item(&config.storage_key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("Unable to read theme preference: {e}");
                None
            }
        };

        let current = stored
            .as_deref()
            .or(document_default.filter(|d| !d.is_empty()))
            .map_or_else(|| Theme::from_system(system_prefers_light), Theme::resolve);

        Self {
            key: config.storage_key.clone(),
            current,
            explicit: stored.is_some(),
        }
    }

    /// Active theme
    #[inline]
    #[must_use]
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Whether the toggle shows light
    #[inline]
    #[must_use]
    pub fn is_light(&self) -> bool {
        self.current == Theme::Light
    }

    /// Whether system preference changes still apply
    #[inline]
    #[must_use]
    pub fn follows_system(&self) -> bool {
        !self.explicit
    }

    /// System preference changed; applied only while no choice is stored.
    /// Returns the theme when it was applied.
    pub fn system_changed(&mut self, prefers_light: bool) -> Option<Theme> {
        if self.explicit {
            return None;
        }
        self.current = Theme::from_system(prefers_light);
        Some(self.current)
    }

    /// Choose `theme` and persist it
    pub fn set<S: StorageBackend + ?Sized>(&mut self, theme: Theme, storage: &S) -> Theme {
        self.current = theme;
        self.explicit = true;
        if let Err(e) = storage.set_item(&self.key, theme.as_str()) {
            tracing::warn!("Unable to save theme preference: {e}");
        }
        theme
    }

    /// Flip the theme and persist it
    pub fn toggle<S: StorageBackend + ?Sized>(&mut self, storage: &S) -> Theme {
        self.set(self.current.toggled(), storage)
    }
}
