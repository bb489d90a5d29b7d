//! Query-parameter store
//!
//! URL query parameters are the durable form of widget view-state: they
//! survive reloads and can be shared. Writes *replace* the current history
//! entry so filtering never floods the back button, and a write that would not
//! change the URL is skipped entirely.

use parking_lot::Mutex;
use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

/// Browser location and history access
pub trait UrlHost: Send + Sync {
    /// Absolute URL of the current document, `None` when the environment has
    /// no location (e.g. prerendering)
    fn current_href(&self) -> Option<String>;

    /// Replace the current history entry with `href` without pushing a new one
    fn replace_href(&self, href: &str);
}

impl<T: UrlHost + ?Sized> UrlHost for Arc<T> {
    #[inline]
    fn current_href(&self) -> Option<String> {
        (**self).current_href()
    }

    #[inline]
    fn replace_href(&self, href: &str) {
        (**self).replace_href(href);
    }
}

/// Reads and writes query parameters through a [`UrlHost`]
#[derive(Debug, Clone)]
pub struct QueryParamStore<H> {
    host: H,
}

impl<H: UrlHost> QueryParamStore<H> {
    /// Create store over a host
    #[inline]
    #[must_use]
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Underlying host
    #[inline]
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    fn current_url(&self) -> Option<Url> {
        let href = self.host.current_href()?;
        match Url::parse(&href) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!("Unable to read query parameter: {e}");
                None
            }
        }
    }

    /// Value of `key`, or empty when absent or the URL is unavailable
    #[must_use]
    pub fn get(&self, key: &str) -> String {
        if key.is_empty() {
            return String::new();
        }

        self.current_url()
            .and_then(|url| {
                url.query_pairs()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.into_owned())
            })
            .unwrap_or_default()
    }

    /// Set `key` to the trimmed `value`, or remove it when the value is blank.
    ///
    /// Returns whether the history entry was replaced. Nothing is written when
    /// the parameter already holds the value (or is already absent).
    pub fn set(&self, key: &str, value: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        let Some(mut url) = self.current_url() else {
            return false;
        };

        let value = value.trim();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let current = pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());

        let next: Vec<(String, String)> = if value.is_empty() {
            if current.is_none() {
                return false;
            }
            pairs.into_iter().filter(|(k, _)| k != key).collect()
        } else {
            if current == Some(value) {
                return false;
            }
            let mut replaced = false;
            let mut next: Vec<(String, String)> = pairs
                .into_iter()
                .filter_map(|(k, v)| {
                    if k != key {
                        Some((k, v))
                    } else if replaced {
                        None
                    } else {
                        replaced = true;
                        Some((k, value.to_owned()))
                    }
                })
                .collect();
            if !replaced {
                next.push((key.to_owned(), value.to_owned()));
            }
            next
        };

        write_query(&mut url, &next);
        self.host.replace_href(url.as_str());
        true
    }

    /// Decoded URL fragment without the leading `#`
    #[must_use]
    pub fn fragment(&self) -> String {
        self.current_url()
            .and_then(|url| url.fragment().map(decode_fragment))
            .unwrap_or_default()
    }

    /// Replace the URL fragment; blank removes it. Returns whether history was
    /// written.
    pub fn set_fragment(&self, value: &str) -> bool {
        let Some(mut url) = self.current_url() else {
            return false;
        };

        let value = value.trim().trim_start_matches('#');
        let current = url.fragment().map(decode_fragment).unwrap_or_default();
        if current == value {
            return false;
        }

        url.set_fragment((!value.is_empty()).then_some(value));
        self.host.replace_href(url.as_str());
        true
    }
}

fn write_query(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        url.set_query(None);
        return;
    }
    url.query_pairs_mut().clear().extend_pairs(pairs.iter());
}

fn decode_fragment(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), Cow::into_owned)
}

/// In-memory location for tests and non-browser hosts
#[derive(Debug, Default)]
pub struct MemoryUrl {
    href: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryUrl {
    /// Location starting at `href`
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Mutex::new(Some(href.into())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Environment without URL access
    #[inline]
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Current location
    #[inline]
    #[must_use]
    pub fn href(&self) -> Option<String> {
        self.href.lock().clone()
    }

    /// Number of history replacements performed
    #[inline]
    #[must_use]
    pub fn history_writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// User navigation (address bar edit, back/forward); not a history write
    pub fn navigate(&self, href: impl Into<String>) {
        *self.href.lock() = Some(href.into());
    }
}

impl UrlHost for MemoryUrl {
    fn current_href(&self) -> Option<String> {
        self.href()
    }

    fn replace_href(&self, href: &str) {
        *self.href.lock() = Some(href.to_owned());
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(href: &str) -> QueryParamStore<Arc<MemoryUrl>> {
        QueryParamStore::new(Arc::new(MemoryUrl::new(href)))
    }

    #[test]
    fn get_reads_decoded_value() {
        let store = store("https://zenotika.id/forum?forum=belajar+rust&forumSort=newest");
        assert_eq!(store.get("forum"), "belajar rust");
        assert_eq!(store.get("forumSort"), "newest");
        assert_eq!(store.get("missing"), "");
        assert_eq!(store.get(""), "");
    }

    #[test]
    fn get_without_url_access_is_empty() {
        let store = QueryParamStore::new(MemoryUrl::unavailable());
        assert_eq!(store.get("forum"), "");
        assert!(!store.set("forum", "x"));
    }

    #[test]
    fn set_trims_and_replaces_history() {
        let store = store("https://zenotika.id/forum");
        assert!(store.set("forum", "  rust  "));
        assert_eq!(store.get("forum"), "rust");
        assert_eq!(store.host().history_writes(), 1);
    }

    #[test]
    fn set_same_value_is_noop() {
        let store = store("https://zenotika.id/forum?forum=rust");
        assert!(!store.set("forum", "rust"));
        assert_eq!(store.host().history_writes(), 0);
    }

    #[test]
    fn blank_value_removes_parameter() {
        let store = store("https://zenotika.id/forum?forum=rust&forumKategori=Karier");
        assert!(store.set("forum", "   "));
        assert_eq!(store.get("forum"), "");
        assert_eq!(store.get("forumKategori"), "Karier");

        assert!(!store.set("forum", ""));
        assert_eq!(store.host().history_writes(), 1);
    }

    #[test]
    fn removing_last_parameter_drops_query() {
        let store = store("https://zenotika.id/forum?forum=rust#top");
        store.set("forum", "");
        assert_eq!(store.host().href().unwrap(), "https://zenotika.id/forum#top");
    }

    #[test]
    fn set_collapses_duplicates_in_place() {
        let store = store("https://zenotika.id/?a=1&tag=x&b=2&tag=y");
        store.set("tag", "z");
        assert_eq!(
            store.host().href().unwrap(),
            "https://zenotika.id/?a=1&tag=z&b=2"
        );
    }

    #[test]
    fn fragment_roundtrip() {
        let store = store("https://zenotika.id/forum#thread%20one");
        assert_eq!(store.fragment(), "thread one");
        assert!(!store.set_fragment("#thread one"));
        assert!(store.set_fragment("magang-2025"));
        assert_eq!(store.fragment(), "magang-2025");
        assert!(store.set_fragment(""));
        assert_eq!(store.host().href().unwrap(), "https://zenotika.id/forum");
    }
}
