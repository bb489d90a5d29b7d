//! Announcement bar payload
//!
//! The announcements document has been published in several shapes over time:
//! a bare array, `{ "latest": {...} }`, `{ "announcement": {...} }` or a single
//! object. [`resolve_announcement`] accepts all of them, along with the
//! alternative field names each shape used.

use serde_json::{Map, Value};

/// Default call-to-action label
pub const DEFAULT_CTA_LABEL: &str = "Lihat";

/// Resolved announcement ready for display decisions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Identifier used for dismissal (may be empty)
    pub id: String,
    /// Text shown in the bar
    pub message: String,
    /// Call-to-action label
    pub cta_label: String,
    /// Call-to-action target, if any
    pub cta_link: Option<String>,
    /// Publisher switch
    pub active: bool,
}

impl Announcement {
    /// Whether the bar has something to show
    #[inline]
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        self.active && !self.message.is_empty()
    }
}

/// Pick the announcement out of any accepted payload shape.
#[must_use]
pub fn resolve_announcement(payload: &Value) -> Option<Announcement> {
    let entry = match payload {
        Value::Array(items) => items
            .iter()
            .find(|item| item.is_object() && item.get("active") != Some(&Value::Bool(false)))
            .or_else(|| items.first())?,
        Value::Object(object) => object
            .get("latest")
            .filter(|v| is_truthy(v))
            .or_else(|| object.get("announcement").filter(|v| is_truthy(v)))
            .unwrap_or(payload),
        _ => return None,
    };

    let object = entry.as_object()?;

    Some(Announcement {
        id: first_text(object, &["id", "identifier"]).unwrap_or_default(),
        message: first_text(object, &["message", "text", "title"]).unwrap_or_default(),
        cta_label: first_text(object, &["cta", "cta_text"])
            .unwrap_or_else(|| DEFAULT_CTA_LABEL.to_string()),
        cta_link: first_text(object, &["link", "cta_link", "url"]),
        active: object.get("active") != Some(&Value::Bool(false)),
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// First non-empty string (or number, rendered) among `keys`
fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_prefers_first_active() {
        let resolved = resolve_announcement(&json!([
            { "id": "old", "message": "Lama", "active": false },
            { "id": "new", "text": "Baru" }
        ]))
        .unwrap();
        assert_eq!(resolved.id, "new");
        assert_eq!(resolved.message, "Baru");
        assert_eq!(resolved.cta_label, DEFAULT_CTA_LABEL);
    }

    #[test]
    fn array_of_inactive_falls_back_to_first() {
        let resolved = resolve_announcement(&json!([{ "id": "a", "message": "x", "active": false }])).unwrap();
        assert!(!resolved.is_displayable());
    }

    #[test]
    fn nested_shapes() {
        let latest = resolve_announcement(&json!({ "latest": { "identifier": 7, "title": "Hai" } })).unwrap();
        assert_eq!(latest.id, "7");
        assert_eq!(latest.message, "Hai");

        let wrapped = resolve_announcement(&json!({
            "announcement": { "message": "Daftar", "cta_text": "Gabung", "cta_link": "/daftar" }
        }))
        .unwrap();
        assert_eq!(wrapped.cta_label, "Gabung");
        assert_eq!(wrapped.cta_link.as_deref(), Some("/daftar"));
    }

    #[test]
    fn plain_object_and_rejects() {
        assert!(resolve_announcement(&json!({ "message": "Halo" })).unwrap().is_displayable());
        assert!(resolve_announcement(&json!([])).is_none());
        assert!(resolve_announcement(&json!("text")).is_none());
    }
}
