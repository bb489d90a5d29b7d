//! Zenotika data model
//!
//! Typed records for the static JSON documents the community site loads:
//! - Forum threads with their replies (`/data/forum.json`)
//! - Community events (`/data/events.json`)
//! - The announcement bar payload (`/data/announcements.json`)
//! - Community projects (`/data/community.json`)
//!
//! Documents are parsed leniently: missing, `null` or wrong-typed fields take their
//! defaults, unparseable timestamps count as absent, and records that cannot
//! be decoded at all are skipped with a warning rather than failing the whole
//! document.
//!
//! # Example
//!
//! ```rust,ignore
//! use zen_model::parse_thread_document;
//!
//! let threads = parse_thread_document(serde_json::json!([
//!     { "id": "t-1", "title": "Belajar Rust", "category": "Pemrograman" }
//! ]));
//! assert_eq!(threads[0].id.as_str(), "t-1");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod announcement;
pub mod error;
pub mod event;
pub mod project;
pub mod thread;
mod lenient;

pub use announcement::{resolve_announcement, Announcement};
pub use error::ModelError;
pub use event::{parse_event_document, EventRecord};
pub use lenient::parse_timestamp;
pub use project::{parse_project_document, ProjectRecord};
pub use thread::{
    parse_thread_document, parse_thread_document_str, Author, HighlightReply, Post, ThreadId,
    ThreadRecord,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
