//! Zenotika engagement widgets
//!
//! The smaller interactive pieces of the site, each independent of the forum:
//!
//! - [`EventsBoard`]: event listing classified against today, filtered by URL
//! - [`CommunityBoard`]: project grid with tag filter, search and anchors
//! - [`AnnouncementBar`]: current announcement with remembered dismissal
//! - [`ThemePreference`]: light/dark resolution and persistence
//! - [`MerchTracker`]: per-product interest toggles and goal progress
//!
//! # Architecture
//!
//! ```text
//! DocumentSource ─┬─► EventsBoard ──► EventsView
//!                 ├─► CommunityBoard ─► CommunityView
//!                 └─► AnnouncementBar ─► AnnouncementView
//! StorageBackend ──┬─► ThemePreference
//!                  ├─► MerchTracker ─► MerchProgress
//!                  └─► AnnouncementBar (dismissal)
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod announcement;
pub mod community;
pub mod error;
pub mod events;
pub mod merch;
pub mod theme;

pub use announcement::{AnnouncementBar, AnnouncementConfig, AnnouncementView, CallToAction};
pub use community::{
    card_anchors, slugify, CommunityBoard, CommunityConfig, CommunityStatus, CommunityView,
    ImageSources, ProjectCard, TagButton,
};
pub use error::WidgetError;
pub use events::{
    EventCard, EventCounts, EventStatus, EventTiming, EventsBoard, EventsConfig, EventsFilter,
    EventsListing, EventsView, FilterButton, ScheduledEvent,
};
pub use merch::{MerchConfig, MerchProduct, MerchProgress, MerchTracker};
pub use theme::{Theme, ThemeConfig, ThemePreference};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        AnnouncementBar, CommunityBoard, EventsBoard, EventsFilter, MerchTracker, Theme, ThemePreference,
    };
}
