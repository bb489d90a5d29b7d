//! Zenotika site boot
//!
//! Wires the forum and widget crates into one page: configuration, logging,
//! concurrent document loading and the command channel host adapters feed.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use zen_site::prelude::*;
//!
//! let config = SiteConfig::from_path("site.toml")?;
//! zen_site::telemetry::init(&config.log)?;
//!
//! let site = Site::boot(config, host, surface, &documents).await;
//! ```
//!
//! # Architecture
//!
//! ```text
//! SiteConfig ─► telemetry::init
//!     │
//!     ▼
//! Site::boot ──join!──┬─► ForumSession::load
//!                     ├─► EventsBoard::load
//!                     └─► AnnouncementBar::load
//!
//! host events ─► SearchInput (debounce) ─► mpsc ─► run_commands ─► ForumSession
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod input;
pub mod site;
pub mod telemetry;

pub use config::{LogConfig, LogFormat, SiteConfig};
pub use error::{ConfigError, SiteError};
pub use input::{command_channel, drain_commands, run_commands, SearchInput, COMMAND_QUEUE_DEPTH};
pub use site::{Site, SiteHost};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{Site, SiteConfig, SiteError, SiteHost};
    pub use zen_forum::prelude::*;
}
