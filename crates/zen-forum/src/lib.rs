//! Zenotika forum core
//!
//! The discussion list as an explicit state object: load the thread document,
//! filter/sort it against the reader's view-state, render a plain model
//! through a surface adapter, keep per-browser votes, and manage the detail
//! modal's focus and URL deep links.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use zen_forum::prelude::*;
//!
//! let mut session = ForumSession::new(ForumConfig::default(), host, surface);
//! session.load(&documents).await;
//!
//! session.dispatch(ForumCommand::SelectSort(SortMode::Newest));
//! session.dispatch(ForumCommand::ToggleVote("magang-2025".into()));
//! ```
//!
//! # Architecture
//!
//! ```text
//! URL ──► ViewState ──┐
//! ThreadStore ────────┼─► pipeline ─► ThreadListModel ─► ForumSurface
//! VoteLedger ─────────┘
//! ModalController ─► ThreadDetail ─► ModalSurface
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod command;
pub mod config;
pub mod error;
pub mod modal;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod store;
pub mod surface;
pub mod view_state;
pub mod votes;

pub use command::ForumCommand;
pub use config::{ForumConfig, ForumQueryKeys, TieBreak};
pub use error::ForumError;
pub use modal::{ModalController, ModalState, ModalTransition};
pub use pipeline::{filter_threads, recency_boost, sort_threads, trending_score, visible_threads};
pub use render::{
    CategoryFilters, CategoryOption, EmptyReason, EmptyState, ReplyView, ThreadCard,
    ThreadDetail, ThreadListModel, VoteBadge,
};
pub use session::{ForumHost, ForumSession, LoadStatus};
pub use store::ThreadStore;
pub use surface::{ForumSurface, ModalSurface};
pub use view_state::{SortMode, ViewState, ALL_CATEGORIES};
pub use votes::VoteLedger;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        ForumCommand, ForumConfig, ForumHost, ForumSession, ForumSurface, ModalSurface,
        SortMode, ThreadStore, ViewState, VoteLedger,
    };
}
