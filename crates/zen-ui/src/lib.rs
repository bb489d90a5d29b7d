//! Zenotika UI plumbing
//!
//! Everything the page scripts borrow from the browser, expressed as seams a
//! host adapter implements, plus the small reusable pieces built on them:
//!
//! - [`QueryParamStore`]: URL query parameters as durable view-state
//! - [`StorageBackend`]: local storage with JSON helpers
//! - [`Debouncer`]: quiescence-based rate limiting on the tokio timer
//! - [`FadeInObserver`]: viewport reveal tracking with reduced-motion support
//! - [`focus`]: keyboard focus trap for overlays
//! - [`DocumentSource`]: opaque JSON document fetches with supersession
//!
//! # Architecture
//!
//! ```text
//! host adapter (wasm, test fake)
//!   ├── UrlHost ──────► QueryParamStore
//!   ├── StorageBackend
//!   ├── DocumentSource ► GenerationCounter
//!   └── intersection entries ► FadeInObserver
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod clock;
pub mod debounce;
pub mod fetch;
pub mod focus;
pub mod query;
pub mod reveal;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use debounce::Debouncer;
pub use fetch::{DocumentSource, FetchError, GenerationCounter, LoadTicket, StaticDocuments};
pub use focus::{trap_key, TrapAction, TrapKey};
pub use query::{MemoryUrl, QueryParamStore, UrlHost};
pub use reveal::{ElementRect, FadeInObserver, IntersectionEntry, RevealOptions, RevealState};
pub use storage::{read_json, write_json, MemoryStorage, StorageBackend, StorageError, StorageMode};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for host adapters
    pub use crate::{
        Clock, Debouncer, DocumentSource, FadeInObserver, QueryParamStore, StorageBackend,
        UrlHost,
    };
}
