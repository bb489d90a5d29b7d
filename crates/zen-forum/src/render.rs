//! Render model
//!
//! Plain data describing what the forum region should show. A surface adapter
//! turns these into DOM (or anything else); nothing here touches a page.

use crate::store::ThreadStore;
use crate::view_state::{SortMode, ViewState, ALL_CATEGORIES};
use crate::votes::VoteLedger;
use chrono::{DateTime, Utc};
use zen_model::{HighlightReply, Post, ThreadId, ThreadRecord};

/// Label for the unfiltered category button
pub const ALL_CATEGORIES_LABEL: &str = "Semua";
/// Author label fallback in the list
pub const ANONYMOUS_AUTHOR: &str = "Pengguna Anonim";
/// Reply author fallback in the detail view
pub const ANONYMOUS_CONTRIBUTOR: &str = "Kontributor";
/// Detail title fallback
pub const UNTITLED_THREAD: &str = "Diskusi";
/// Detail body fallback
pub const EMPTY_BODY_TEXT: &str = "Detail diskusi belum tersedia.";
/// Shown when a thread has no replies
pub const NO_REPLIES_TEXT: &str = "Belum ada balasan. Jadilah yang pertama memberi insight!";

/// Vote control for one thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteBadge {
    /// Thread the control belongs to
    pub thread_id: ThreadId,
    /// Base upvotes plus this browser's vote
    pub count: u32,
    /// Whether this browser has voted (`aria-pressed`)
    pub pressed: bool,
    /// Accessible label
    pub label: String,
}

impl VoteBadge {
    /// Badge for `thread`
    #[must_use]
    pub fn for_thread(thread: &ThreadRecord, ledger: &VoteLedger) -> Self {
        Self {
            thread_id: thread.id.clone(),
            count: ledger.display_count(thread),
            pressed: ledger.has_voted(thread.id.as_str()),
            label: format!("Dukung diskusi: {}", thread.title),
        }
    }
}

/// One thread in the list
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadCard {
    /// Thread id (also the element anchor)
    pub id: ThreadId,
    /// Title
    pub title: String,
    /// Teaser
    pub excerpt: String,
    /// Category pill
    pub category: String,
    /// Shows the answered badge
    pub answered: bool,
    /// "Oleh name • role"
    pub author_label: String,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Last activity, else creation time
    pub activity_at: Option<DateTime<Utc>>,
    /// Reply count
    pub replies: u32,
    /// Tags without the leading `#`
    pub tags: Vec<String>,
    /// Highlighted reply, only when complete
    pub highlight: Option<HighlightReply>,
    /// Vote control
    pub vote: VoteBadge,
}

impl ThreadCard {
    /// Card for `thread`
    #[must_use]
    pub fn for_thread(thread: &ThreadRecord, ledger: &VoteLedger) -> Self {
        let author = thread.author_name().unwrap_or(ANONYMOUS_AUTHOR);
        let author_label = match thread.author_role() {
            Some(role) => format!("Oleh {author} • {role}"),
            None => format!("Oleh {author}"),
        };

        Self {
            id: thread.id.clone(),
            title: thread.title.clone(),
            excerpt: thread.excerpt.clone(),
            category: thread.category.clone(),
            answered: thread.answered,
            author_label,
            created_at: thread.created_at,
            activity_at: thread.activity_at(),
            replies: thread.replies,
            tags: thread.tags.clone(),
            highlight: thread.highlight().cloned(),
            vote: VoteBadge::for_thread(thread, ledger),
        }
    }
}

/// Why the list is empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// The document had no threads
    NoThreads,
    /// Filters excluded everything
    NoMatches {
        /// Active category, if filtered
        category: Option<String>,
        /// Search text, if any
        search: Option<String>,
        /// Active sort
        sort: SortMode,
    },
    /// The document could not be loaded
    LoadFailed,
}

/// Empty-state panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Context for presentation
    pub reason: EmptyReason,
    /// Heading
    pub heading: String,
    /// Body text
    pub message: String,
}

impl EmptyState {
    /// Panel for `reason`
    #[must_use]
    pub fn new(reason: EmptyReason) -> Self {
        let (heading, message) = match &reason {
            EmptyReason::LoadFailed => (
                "Forum sementara tidak tersedia".to_owned(),
                "Terjadi kendala saat memuat data forum. Coba muat ulang halaman atau kembali beberapa saat lagi."
                    .to_owned(),
            ),
            EmptyReason::NoThreads => (
                "Belum ada diskusi".to_owned(),
                "Jadilah yang pertama memulai diskusi di komunitas.".to_owned(),
            ),
            EmptyReason::NoMatches { category, search, sort } => {
                let mut parts = Vec::new();
                if let Some(search) = search {
                    parts.push(format!("kata kunci \"{search}\""));
                }
                if let Some(category) = category {
                    parts.push(format!("kategori {category}"));
                }
                if *sort == SortMode::Unanswered {
                    parts.push("yang belum terjawab".to_owned());
                }
                let message = if parts.is_empty() {
                    "Coba ubah filter atau kata kunci pencarian.".to_owned()
                } else {
                    format!(
                        "Tidak ada diskusi untuk {}. Coba ubah filter atau kata kunci pencarian.",
                        parts.join(", ")
                    )
                };
                ("Diskusi tidak ditemukan".to_owned(), message)
            }
        };
        Self {
            reason,
            heading,
            message,
        }
    }

    /// Whether this panel reports a load failure
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.reason == EmptyReason::LoadFailed
    }
}

/// The thread list region
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadListModel {
    /// Cards in display order
    pub cards: Vec<ThreadCard>,
    /// Empty-state panel when there are no cards
    pub empty: Option<EmptyState>,
}

impl ThreadListModel {
    /// List for the visible threads
    #[must_use]
    pub fn build(
        visible: &[&ThreadRecord],
        store: &ThreadStore,
        view: &ViewState,
        ledger: &VoteLedger,
    ) -> Self {
        if !visible.is_empty() {
            return Self {
                cards: visible
                    .iter()
                    .map(|t| ThreadCard::for_thread(t, ledger))
                    .collect(),
                empty: None,
            };
        }

        let reason = if store.is_empty() {
            EmptyReason::NoThreads
        } else {
            EmptyReason::NoMatches {
                category: view.category_filter().map(str::to_owned),
                search: Some(view.search_raw().trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned),
                sort: view.sort_mode(),
            }
        };
        Self::empty(reason)
    }

    /// List with no cards
    #[must_use]
    pub fn empty(reason: EmptyReason) -> Self {
        Self {
            cards: Vec::new(),
            empty: Some(EmptyState::new(reason)),
        }
    }

    /// Whether no cards are shown
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card ids in display order
    pub fn ids(&self) -> impl Iterator<Item = &ThreadId> {
        self.cards.iter().map(|c| &c.id)
    }
}

/// One category button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    /// Filter value
    pub value: String,
    /// Button text
    pub label: String,
    /// Pressed state
    pub active: bool,
}

/// Category filter bar: `all` first, then sorted categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilters {
    /// Buttons in display order
    pub options: Vec<CategoryOption>,
}

impl CategoryFilters {
    /// Filters for the loaded store
    #[must_use]
    pub fn build(store: &ThreadStore, view: &ViewState) -> Self {
        let active = view.active_category();
        let all = CategoryOption {
            value: ALL_CATEGORIES.to_owned(),
            label: ALL_CATEGORIES_LABEL.to_owned(),
            active: active == ALL_CATEGORIES,
        };
        let options = std::iter::once(all)
            .chain(store.categories().into_iter().map(|category| CategoryOption {
                active: category == active,
                label: category.clone(),
                value: category,
            }))
            .collect();
        Self { options }
    }

    /// The pressed option
    #[must_use]
    pub fn active(&self) -> Option<&CategoryOption> {
        self.options.iter().find(|o| o.active)
    }
}

/// One reply in the detail view
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyView {
    /// Author name or the contributor fallback
    pub author: String,
    /// Author role
    pub role: Option<String>,
    /// Marked as verified answer
    pub is_answer: bool,
    /// Posting time
    pub created_at: Option<DateTime<Utc>>,
    /// Paragraphs
    pub paragraphs: Vec<String>,
}

impl ReplyView {
    fn from_post(post: &Post) -> Self {
        let author = post.author.as_ref();
        Self {
            author: author
                .map(|a| a.name.trim())
                .filter(|n| !n.is_empty())
                .unwrap_or(ANONYMOUS_CONTRIBUTOR)
                .to_owned(),
            role: author
                .map(|a| a.role.trim())
                .filter(|r| !r.is_empty())
                .map(str::to_owned),
            is_answer: post.is_answer,
            created_at: post.created_at,
            paragraphs: post.content.clone(),
        }
    }
}

/// Detail modal content
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadDetail {
    /// Thread id
    pub id: ThreadId,
    /// Category pill, hidden when blank
    pub category: Option<String>,
    /// Title or fallback
    pub title: String,
    /// Excerpt, hidden when blank
    pub subtitle: Option<String>,
    /// "name • role" or the anonymous fallback
    pub author_label: String,
    /// Vote control
    pub vote: VoteBadge,
    /// Reply count
    pub replies: u32,
    /// Creation time
    pub created_at: Option<DateTime<Utc>>,
    /// Last activity
    pub last_activity: Option<DateTime<Utc>>,
    /// Tags
    pub tags: Vec<String>,
    /// Highlighted reply
    pub highlight: Option<HighlightReply>,
    /// Body paragraphs (fallback text when empty)
    pub body: Vec<String>,
    /// Replies in posting order
    pub posts: Vec<ReplyView>,
}

impl ThreadDetail {
    /// Detail for `thread`
    #[must_use]
    pub fn for_thread(thread: &ThreadRecord, ledger: &VoteLedger) -> Self {
        let author_label = match (thread.author_name(), thread.author_role()) {
            (Some(name), Some(role)) => format!("{name} • {role}"),
            (Some(name), None) => name.to_owned(),
            (None, _) => "Pengguna anonim".to_owned(),
        };
        let body = if thread.body.is_empty() {
            vec![EMPTY_BODY_TEXT.to_owned()]
        } else {
            thread.body.clone()
        };

        Self {
            id: thread.id.clone(),
            category: non_blank(&thread.category),
            title: non_blank(&thread.title).unwrap_or_else(|| UNTITLED_THREAD.to_owned()),
            subtitle: non_blank(&thread.excerpt),
            author_label,
            vote: VoteBadge::for_thread(thread, ledger),
            replies: thread.replies,
            created_at: thread.created_at,
            last_activity: thread.last_activity,
            tags: thread.tags.clone(),
            highlight: thread.highlight().cloned(),
            body,
            posts: thread.posts.iter().map(ReplyView::from_post).collect(),
        }
    }

    /// Whether the replies section shows [`NO_REPLIES_TEXT`]
    #[inline]
    #[must_use]
    pub fn has_no_replies(&self) -> bool {
        self.posts.is_empty()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| value.to_owned())
}
