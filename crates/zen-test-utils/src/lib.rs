//! Testing utilities for the Zenotika workspace
//!
//! Shared fixtures, a recording surface and in-memory hosts.

#![allow(missing_docs)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use zen_forum::{
    CategoryFilters, ForumHost, ForumSurface, ModalSurface, SortMode, ThreadDetail,
    ThreadListModel, VoteBadge,
};
use zen_model::{Author, ThreadId, ThreadRecord};
use zen_ui::{FixedClock, MemoryStorage, MemoryUrl};

pub const FORUM_URL: &str = "https://zenotika.id/forum";

/// Fixed "now" used across tests
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    fixed_now() - Duration::hours(hours)
}

/// Fluent thread fixture
#[derive(Debug, Clone)]
pub struct ThreadBuilder {
    record: ThreadRecord,
}

pub fn thread(id: &str) -> ThreadBuilder {
    ThreadBuilder {
        record: ThreadRecord::new(id, format!("Thread {id}")),
    }
}

impl ThreadBuilder {
    pub fn title(mut self, title: &str) -> Self {
        self.record.title = title.to_string();
        self
    }

    pub fn excerpt(mut self, excerpt: &str) -> Self {
        self.record.excerpt = excerpt.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.record.category = category.to_string();
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.record.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    pub fn author(mut self, name: &str, role: &str) -> Self {
        self.record.author = Some(Author::new(name, role));
        self
    }

    pub fn upvotes(mut self, upvotes: u32) -> Self {
        self.record.upvotes = upvotes;
        self
    }

    pub fn replies(mut self, replies: u32) -> Self {
        self.record.replies = replies;
        self
    }

    pub fn answered(mut self, answered: bool) -> Self {
        self.record.answered = answered;
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.record.created_at = Some(at);
        self
    }

    pub fn last_activity(mut self, at: DateTime<Utc>) -> Self {
        self.record.last_activity = Some(at);
        self
    }

    pub fn build(self) -> ThreadRecord {
        self.record
    }
}

/// Forum document with three categories, used by session tests
pub fn sample_forum_document() -> Value {
    json!([
        {
            "id": "magang-2025",
            "title": "Info magang semester genap",
            "excerpt": "Program magang bersertifikat",
            "category": "Karier",
            "tags": ["magang"],
            "author": { "name": "Sari", "role": "Mahasiswa" },
            "createdAt": "2025-02-27T08:00:00Z",
            "lastActivity": "2025-02-28T09:00:00Z",
            "replies": 6,
            "upvotes": 14,
            "answered": false
        },
        {
            "id": "latex-template",
            "title": "Template LaTeX skripsi",
            "excerpt": "Format jurusan terbaru",
            "category": "Akademik",
            "tags": ["skripsi", "latex"],
            "author": { "name": "Dewi", "role": "Alumni" },
            "createdAt": "2025-02-20T08:00:00Z",
            "replies": 2,
            "upvotes": 3,
            "answered": true
        },
        {
            "id": "rust-101",
            "title": "Belajar Rust dari nol",
            "excerpt": "Mulai dari mana?",
            "category": "Pemrograman",
            "tags": ["rust"],
            "author": { "name": "Bima", "role": "Mahasiswa" },
            "createdAt": "2025-03-01T06:00:00Z",
            "lastActivity": "2025-03-01T10:00:00Z",
            "replies": 1,
            "upvotes": 2,
            "answered": false
        }
    ])
}

/// In-memory browser capabilities
#[derive(Debug, Clone)]
pub struct TestHost {
    pub url: Arc<MemoryUrl>,
    pub storage: Arc<MemoryStorage>,
    pub clock: Arc<FixedClock>,
}

impl TestHost {
    pub fn new(href: &str) -> Self {
        Self {
            url: Arc::new(MemoryUrl::new(href)),
            storage: Arc::new(MemoryStorage::new()),
            clock: Arc::new(FixedClock::new(fixed_now())),
        }
    }

    pub fn forum_host(&self) -> ForumHost {
        ForumHost::new(self.url.clone(), self.storage.clone(), self.clock.clone())
    }

    pub fn href(&self) -> String {
        self.url.href().unwrap_or_default()
    }
}

/// Where the recording surface believes focus is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focus {
    Element(String),
    Vote(ThreadId),
    ModalContainer,
    ModalItem(usize),
}

/// Surface that records every write
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub categories: Option<CategoryFilters>,
    pub controls: Option<(String, SortMode)>,
    pub busy: bool,
    pub list: Option<ThreadListModel>,
    pub list_renders: usize,
    pub vote_patches: Vec<VoteBadge>,
    pub scrolls: Vec<(ThreadId, bool)>,
    pub revealed: Vec<ThreadId>,
    pub focus: Option<Focus>,
    pub modal: Option<ThreadDetail>,
    pub modal_visible: bool,
    pub modal_updates: usize,
    pub scroll_locked: bool,
    pub key_capture: bool,
    pub modal_focusables: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page element currently focused (the modal trigger)
    pub fn with_focus_on(mut self, element: &str) -> Self {
        self.focus = Some(Focus::Element(element.to_string()));
        self
    }

    pub fn rendered_ids(&self) -> Vec<String> {
        self.list
            .as_ref()
            .map(|l| l.ids().map(|id| id.as_str().to_string()).collect())
            .unwrap_or_default()
    }

    fn has_card(&self, id: &ThreadId) -> bool {
        self.list
            .as_ref()
            .is_some_and(|l| l.ids().any(|card| card == id))
    }
}

impl ModalSurface for RecordingSurface {
    type Element = String;

    fn active_element(&self) -> Option<String> {
        match &self.focus {
            Some(Focus::Element(el)) => Some(el.clone()),
            _ => None,
        }
    }

    fn focus_element(&mut self, element: &String) {
        self.focus = Some(Focus::Element(element.clone()));
    }

    fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn show_modal(&mut self, detail: &ThreadDetail) {
        self.modal = Some(detail.clone());
        self.modal_visible = true;
    }

    fn update_modal(&mut self, detail: &ThreadDetail) {
        self.modal = Some(detail.clone());
        self.modal_updates += 1;
    }

    fn hide_modal(&mut self) {
        self.modal_visible = false;
    }

    fn focus_modal_container(&mut self) {
        self.focus = Some(Focus::ModalContainer);
    }

    fn set_key_capture(&mut self, enabled: bool) {
        self.key_capture = enabled;
    }

    fn modal_focusable_count(&self) -> usize {
        self.modal_focusables
    }

    fn modal_active_index(&self) -> Option<usize> {
        match self.focus {
            Some(Focus::ModalItem(i)) => Some(i),
            _ => None,
        }
    }

    fn focus_within_modal(&self) -> bool {
        matches!(
            self.focus,
            Some(Focus::ModalContainer | Focus::ModalItem(_))
        )
    }

    fn focus_modal_item(&mut self, index: usize) {
        self.focus = Some(Focus::ModalItem(index));
    }
}

impl ForumSurface for RecordingSurface {
    fn render_categories(&mut self, filters: &CategoryFilters) {
        self.categories = Some(filters.clone());
    }

    fn set_controls(&mut self, search_raw: &str, sort: SortMode) {
        self.controls = Some((search_raw.to_string(), sort));
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn render_list(&mut self, list: &ThreadListModel) {
        self.list = Some(list.clone());
        self.list_renders += 1;
    }

    fn update_vote(&mut self, badge: &VoteBadge) -> bool {
        let Some(list) = self.list.as_mut() else {
            return false;
        };
        let Some(card) = list.cards.iter_mut().find(|c| c.id == badge.thread_id) else {
            return false;
        };
        card.vote = badge.clone();
        self.vote_patches.push(badge.clone());
        true
    }

    fn focus_vote(&mut self, id: &ThreadId) -> bool {
        if !self.has_card(id) {
            return false;
        }
        self.focus = Some(Focus::Vote(id.clone()));
        true
    }

    fn scroll_to_thread(&mut self, id: &ThreadId, smooth: bool) -> bool {
        if !self.has_card(id) {
            return false;
        }
        self.scrolls.push((id.clone(), smooth));
        true
    }

    fn reveal(&mut self, ids: &[ThreadId]) {
        self.revealed.extend_from_slice(ids);
    }
}
