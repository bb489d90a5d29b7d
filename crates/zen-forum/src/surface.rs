//! Surface adapter seams
//!
//! The session writes render models through these traits. Methods that target
//! a specific element return `false` when the element is missing so the
//! session can return early instead of failing.

use crate::render::{CategoryFilters, ThreadDetail, ThreadListModel, VoteBadge};
use crate::view_state::SortMode;
use std::fmt;
use zen_model::ThreadId;

/// Detail overlay and page-level focus/scroll access
pub trait ModalSurface {
    /// Handle to a focusable page element (restored on close)
    type Element: Clone + fmt::Debug;

    /// Element currently holding focus
    fn active_element(&self) -> Option<Self::Element>;

    /// Move focus to `element`
    fn focus_element(&mut self, element: &Self::Element);

    /// Whether page scrolling is currently locked
    fn is_scroll_locked(&self) -> bool;

    /// Lock or unlock page scrolling
    fn set_scroll_locked(&mut self, locked: bool);

    /// Render `detail` into the overlay and show it
    fn show_modal(&mut self, detail: &ThreadDetail);

    /// Re-render the overlay content without changing visibility or focus
    fn update_modal(&mut self, detail: &ThreadDetail);

    /// Hide the overlay
    fn hide_modal(&mut self);

    /// Focus the overlay container
    fn focus_modal_container(&mut self);

    /// Install or remove the capturing key handler
    fn set_key_capture(&mut self, enabled: bool);

    /// Number of focusable elements inside the overlay, in tab order
    fn modal_focusable_count(&self) -> usize;

    /// Index of the focused overlay element, if focus is on one
    fn modal_active_index(&self) -> Option<usize>;

    /// Whether focus is anywhere inside the overlay
    fn focus_within_modal(&self) -> bool;

    /// Focus the overlay element at `index`
    fn focus_modal_item(&mut self, index: usize);
}

/// Forum region adapter
pub trait ForumSurface: ModalSurface {
    /// Replace the category buttons
    fn render_categories(&mut self, filters: &CategoryFilters);

    /// Reflect view-state in the search box and sort selector
    fn set_controls(&mut self, search_raw: &str, sort: SortMode);

    /// Toggle the list's busy indicator
    fn set_busy(&mut self, busy: bool);

    /// Replace the thread list
    fn render_list(&mut self, list: &ThreadListModel);

    /// Patch one card's vote control in place
    fn update_vote(&mut self, badge: &VoteBadge) -> bool;

    /// Focus a card's vote control (falls back to the card)
    fn focus_vote(&mut self, id: &ThreadId) -> bool;

    /// Scroll a card into view
    fn scroll_to_thread(&mut self, id: &ThreadId, smooth: bool) -> bool;

    /// Mark cards as revealed
    fn reveal(&mut self, ids: &[ThreadId]);
}
