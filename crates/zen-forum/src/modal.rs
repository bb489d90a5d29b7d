//! Thread detail modal
//!
//! Two states, closed and open on one thread. Opening remembers the element
//! that had focus and whether page scroll was already locked; closing only
//! releases a lock this controller took and optionally restores focus.

use crate::render::ThreadDetail;
use crate::surface::ModalSurface;
use zen_model::ThreadId;
use zen_ui::{trap_key, TrapAction, TrapKey};

/// Modal state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    /// Hidden
    #[default]
    Closed,
    /// Showing a thread
    Open(ThreadId),
}

/// Result of [`ModalController::open`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalTransition {
    /// Closed → open
    Opened,
    /// Already open; content replaced
    Swapped,
}

/// Focus and scroll bookkeeping for the detail overlay
#[derive(Debug)]
pub struct ModalController<E> {
    state: ModalState,
    trigger: Option<E>,
    scroll_was_locked: bool,
}

impl<E> Default for ModalController<E> {
    fn default() -> Self {
        Self {
            state: ModalState::Closed,
            trigger: None,
            scroll_was_locked: false,
        }
    }
}

impl<E: Clone> ModalController<E> {
    /// Closed controller
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &ModalState {
        &self.state
    }

    /// Whether the overlay is showing
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    /// Thread being shown
    #[inline]
    #[must_use]
    pub fn open_thread(&self) -> Option<&ThreadId> {
        match &self.state {
            ModalState::Open(id) => Some(id),
            ModalState::Closed => None,
        }
    }

    /// Whether the overlay shows `id`
    #[inline]
    #[must_use]
    pub fn is_showing(&self, id: &str) -> bool {
        self.open_thread().is_some_and(|open| open.as_str() == id)
    }

    /// Element focus returns to on close
    #[inline]
    #[must_use]
    pub fn trigger(&self) -> Option<&E> {
        self.trigger.as_ref()
    }

    /// Show `detail`.
    ///
    /// From closed: remember the trigger and scroll lock, lock scroll, focus
    /// the container and capture keys. From open: replace the content only.
    pub fn open<S>(&mut self, detail: &ThreadDetail, surface: &mut S) -> ModalTransition
    where
        S: ModalSurface<Element = E> + ?Sized,
    {
        if self.is_open() {
            surface.update_modal(detail);
            self.state = ModalState::Open(detail.id.clone());
            return ModalTransition::Swapped;
        }

        surface.show_modal(detail);
        self.trigger = surface.active_element();
        self.scroll_was_locked = surface.is_scroll_locked();
        if !self.scroll_was_locked {
            surface.set_scroll_locked(true);
        }
        surface.set_key_capture(true);
        surface.focus_modal_container();
        self.state = ModalState::Open(detail.id.clone());

        ModalTransition::Opened
    }

    /// Re-render the content when it shows the same thread
    pub fn refresh<S>(&self, detail: &ThreadDetail, surface: &mut S) -> bool
    where
        S: ModalSurface<Element = E> + ?Sized,
    {
        if !self.is_showing(detail.id.as_str()) {
            return false;
        }
        surface.update_modal(detail);
        true
    }

    /// Hide the overlay. Returns `false` when already closed.
    pub fn close<S>(&mut self, restore_focus: bool, surface: &mut S) -> bool
    where
        S: ModalSurface<Element = E> + ?Sized,
    {
        if !self.is_open() {
            return false;
        }

        surface.hide_modal();
        if !self.scroll_was_locked {
            surface.set_scroll_locked(false);
        }
        surface.set_key_capture(false);
        self.state = ModalState::Closed;

        let trigger = self.trigger.take();
        if restore_focus {
            if let Some(element) = trigger {
                surface.focus_element(&element);
            }
        }
        self.scroll_was_locked = false;
        true
    }

    /// Apply the focus trap for `key`. Closing is left to the caller so it can
    /// also update the URL.
    pub fn handle_key<S>(&mut self, key: TrapKey, surface: &mut S) -> TrapAction
    where
        S: ModalSurface<Element = E> + ?Sized,
    {
        if !self.is_open() {
            return TrapAction::Pass;
        }

        let action = trap_key(
            key,
            surface.modal_focusable_count(),
            surface.modal_active_index(),
            surface.focus_within_modal(),
        );
        match action {
            TrapAction::Focus(index) => surface.focus_modal_item(index),
            TrapAction::FocusContainer => surface.focus_modal_container(),
            TrapAction::Close | TrapAction::Pass => {}
        }
        action
    }
}
