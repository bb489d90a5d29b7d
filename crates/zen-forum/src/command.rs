//! User intents delivered to a session

use crate::view_state::SortMode;
use zen_model::ThreadId;
use zen_ui::TrapKey;

/// One forum interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForumCommand {
    /// Search box settled on this text
    Search(String),
    /// Category button pressed
    SelectCategory(String),
    /// Sort selector changed
    SelectSort(SortMode),
    /// Vote button pressed
    ToggleVote(ThreadId),
    /// Detail button pressed
    OpenModal(ThreadId),
    /// Close button, overlay click
    CloseModal,
    /// Key pressed while the modal captures keys
    Key(TrapKey),
    /// Title link clicked
    FocusThread(ThreadId),
    /// Location changed outside the session (back/forward, hash edit)
    LocationChanged,
    /// Reduced-motion preference changed
    ReducedMotion(bool),
}
