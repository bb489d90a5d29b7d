//! Keyboard focus trap for overlays
//!
//! Pure decision function: the host reports the key, the overlay's focusable
//! elements (in tab order) and where focus currently is; [`trap_key`] says what
//! to do.

/// Key relevant to the trap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapKey {
    /// Escape
    Escape,
    /// Tab, optionally with Shift
    Tab {
        /// Shift held
        shift: bool,
    },
    /// Anything else
    Other,
}

impl TrapKey {
    /// Map a DOM `KeyboardEvent.key` value
    #[must_use]
    pub fn from_key(key: &str, shift: bool) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab { shift },
            _ => Self::Other,
        }
    }
}

/// What the host must do with the key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapAction {
    /// Close the overlay (event consumed)
    Close,
    /// Focus the focusable at this index (event consumed)
    Focus(usize),
    /// Focus the overlay container itself (event consumed)
    FocusContainer,
    /// Let the browser handle the event
    Pass,
}

impl TrapAction {
    /// Whether the host should prevent the default browser action
    #[inline]
    #[must_use]
    pub fn prevents_default(self) -> bool {
        !matches!(self, Self::Pass)
    }
}

/// Decide how an open overlay handles `key`.
///
/// `focusable_count` is the number of focusable elements inside the overlay,
/// `active` the index of the one holding focus (if any), and `active_inside`
/// whether focus is anywhere inside the overlay (including the container).
#[must_use]
pub fn trap_key(
    key: TrapKey,
    focusable_count: usize,
    active: Option<usize>,
    active_inside: bool,
) -> TrapAction {
    let shift = match key {
        TrapKey::Escape => return TrapAction::Close,
        TrapKey::Other => return TrapAction::Pass,
        TrapKey::Tab { shift } => shift,
    };

    if focusable_count == 0 {
        return TrapAction::FocusContainer;
    }
    let last = focusable_count - 1;

    if shift {
        if !active_inside || active == Some(0) {
            return TrapAction::Focus(last);
        }
    } else if !active_inside || active == Some(last) {
        return TrapAction::Focus(0);
    }

    TrapAction::Pass
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB: TrapKey = TrapKey::Tab { shift: false };
    const SHIFT_TAB: TrapKey = TrapKey::Tab { shift: true };

    #[test]
    fn escape_closes() {
        assert_eq!(trap_key(TrapKey::Escape, 3, Some(1), true), TrapAction::Close);
    }

    #[test]
    fn tab_wraps_last_to_first() {
        assert_eq!(trap_key(TAB, 3, Some(2), true), TrapAction::Focus(0));
        assert_eq!(trap_key(TAB, 3, Some(1), true), TrapAction::Pass);
    }

    #[test]
    fn shift_tab_wraps_first_to_last() {
        assert_eq!(trap_key(SHIFT_TAB, 3, Some(0), true), TrapAction::Focus(2));
        assert_eq!(trap_key(SHIFT_TAB, 3, Some(2), true), TrapAction::Pass);
    }

    #[test]
    fn focus_outside_is_pulled_in() {
        assert_eq!(trap_key(SHIFT_TAB, 3, None, false), TrapAction::Focus(2));
        assert_eq!(trap_key(TAB, 3, None, false), TrapAction::Focus(0));
    }

    #[test]
    fn empty_overlay_focuses_container() {
        assert_eq!(trap_key(TAB, 0, None, true), TrapAction::FocusContainer);
        assert!(TrapAction::FocusContainer.prevents_default());
    }

    #[test]
    fn other_keys_pass() {
        assert_eq!(trap_key(TrapKey::from_key("a", false), 3, Some(0), true), TrapAction::Pass);
        assert_eq!(TrapKey::from_key("Tab", true), SHIFT_TAB);
    }
}
