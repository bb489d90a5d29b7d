//! Fade-in reveal tracking
//!
//! Elements start hidden and are revealed the first time they scroll into
//! view. Each tracked element carries a tri-state marker so re-rendering a list
//! never registers the same element twice. Under reduced motion, or when the
//! host has no intersection capability, elements are revealed immediately.
//!
//! The observer is host-agnostic: the host feeds it native intersection
//! entries ([`FadeInObserver::handle_intersections`]) or raw layout
//! ([`FadeInObserver::handle_layout`]) and applies the returned keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Per-element reveal marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    /// Known but not registered
    #[default]
    Unset,
    /// Registered, waiting for first intersection
    Pending,
    /// Revealed; never watched again
    Done,
}

/// Intersection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealOptions {
    /// Fraction of the element that must be visible
    pub threshold: f64,
    /// Pixels trimmed from the bottom of the viewport
    pub bottom_margin_px: f64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin_px: 80.0,
        }
    }
}

impl RevealOptions {
    /// Set threshold
    #[inline]
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set bottom margin
    #[inline]
    #[must_use]
    pub fn with_bottom_margin(mut self, px: f64) -> Self {
        self.bottom_margin_px = px;
        self
    }

    /// Whether an element at `rect` counts as intersecting a viewport of
    /// `viewport_height` pixels.
    ///
    /// The root box spans `0..viewport_height - bottom_margin_px`. Elements
    /// with no height intersect when their top edge lies inside the root.
    #[must_use]
    pub fn is_intersecting(&self, rect: ElementRect, viewport_height: f64) -> bool {
        let root_bottom = (viewport_height - self.bottom_margin_px).max(0.0);
        if rect.height <= 0.0 {
            return rect.top >= 0.0 && rect.top <= root_bottom;
        }

        let bottom = rect.top + rect.height;
        let visible = bottom.min(root_bottom) - rect.top.max(0.0);
        visible > 0.0 && visible / rect.height >= self.threshold
    }
}

/// Element bounds relative to the viewport top
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementRect {
    /// Top edge in pixels (negative when scrolled past)
    pub top: f64,
    /// Height in pixels
    pub height: f64,
}

impl ElementRect {
    /// Create rect
    #[inline]
    #[must_use]
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Native intersection notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEntry<K> {
    /// Element the entry refers to
    pub target: K,
    /// Whether it currently intersects the root
    pub is_intersecting: bool,
}

impl<K> IntersectionEntry<K> {
    /// Create entry
    #[inline]
    #[must_use]
    pub fn new(target: K, is_intersecting: bool) -> Self {
        Self {
            target,
            is_intersecting,
        }
    }
}

/// Tracks reveal state for elements keyed by `K`
#[derive(Debug, Clone)]
pub struct FadeInObserver<K> {
    options: RevealOptions,
    reduced_motion: bool,
    intersection_supported: bool,
    states: IndexMap<K, RevealState>,
}

impl<K: Clone + Eq + Hash> FadeInObserver<K> {
    /// Create observer
    #[must_use]
    pub fn new(options: RevealOptions, reduced_motion: bool, intersection_supported: bool) -> Self {
        Self {
            options,
            reduced_motion,
            intersection_supported,
            states: IndexMap::new(),
        }
    }

    /// Intersection parameters
    #[inline]
    #[must_use]
    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    /// Whether a watcher exists (motion allowed and intersection available)
    #[inline]
    #[must_use]
    pub fn is_watching(&self) -> bool {
        !self.reduced_motion && self.intersection_supported
    }

    /// Whether reduced motion is active
    #[inline]
    #[must_use]
    pub fn is_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Marker for `key` (`Unset` when untracked)
    #[inline]
    #[must_use]
    pub fn state(&self, key: &K) -> RevealState {
        self.states.get(key).copied().unwrap_or_default()
    }

    /// Whether `key` has been revealed
    #[inline]
    #[must_use]
    pub fn is_visible(&self, key: &K) -> bool {
        self.state(key) == RevealState::Done
    }

    /// Elements registered and still waiting
    pub fn pending(&self) -> impl Iterator<Item = &K> {
        self.states
            .iter()
            .filter(|(_, s)| **s == RevealState::Pending)
            .map(|(k, _)| k)
    }

    /// Register elements. Returns those revealed immediately.
    ///
    /// Elements already pending or done are left alone.
    pub fn observe<I>(&mut self, elements: I) -> Vec<K>
    where
        I: IntoIterator<Item = K>,
    {
        let watching = self.is_watching();
        let mut revealed = Vec::new();

        for key in elements {
            let state = self.states.entry(key.clone()).or_default();
            if *state != RevealState::Unset {
                continue;
            }
            if watching {
                *state = RevealState::Pending;
            } else {
                *state = RevealState::Done;
                revealed.push(key);
            }
        }

        revealed
    }

    /// Apply native intersection entries. Returns newly revealed elements.
    pub fn handle_intersections<I>(&mut self, entries: I) -> Vec<K>
    where
        I: IntoIterator<Item = IntersectionEntry<K>>,
    {
        if !self.is_watching() {
            return Vec::new();
        }

        let mut revealed = Vec::new();
        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }
            if let Some(state) = self.states.get_mut(&entry.target) {
                if *state == RevealState::Pending {
                    *state = RevealState::Done;
                    revealed.push(entry.target);
                }
            }
        }
        revealed
    }

    /// Apply layout measurements using [`RevealOptions::is_intersecting`].
    /// Returns newly revealed elements.
    pub fn handle_layout<I>(&mut self, rects: I, viewport_height: f64) -> Vec<K>
    where
        I: IntoIterator<Item = (K, ElementRect)>,
    {
        let options = self.options;
        let entries: Vec<_> = rects
            .into_iter()
            .map(|(key, rect)| {
                IntersectionEntry::new(key, options.is_intersecting(rect, viewport_height))
            })
            .collect();
        self.handle_intersections(entries)
    }

    /// React to a reduced-motion preference change.
    ///
    /// Turning reduced motion on destroys the watcher and reveals every tracked
    /// element, returning those not already revealed. Turning it off rebuilds
    /// the watcher and re-registers everything not yet revealed.
    pub fn set_reduced_motion(&mut self, reduced: bool) -> Vec<K> {
        if self.reduced_motion == reduced {
            return Vec::new();
        }
        self.reduced_motion = reduced;

        if reduced || !self.intersection_supported {
            return self.reveal_all();
        }

        for state in self.states.values_mut() {
            if *state == RevealState::Unset {
                *state = RevealState::Pending;
            }
        }
        Vec::new()
    }

    fn reveal_all(&mut self) -> Vec<K> {
        let mut revealed = Vec::new();
        for (key, state) in &mut self.states {
            if *state != RevealState::Done {
                *state = RevealState::Done;
                revealed.push(key.clone());
            }
        }
        revealed
    }

    /// Stop tracking elements that left the page
    pub fn forget(&mut self, key: &K) {
        self.states.shift_remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watching() -> FadeInObserver<&'static str> {
        FadeInObserver::new(RevealOptions::default(), false, true)
    }

    #[test]
    fn observe_registers_once() {
        let mut observer = watching();
        assert!(observer.observe(["a", "b"]).is_empty());
        assert_eq!(observer.state(&"a"), RevealState::Pending);

        assert!(observer.observe(["a"]).is_empty());
        assert_eq!(observer.pending().count(), 2);
    }

    #[test]
    fn reduced_motion_reveals_immediately() {
        let mut observer = FadeInObserver::new(RevealOptions::default(), true, true);
        assert_eq!(observer.observe(["a", "b"]), vec!["a", "b"]);
        assert!(observer.is_visible(&"a"));
        assert!(observer.observe(["a"]).is_empty());
    }

    #[test]
    fn no_intersection_support_reveals_immediately() {
        let mut observer = FadeInObserver::new(RevealOptions::default(), false, false);
        assert_eq!(observer.observe(["a"]), vec!["a"]);
    }

    #[test]
    fn first_intersection_reveals_and_stops_watching() {
        let mut observer = watching();
        observer.observe(["a", "b"]);

        let revealed = observer.handle_intersections([
            IntersectionEntry::new("a", true),
            IntersectionEntry::new("b", false),
        ]);
        assert_eq!(revealed, vec!["a"]);
        assert!(observer.is_visible(&"a"));
        assert_eq!(observer.state(&"b"), RevealState::Pending);

        assert!(observer
            .handle_intersections([IntersectionEntry::new("a", true)])
            .is_empty());
    }

    #[test]
    fn entering_reduced_motion_reveals_pending() {
        let mut observer = watching();
        observer.observe(["a", "b"]);
        observer.handle_intersections([IntersectionEntry::new("a", true)]);

        assert_eq!(observer.set_reduced_motion(true), vec!["b"]);
        assert!(!observer.is_watching());
        assert!(observer.set_reduced_motion(true).is_empty());
    }

    #[test]
    fn leaving_reduced_motion_rebuilds_watcher() {
        let mut observer = FadeInObserver::new(RevealOptions::default(), true, true);
        observer.observe(["a"]);
        assert!(observer.set_reduced_motion(false).is_empty());
        assert!(observer.is_watching());

        assert!(observer.observe(["c"]).is_empty());
        assert_eq!(observer.state(&"c"), RevealState::Pending);
        assert!(observer.is_visible(&"a"));
    }

    #[test]
    fn layout_applies_threshold_and_margin() {
        let options = RevealOptions::default();
        let viewport = 800.0;

        // root box ends at 720
        assert!(options.is_intersecting(ElementRect::new(100.0, 200.0), viewport));
        assert!(!options.is_intersecting(ElementRect::new(730.0, 100.0), viewport));
        // 10 of 200 px visible: 5% < 10%
        assert!(!options.is_intersecting(ElementRect::new(710.0, 200.0), viewport));
        // 20 of 200 px visible: exactly 10%
        assert!(options.is_intersecting(ElementRect::new(700.0, 200.0), viewport));
        // scrolled past
        assert!(!options.is_intersecting(ElementRect::new(-300.0, 200.0), viewport));

        let mut observer = watching();
        observer.observe(["near", "far"]);
        let revealed = observer.handle_layout(
            [
                ("near", ElementRect::new(50.0, 100.0)),
                ("far", ElementRect::new(2000.0, 100.0)),
            ],
            viewport,
        );
        assert_eq!(revealed, vec!["near"]);
    }
}
