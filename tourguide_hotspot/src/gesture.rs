// Copyright 2025 the Tourguide Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer gesture recognition for hotspots.
//!
//! [`HotspotPositioner`] turns raw pointer down/move/up events on hotspot markers into
//! authoring-level notifications ([`GestureEvent`]):
//!
//! - **Tap** / **double-tap**: press and release without meaningful movement.
//! - **Drag**: movement beyond a fixed pixel threshold repositions the hotspot, emitting
//!   its new percent position on every move and once more when the pointer is released.
//! - **Hold-to-edit**: a press held past a fixed timeout without moving requests the
//!   hotspot's editor instead of starting a drag.
//!
//! ## State machine
//!
//! Each pointer runs `Idle → Pending → {Dragging | EditRequested} → Idle`.
//! The `Idle` state is simply the absence of a [`DragSession`].
//!
//! ## Usage
//!
//! Time is supplied by the host in milliseconds. Call [`HotspotPositioner::tick`] when
//! [`HotspotPositioner::next_deadline`] passes so hold timers can fire.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use tourguide_hotspot::{GestureEvent, HotspotPositioner, InteractionMode};
//! use tourguide_viewport::{Bounds, Percent};
//!
//! let bounds = Bounds { rect: Rect::new(0.0, 0.0, 400.0, 200.0), approximate: false };
//! let mut positioner: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::Edit);
//!
//! // Press the hotspot sitting at the centre and drag it 100px to the right.
//! positioner.on_down(None, 7, Percent::CENTER, Point::new(200.0, 100.0), bounds, 0);
//! let moved = positioner.on_move(None, Point::new(300.0, 100.0), Some(bounds), 16);
//! assert_eq!(
//!     moved,
//!     Some(GestureEvent::PositionChanged { hotspot: 7, position: Percent::new(75.0, 50.0) }),
//! );
//! ```
//!
//! Hold-to-edit:
//! ```
//! # use kurbo::{Point, Rect};
//! # use tourguide_hotspot::{GestureEvent, HotspotPositioner, InteractionMode};
//! # use tourguide_viewport::{Bounds, Percent};
//! # let bounds = Bounds { rect: Rect::new(0.0, 0.0, 400.0, 200.0), approximate: false };
//! let mut positioner: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::Edit);
//! positioner.on_down(None, 7, Percent::CENTER, Point::new(200.0, 100.0), bounds, 1000);
//!
//! let deadline = positioner.next_deadline().unwrap();
//! let fired = positioner.tick(deadline);
//! assert_eq!(fired.as_slice(), &[GestureEvent::EditRequested(7)]);
//!
//! // Releasing afterwards is not a tap.
//! assert_eq!(positioner.on_up(None, Point::new(200.0, 100.0), None, deadline + 50), None);
//! ```
//!
//! ## Drag math
//!
//! While dragging, the new position is always derived from the pixel position the
//! hotspot had when the press began plus the total pointer movement since then, using
//! the bounds passed to that move. It is never derived from the previously emitted
//! percentage, so repeated conversions cannot accumulate rounding drift, and live
//! pan/zoom during a drag is honored on every move.
//!
//! ## Multi-pointer support
//!
//! Each pointer is tracked independently. A hotspot can be owned by at most one pointer
//! at a time; a second press on a hotspot that already has a session is ignored.

use core::fmt::Debug;
use core::hash::Hash;
use core::num::NonZeroU64;

use alloc::collections::BTreeMap;

use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;
use tourguide_viewport::{Bounds, Percent};

use crate::{to_percent, to_pixel};

/// Pointer identifier for tracking multiple concurrent presses.
pub type PointerId = NonZeroU64;

const DEFAULT_POINTER: PointerId = NonZeroU64::MIN;

/// Fixed thresholds for gesture classification.
///
/// These are constants rather than device-dependent values so that recognition is
/// deterministic under test.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Pointer travel in pixels beyond which a press becomes a drag.
    pub drag_threshold: f64,
    /// Time in milliseconds after which an unmoved press requests the editor.
    pub hold_timeout_ms: u64,
    /// Maximum time in milliseconds between two taps to count as a double-tap.
    pub double_tap_window_ms: u64,
}

impl GestureConfig {
    /// Default drag threshold in pixels.
    pub const DRAG_THRESHOLD: f64 = 5.0;
    /// Default hold-to-edit timeout in milliseconds.
    pub const HOLD_TIMEOUT_MS: u64 = 500;
    /// Default double-tap window in milliseconds.
    pub const DOUBLE_TAP_WINDOW_MS: u64 = 300;
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: Self::DRAG_THRESHOLD,
            hold_timeout_ms: Self::HOLD_TIMEOUT_MS,
            double_tap_window_ms: Self::DOUBLE_TAP_WINDOW_MS,
        }
    }
}

/// Whether hotspots can currently be repositioned and edited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    /// Authoring: presses may become drags or hold-to-edit requests.
    #[default]
    Edit,
    /// Playback/viewing: only taps and double-taps are recognized.
    View,
}

/// Phase of an active [`DragSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// Pressed; waiting to see whether this becomes a tap, drag, or hold.
    Pending,
    /// Moved beyond the drag threshold; the hotspot follows the pointer.
    Dragging,
    /// Held past the timeout; the editor was requested and the press is inert.
    EditRequested,
}

/// State for an active press on a hotspot.
#[derive(Clone, Debug)]
pub struct DragSession<K> {
    /// Hotspot being pressed.
    pub hotspot: K,
    /// Pointer that owns this session.
    pub pointer: PointerId,
    /// Pointer position at press time, in container pixels.
    pub start_pointer: Point,
    /// Hotspot position at press time, in container pixels.
    pub start_pixel: Point,
    /// Timestamp of the press in milliseconds.
    pub down_time: u64,
    /// Current phase.
    pub phase: GesturePhase,
    /// Most recently computed hotspot position.
    pub position: Percent,
    hold_deadline: Option<u64>,
}

impl<K> DragSession<K> {
    fn take_due_hold(&mut self, now: u64) -> bool {
        match self.hold_deadline {
            Some(deadline) if self.phase == GesturePhase::Pending && now >= deadline => {
                self.hold_deadline = None;
                self.phase = GesturePhase::EditRequested;
                true
            }
            _ => false,
        }
    }
}

/// Notification emitted by [`HotspotPositioner`].
#[derive(Clone, Debug, PartialEq)]
pub enum GestureEvent<K> {
    /// The hotspot was dragged to a new position.
    PositionChanged {
        /// Dragged hotspot.
        hotspot: K,
        /// New position.
        position: Percent,
    },
    /// A drag finished; `position` is the final position to persist.
    DragEnded {
        /// Dragged hotspot.
        hotspot: K,
        /// Final position.
        position: Percent,
    },
    /// Single tap.
    Tap(K),
    /// Second tap on the same hotspot within the double-tap window.
    DoubleTap(K),
    /// The hotspot was held without moving; open its editor.
    EditRequested(K),
}

/// Gesture recognizer and coordinate converter for hotspot markers.
///
/// The positioner never writes hotspot data itself; every effect of a gesture is
/// reported as a [`GestureEvent`] for the host to apply.
#[derive(Clone, Debug)]
pub struct HotspotPositioner<K> {
    sessions: BTreeMap<PointerId, DragSession<K>>,
    last_tap: HashMap<K, u64>,
    mode: InteractionMode,
    config: GestureConfig,
}

impl<K: Clone + Eq + Hash + Debug> HotspotPositioner<K> {
    /// Create a positioner with default thresholds.
    #[must_use]
    pub fn new(mode: InteractionMode) -> Self {
        Self::with_config(mode, GestureConfig::default())
    }

    /// Create a positioner with custom thresholds.
    #[must_use]
    pub fn with_config(mode: InteractionMode, config: GestureConfig) -> Self {
        Self {
            sessions: BTreeMap::new(),
            last_tap: HashMap::new(),
            mode,
            config,
        }
    }

    /// Current interaction mode.
    #[must_use]
    pub const fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switch interaction mode. Active presses are abandoned.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        if mode != self.mode {
            self.mode = mode;
            self.sessions.clear();
        }
    }

    /// Active thresholds.
    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Record a pointer press on `hotspot`.
    ///
    /// # Arguments
    /// * `pointer` - Pointer identifier, defaults to 1 if None
    /// * `hotspot` - Pressed hotspot
    /// * `position` - The hotspot's stored position
    /// * `pointer_px` - Pointer position in container pixels
    /// * `bounds` - Current content bounds (possibly the approximate container rectangle)
    /// * `now` - Event timestamp in milliseconds
    ///
    /// # Returns
    /// `false` if the press was ignored because another pointer already owns the hotspot.
    pub fn on_down(
        &mut self,
        pointer: Option<PointerId>,
        hotspot: K,
        position: Percent,
        pointer_px: Point,
        bounds: Bounds,
        now: u64,
    ) -> bool {
        let pointer = pointer.unwrap_or(DEFAULT_POINTER);
        if self
            .sessions
            .iter()
            .any(|(id, s)| *id != pointer && s.hotspot == hotspot)
        {
            tracing::debug!(?hotspot, "hotspot already owned by another pointer");
            return false;
        }

        let hold_deadline = match self.mode {
            InteractionMode::Edit => Some(now.saturating_add(self.config.hold_timeout_ms)),
            InteractionMode::View => None,
        };
        let session = DragSession {
            hotspot,
            pointer,
            start_pointer: pointer_px,
            start_pixel: to_pixel(position, bounds.rect),
            down_time: now,
            phase: GesturePhase::Pending,
            position,
            hold_deadline,
        };
        // A repeated press on the same pointer replaces its old session and timer.
        if let Some(old) = self.sessions.insert(pointer, session) {
            tracing::debug!(hotspot = ?old.hotspot, "replaced stale press");
        }
        true
    }

    /// Process a pointer move.
    ///
    /// `bounds` should be recomputed by the caller for every move, since pan/zoom may be
    /// live during a drag. When it is `None` the move still counts toward the drag
    /// threshold but no position is emitted.
    pub fn on_move(
        &mut self,
        pointer: Option<PointerId>,
        pointer_px: Point,
        bounds: Option<Bounds>,
        now: u64,
    ) -> Option<GestureEvent<K>> {
        let pointer = pointer.unwrap_or(DEFAULT_POINTER);
        let mode = self.mode;
        let threshold = self.config.drag_threshold;
        let session = self.sessions.get_mut(&pointer)?;

        if session.take_due_hold(now) {
            tracing::debug!(hotspot = ?session.hotspot, "hold elapsed before movement");
            return Some(GestureEvent::EditRequested(session.hotspot.clone()));
        }

        match session.phase {
            GesturePhase::EditRequested => None,
            GesturePhase::Pending => {
                if session.start_pointer.distance(pointer_px) <= threshold {
                    return None;
                }
                if mode == InteractionMode::View {
                    tracing::debug!(hotspot = ?session.hotspot, "movement cancelled tap");
                    self.sessions.remove(&pointer);
                    return None;
                }
                session.hold_deadline = None;
                session.phase = GesturePhase::Dragging;
                tracing::debug!(hotspot = ?session.hotspot, "drag started");
                Self::drag_to(session, pointer_px, bounds)
            }
            GesturePhase::Dragging => Self::drag_to(session, pointer_px, bounds),
        }
    }

    fn drag_to(
        session: &mut DragSession<K>,
        pointer_px: Point,
        bounds: Option<Bounds>,
    ) -> Option<GestureEvent<K>> {
        let bounds = bounds?;
        let pixel = session.start_pixel + (pointer_px - session.start_pointer);
        session.position = to_percent(pixel, bounds.rect);
        Some(GestureEvent::PositionChanged {
            hotspot: session.hotspot.clone(),
            position: session.position,
        })
    }

    /// Process a pointer release.
    ///
    /// Always ends the pointer's session. Returns a tap, double-tap or drag-ended
    /// notification where one applies.
    pub fn on_up(
        &mut self,
        pointer: Option<PointerId>,
        pointer_px: Point,
        bounds: Option<Bounds>,
        now: u64,
    ) -> Option<GestureEvent<K>> {
        let pointer = pointer.unwrap_or(DEFAULT_POINTER);
        let mut session = self.sessions.remove(&pointer)?;

        if session.take_due_hold(now) {
            return Some(GestureEvent::EditRequested(session.hotspot));
        }

        match session.phase {
            GesturePhase::EditRequested => None,
            GesturePhase::Dragging => {
                if let Some(bounds) = bounds {
                    let pixel = session.start_pixel + (pointer_px - session.start_pointer);
                    session.position = to_percent(pixel, bounds.rect);
                }
                tracing::debug!(hotspot = ?session.hotspot, position = ?session.position, "drag ended");
                Some(GestureEvent::DragEnded {
                    hotspot: session.hotspot,
                    position: session.position,
                })
            }
            GesturePhase::Pending => Some(self.classify_tap(session.hotspot, now)),
        }
    }

    fn classify_tap(&mut self, hotspot: K, now: u64) -> GestureEvent<K> {
        let window = self.config.double_tap_window_ms;
        match self.last_tap.get(&hotspot) {
            Some(&last) if now.saturating_sub(last) <= window => {
                // A third rapid tap starts a fresh pair.
                self.last_tap.remove(&hotspot);
                GestureEvent::DoubleTap(hotspot)
            }
            _ => {
                self.last_tap.insert(hotspot.clone(), now);
                GestureEvent::Tap(hotspot)
            }
        }
    }

    /// Fire hold timers that are due at `now`.
    pub fn tick(&mut self, now: u64) -> SmallVec<[GestureEvent<K>; 2]> {
        let mut fired = SmallVec::new();
        for session in self.sessions.values_mut() {
            if session.take_due_hold(now) {
                tracing::debug!(hotspot = ?session.hotspot, "edit requested");
                fired.push(GestureEvent::EditRequested(session.hotspot.clone()));
            }
        }
        fired
    }

    /// Earliest pending hold deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.sessions.values().filter_map(|s| s.hold_deadline).min()
    }

    /// Abandon the press for a pointer (for example on pointer-cancel or lost capture).
    ///
    /// # Returns
    /// `true` if a session was cancelled.
    pub fn cancel(&mut self, pointer: Option<PointerId>) -> bool {
        let pointer = pointer.unwrap_or(DEFAULT_POINTER);
        self.sessions.remove(&pointer).is_some()
    }

    /// Abandon all presses.
    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    /// The session owned by `pointer`, if any.
    #[must_use]
    pub fn session(&self, pointer: PointerId) -> Option<&DragSession<K>> {
        self.sessions.get(&pointer)
    }

    /// Iterator over all active sessions.
    pub fn sessions(&self) -> impl Iterator<Item = &DragSession<K>> {
        self.sessions.values()
    }

    /// Returns `true` if `hotspot` is currently being dragged.
    #[must_use]
    pub fn is_dragging(&self, hotspot: &K) -> bool {
        self.sessions
            .values()
            .any(|s| s.phase == GesturePhase::Dragging && s.hotspot == *hotspot)
    }
}

impl<K: Clone + Eq + Hash + Debug> Default for HotspotPositioner<K> {
    fn default() -> Self {
        Self::new(InteractionMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Vec2};

    fn bounds(rect: Rect) -> Bounds {
        Bounds {
            rect,
            approximate: false,
        }
    }

    const CONTENT: Rect = Rect::new(20.0, 10.0, 420.0, 210.0);

    fn pid(n: u64) -> Option<PointerId> {
        NonZeroU64::new(n)
    }

    #[test]
    fn drag_to_right_edge_stores_hundred_percent() {
        let b = bounds(CONTENT);
        let mut p: HotspotPositioner<&str> = HotspotPositioner::new(InteractionMode::Edit);
        let start = to_pixel(Percent::CENTER, CONTENT);
        assert!(p.on_down(None, "h", Percent::CENTER, start, b, 0));

        let target = Point::new(CONTENT.x1, CONTENT.y0 + CONTENT.height() / 2.0);
        let mut last = None;
        for step in 1..=10_u32 {
            let pt = start.lerp(target, f64::from(step) / 10.0);
            if let Some(GestureEvent::PositionChanged { position, .. }) =
                p.on_move(None, pt, Some(b), u64::from(step) * 16)
            {
                last = Some(position);
            }
        }
        let last = last.expect("drag should report positions");
        assert!(last.approx_eq(Percent::new(100.0, 50.0), 1e-9), "{last:?}");

        let Some(GestureEvent::DragEnded { hotspot, position }) =
            p.on_up(None, target, Some(b), 200)
        else {
            panic!("expected drag end");
        };
        assert_eq!(hotspot, "h");
        assert!(position.approx_eq(Percent::new(100.0, 50.0), 1e-9));
        assert!(p.sessions().next().is_none());
    }

    #[test]
    fn small_movement_stays_a_tap() {
        let b = bounds(CONTENT);
        let mut p: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::Edit);
        p.on_down(None, 1, Percent::CENTER, Point::new(100.0, 100.0), b, 0);
        assert_eq!(p.on_move(None, Point::new(103.0, 104.0), Some(b), 10), None);
        assert_eq!(
            p.on_up(None, Point::new(103.0, 104.0), Some(b), 20),
            Some(GestureEvent::Tap(1))
        );
        assert_eq!(p.next_deadline(), None);
        assert!(p.sessions().next().is_none());
        assert!(p.tick(10_000).is_empty());
    }

    #[test]
    fn drag_cancels_hold_timer() {
        let b = bounds(CONTENT);
        let mut p: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::Edit);
        p.on_down(None, 1, Percent::CENTER, Point::new(100.0, 100.0), b, 0);
        assert!(p.next_deadline().is_some());
        assert!(p.on_move(None, Point::new(150.0, 100.0), Some(b), 100).is_some());
        assert_eq!(p.next_deadline(), None);
        assert!(p.tick(10_000).is_empty());
        assert!(p.is_dragging(&1));
    }

    #[test]
    fn hold_fires_before_late_movement() {
        let b = bounds(CONTENT);
        let mut p: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::Edit);
        p.on_down(None, 1, Percent::CENTER, Point::new(100.0, 100.0), b, 0);
        // Host missed the tick; the hold still wins because it elapsed first.
        assert_eq!(
            p.on_move(None, Point::new(200.0, 100.0), Some(b), 600),
            Some(GestureEvent::EditRequested(1))
        );
        assert_eq!(p.on_move(None, Point::new(250.0, 100.0), Some(b), 610), None);
        assert_eq!(p.on_up(None, Point::new(250.0, 100.0), Some(b), 620), None);
    }

    #[test]
    fn double_tap_resets_pairing() {
        let b = bounds(CONTENT);
        let mut p: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::Edit);
        let pt = Point::new(100.0, 100.0);
        let tap_at = |p: &mut HotspotPositioner<u32>, t: u64| {
            p.on_down(None, 1, Percent::CENTER, pt, b, t);
            p.on_up(None, pt, Some(b), t + 50)
        };
        assert_eq!(tap_at(&mut p, 1000), Some(GestureEvent::Tap(1)));
        assert_eq!(tap_at(&mut p, 1200), Some(GestureEvent::DoubleTap(1)));
        // Third rapid tap is evaluated fresh.
        assert_eq!(tap_at(&mut p, 1400), Some(GestureEvent::Tap(1)));
        // Too slow for a pair.
        assert_eq!(tap_at(&mut p, 2000), Some(GestureEvent::Tap(1)));
    }

    #[test]
    fn taps_pair_per_hotspot() {
        let b = bounds(CONTENT);
        let mut p: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::View);
        let pt = Point::new(100.0, 100.0);
        p.on_down(None, 1, Percent::CENTER, pt, b, 0);
        assert_eq!(p.on_up(None, pt, None, 10), Some(GestureEvent::Tap(1)));
        p.on_down(None, 2, Percent::CENTER, pt, b, 100);
        assert_eq!(p.on_up(None, pt, None, 110), Some(GestureEvent::Tap(2)));
    }

    #[test]
    fn view_mode_never_drags_or_holds() {
        let b = bounds(CONTENT);
        let mut p: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::View);
        p.on_down(None, 1, Percent::CENTER, Point::new(100.0, 100.0), b, 0);
        assert_eq!(p.next_deadline(), None);
        assert!(p.tick(5_000).is_empty());
        assert_eq!(p.on_move(None, Point::new(200.0, 100.0), Some(b), 10), None);
        assert_eq!(p.on_up(None, Point::new(200.0, 100.0), Some(b), 20), None);
    }

    #[test]
    fn live_zoom_during_drag_uses_fresh_bounds() {
        let mut p: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::Edit);
        let first = Rect::new(0.0, 0.0, 400.0, 400.0);
        let start = to_pixel(Percent::new(25.0, 25.0), first);
        p.on_down(None, 1, Percent::new(25.0, 25.0), start, bounds(first), 0);

        // Content zoomed 2x about the centre mid-drag.
        let zoomed = Rect::new(-200.0, -200.0, 600.0, 600.0);
        let ev = p.on_move(None, start + Vec2::new(40.0, 0.0), Some(bounds(zoomed)), 16);
        let Some(GestureEvent::PositionChanged { position, .. }) = ev else {
            panic!("expected a position change, got {ev:?}");
        };
        // Pixel (140, 100) inside the zoomed content.
        assert!(position.approx_eq(Percent::new(42.5, 37.5), 1e-9));
    }

    #[test]
    fn unmeasurable_bounds_suppress_positions_but_keep_dragging() {
        let b = bounds(CONTENT);
        let mut p: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::Edit);
        p.on_down(None, 1, Percent::CENTER, Point::new(100.0, 100.0), b, 0);
        assert_eq!(p.on_move(None, Point::new(150.0, 100.0), None, 10), None);
        assert!(p.is_dragging(&1));
        assert!(matches!(
            p.on_move(None, Point::new(160.0, 100.0), Some(b), 20),
            Some(GestureEvent::PositionChanged { .. })
        ));
    }

    #[test]
    fn one_pointer_per_hotspot() {
        let b = bounds(CONTENT);
        let mut p: HotspotPositioner<u32> = HotspotPositioner::new(InteractionMode::Edit);
        assert!(p.on_down(pid(1), 1, Percent::CENTER, Point::ZERO, b, 0));
        assert!(!p.on_down(pid(2), 1, Percent::CENTER, Point::ZERO, b, 0));
        assert!(p.on_down(pid(2), 2, Percent::CENTER, Point::ZERO, b, 0));
        assert_eq!(p.sessions().count(), 2);

        // Independent hold timers fire together.
        let fired = p.tick(500);
        assert_eq!(fired.len(), 2);

        assert!(p.cancel(pid(1)));
        assert!(!p.cancel(pid(1)));
        assert!(p.session(NonZeroU64::MIN.saturating_add(1)).is_some());
    }
}
