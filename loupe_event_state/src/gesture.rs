// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture interpreter: turn pointer updates into zoom and pan actions.
//!
//! The interpreter is a small state machine over idle, single-pointer drag and
//! two-pointer pinch. It does not own any geometry; it reports what the active
//! media box should do:
//!
//! - [`GestureAction::CancelMotion`] on every down, so an in-flight throw or
//!   settle animation stops under the finger.
//! - [`GestureAction::Anchor`] to fix the reference point of the gesture.
//! - [`GestureAction::ScaleMove`] with a factor relative to the gesture start and
//!   the current centroid (pan is encoded as the centroid moving away from the
//!   anchor).
//! - [`GestureAction::Release`] when a pinch ends and the transform should be
//!   folded into the box's persistent state.
//! - [`GestureAction::Throw`] when a single-pointer drag ends, with the last
//!   movement as velocity.
//!
//! Single-pointer drags only happen when the box is zoomed in, and are
//! suppressed for a short cooldown after a pinch ends so the remaining finger is
//! not misread as a drag. The first drag movement after a pinch re-anchors at
//! the finger, so the content follows it from where it is rather than from the
//! old pinch centroid. A second finger landing during a drag releases the drag
//! before the pinch starts. Fingers beyond the second do not affect a pinch.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::pointers::{PointerPhase, PointerUpdate, centroid, distance};

/// Default time after a pinch ends during which drags are suppressed.
pub const PINCH_COOLDOWN_MS: u64 = 111;

/// What the active box should do in response to a pointer update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureAction {
    /// Stop any momentum or settle animation started by a previous gesture.
    CancelMotion,
    /// Use this point as the fixed reference of the gesture.
    Anchor(Point),
    /// Apply a zoom of `factor` about the anchor, panned to `center`.
    ScaleMove {
        /// Scale relative to the size at gesture start.
        factor: f64,
        /// Current centroid of the pointers.
        center: Point,
    },
    /// A pinch ended; finalize the transform.
    Release,
    /// A drag ended; start a momentum throw with this velocity (px per frame).
    Throw(Vec2),
}

/// Actions produced by one update.
pub type GestureActions = SmallVec<[GestureAction; 3]>;

/// Pinch/drag state machine.
#[derive(Clone, Copy, Debug)]
pub struct GestureInterpreter {
    pinching: bool,
    dragging: bool,
    reanchor: bool,
    initial_distance: f64,
    last_pinch_end: Option<u64>,
    cooldown: u64,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureInterpreter {
    /// Create an idle interpreter with the default pinch cooldown.
    pub fn new() -> Self {
        Self {
            pinching: false,
            dragging: false,
            reanchor: false,
            initial_distance: 0.0,
            last_pinch_end: None,
            cooldown: PINCH_COOLDOWN_MS,
        }
    }

    /// Override the pinch cooldown.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown_ms: u64) -> Self {
        self.cooldown = cooldown_ms;
        self
    }

    /// Returns `true` while pinching, and for the cooldown after a pinch ends.
    pub fn is_pinching(&self, now: u64) -> bool {
        self.pinching
            || self
                .last_pinch_end
                .is_some_and(|end| now.saturating_sub(end) < self.cooldown)
    }

    /// Forget any gesture in progress.
    pub fn reset(&mut self) {
        *self = Self::new().with_cooldown(self.cooldown);
    }

    /// Interpret one pointer update.
    ///
    /// `zoomed_in` is whether the active box is currently larger than its
    /// full-screen size; `now` is a millisecond timestamp.
    pub fn interpret(&mut self, update: &PointerUpdate, zoomed_in: bool, now: u64) -> GestureActions {
        let mut actions = GestureActions::new();
        let count = update.pointers.len();
        match update.phase {
            PointerPhase::Down => {
                actions.push(GestureAction::CancelMotion);
                if zoomed_in && count == 1 && !self.is_pinching(now) {
                    if let Some(center) = centroid(&update.pointers) {
                        actions.push(GestureAction::Anchor(center));
                        self.reanchor = false;
                    }
                }
                if count >= 2 && !self.pinching {
                    if core::mem::take(&mut self.dragging) {
                        actions.push(GestureAction::Release);
                    }
                    self.pinching = true;
                    self.initial_distance = distance(&update.pointers[0], &update.pointers[1]);
                    if let Some(center) = centroid(&update.pointers[..2]) {
                        actions.push(GestureAction::Anchor(center));
                    }
                }
            }
            PointerPhase::Move => {
                if zoomed_in && count == 1 && update.last_pointer_len == 0 && !self.is_pinching(now)
                {
                    if let Some(center) = centroid(&update.pointers) {
                        if core::mem::take(&mut self.reanchor) {
                            actions.push(GestureAction::Anchor(center));
                        } else {
                            self.dragging = true;
                            actions.push(GestureAction::ScaleMove { factor: 1.0, center });
                        }
                    }
                }
                if count >= 2 && self.pinching && self.initial_distance > 0.0 {
                    let current = distance(&update.pointers[0], &update.pointers[1]);
                    if let Some(center) = centroid(&update.pointers[..2]) {
                        actions.push(GestureAction::ScaleMove {
                            factor: current / self.initial_distance,
                            center,
                        });
                    }
                }
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                if self.pinching {
                    self.pinching = false;
                    self.reanchor = true;
                    self.last_pinch_end = Some(now);
                    actions.push(GestureAction::Release);
                    if let Some(center) = centroid(&update.pointers) {
                        actions.push(GestureAction::Anchor(center));
                    }
                } else if count == 0 {
                    self.dragging = false;
                    if zoomed_in && !self.is_pinching(now) {
                        actions.push(GestureAction::Throw(update.pointer.movement));
                    }
                }
            }
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointers::{PointerId, PointerInput, PointerTracker};

    fn at(id: u64, x: f64, y: f64) -> PointerInput {
        PointerInput::new(PointerId(id), Point::new(x, y))
    }

    fn setup() -> (PointerTracker, GestureInterpreter) {
        let mut tracker = PointerTracker::new();
        tracker.start();
        (tracker, GestureInterpreter::new())
    }

    #[test]
    fn down_always_cancels_motion() {
        let (mut tracker, mut gestures) = setup();
        let update = tracker.down(at(1, 5.0, 5.0)).unwrap();
        let actions = gestures.interpret(&update, false, 0);
        assert_eq!(actions.as_slice(), &[GestureAction::CancelMotion]);
    }

    #[test]
    fn zoomed_in_down_anchors_at_pointer() {
        let (mut tracker, mut gestures) = setup();
        let update = tracker.down(at(1, 5.0, 7.0)).unwrap();
        let actions = gestures.interpret(&update, true, 0);
        assert_eq!(
            actions.as_slice(),
            &[
                GestureAction::CancelMotion,
                GestureAction::Anchor(Point::new(5.0, 7.0))
            ]
        );
    }

    #[test]
    fn pinch_reports_distance_ratio() {
        let (mut tracker, mut gestures) = setup();
        let a = tracker.down(at(1, 350.0, 300.0)).unwrap();
        gestures.interpret(&a, false, 0);
        let b = tracker.down(at(2, 450.0, 300.0)).unwrap();
        let actions = gestures.interpret(&b, false, 0);
        assert_eq!(actions[1], GestureAction::Anchor(Point::new(400.0, 300.0)));
        assert!(gestures.is_pinching(0));

        tracker.moved(at(1, 300.0, 300.0));
        let m = tracker.moved(at(2, 500.0, 300.0)).unwrap();
        let actions = gestures.interpret(&m, false, 10);
        assert_eq!(
            actions.as_slice(),
            &[GestureAction::ScaleMove {
                factor: 2.0,
                center: Point::new(400.0, 300.0)
            }]
        );
    }

    #[test]
    fn pinch_release_then_cooldown_suppresses_drag() {
        let (mut tracker, mut gestures) = setup();
        for (id, x) in [(1, 0.0), (2, 100.0)] {
            let u = tracker.down(at(id, x, 0.0)).unwrap();
            gestures.interpret(&u, true, 0);
        }
        let up = tracker.up(at(2, 100.0, 0.0)).unwrap();
        let actions = gestures.interpret(&up, true, 1000);
        assert_eq!(
            actions.as_slice(),
            &[
                GestureAction::Release,
                GestureAction::Anchor(Point::new(0.0, 0.0))
            ]
        );

        // The remaining finger moves within the cooldown: no drag.
        let m = tracker.moved(at(1, 10.0, 0.0)).unwrap();
        assert!(gestures.interpret(&m, true, 1050).is_empty());
        assert!(gestures.is_pinching(1110));
        assert!(!gestures.is_pinching(1111));

        // After the cooldown the first move re-anchors at the finger.
        let m = tracker.moved(at(1, 20.0, 0.0)).unwrap();
        let actions = gestures.interpret(&m, true, 1200);
        assert_eq!(
            actions.as_slice(),
            &[GestureAction::Anchor(Point::new(20.0, 0.0))]
        );

        // Then it pans.
        let m = tracker.moved(at(1, 25.0, 0.0)).unwrap();
        let actions = gestures.interpret(&m, true, 1216);
        assert_eq!(
            actions.as_slice(),
            &[GestureAction::ScaleMove {
                factor: 1.0,
                center: Point::new(25.0, 0.0)
            }]
        );
    }

    #[test]
    fn second_finger_during_drag_releases_the_drag() {
        let (mut tracker, mut gestures) = setup();
        let d = tracker.down(at(1, 100.0, 100.0)).unwrap();
        gestures.interpret(&d, true, 0);
        let m = tracker.moved(at(1, 130.0, 100.0)).unwrap();
        assert_eq!(gestures.interpret(&m, true, 16).len(), 1);

        let d = tracker.down(at(2, 230.0, 100.0)).unwrap();
        let actions = gestures.interpret(&d, true, 32);
        assert_eq!(
            actions.as_slice(),
            &[
                GestureAction::CancelMotion,
                GestureAction::Release,
                GestureAction::Anchor(Point::new(180.0, 100.0))
            ]
        );
    }

    #[test]
    fn third_finger_does_not_rebase_a_pinch() {
        let (mut tracker, mut gestures) = setup();
        for (id, x) in [(1, 300.0), (2, 400.0)] {
            let u = tracker.down(at(id, x, 300.0)).unwrap();
            gestures.interpret(&u, false, 0);
        }
        let m = tracker.moved(at(2, 500.0, 300.0)).unwrap();
        gestures.interpret(&m, false, 16);

        let d = tracker.down(at(3, 600.0, 600.0)).unwrap();
        let actions = gestures.interpret(&d, false, 32);
        assert_eq!(actions.as_slice(), &[GestureAction::CancelMotion]);

        let m = tracker.moved(at(2, 500.0, 300.0)).unwrap();
        match gestures.interpret(&m, false, 48).as_slice() {
            [GestureAction::ScaleMove { factor, .. }] => assert_eq!(*factor, 2.0),
            other => panic!("unexpected actions {other:?}"),
        }
    }

    #[test]
    fn pinch_center_ignores_extra_fingers() {
        let (mut tracker, mut gestures) = setup();
        for (id, x) in [(1, 300.0), (2, 500.0)] {
            let u = tracker.down(at(id, x, 300.0)).unwrap();
            gestures.interpret(&u, false, 0);
        }
        let d = tracker.down(at(3, 900.0, 900.0)).unwrap();
        gestures.interpret(&d, false, 16);
        let m = tracker.moved(at(3, 950.0, 900.0)).unwrap();
        assert_eq!(
            gestures.interpret(&m, false, 32).as_slice(),
            &[GestureAction::ScaleMove {
                factor: 1.0,
                center: Point::new(400.0, 300.0)
            }]
        );
    }

    #[test]
    fn drag_release_throws_last_movement() {
        let (mut tracker, mut gestures) = setup();
        let d = tracker.down(at(1, 0.0, 0.0)).unwrap();
        gestures.interpret(&d, true, 0);
        tracker.moved(at(1, 12.0, 3.0).with_movement(Vec2::new(12.0, 3.0)));
        let up = tracker.up(at(1, 12.0, 3.0)).unwrap();
        let actions = gestures.interpret(&up, true, 500);
        assert_eq!(
            actions.as_slice(),
            &[GestureAction::Throw(Vec2::new(12.0, 3.0))]
        );
    }

    #[test]
    fn not_zoomed_single_pointer_is_inert() {
        let (mut tracker, mut gestures) = setup();
        let d = tracker.down(at(1, 0.0, 0.0)).unwrap();
        gestures.interpret(&d, false, 0);
        let m = tracker.moved(at(1, 50.0, 0.0)).unwrap();
        assert!(gestures.interpret(&m, false, 10).is_empty());
        let up = tracker.up(at(1, 50.0, 0.0)).unwrap();
        assert!(gestures.interpret(&up, false, 20).is_empty());
    }
}
