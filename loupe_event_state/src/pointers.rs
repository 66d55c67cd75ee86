// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer tracker: maintain the set of active pointers on a region.
//!
//! ## Usage
//!
//! 1) Call [`PointerTracker::start`] when the region becomes interactive.
//! 2) Forward platform pointer events to [`PointerTracker::down`],
//!    [`PointerTracker::moved`], [`PointerTracker::up`] and [`PointerTracker::cancel`].
//! 3) Each call returns a [`PointerUpdate`] when the event changed the tracked set.
//! 4) Call [`PointerTracker::stop`] to forget every pointer and ignore further events.
//!
//! Down and move events are expected to come from the tracked region. Up and
//! cancel events are usually observed document-wide so that a release outside
//! the region is still seen; pass the event's [`EventTarget`] so the tracker
//! can ignore releases that belong to unrelated parts of the page.
//!
//! The `last_pointer_len` of an update lets consumers tell "the last finger was
//! lifted" apart from "one of several fingers was lifted": for down and move it
//! is the pointer count minus one, for up and cancel it is the count before the
//! pointer was removed.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use loupe_event_state::pointers::{PointerId, PointerInput, PointerPhase, PointerTracker};
//!
//! let mut tracker = PointerTracker::new();
//! tracker.start();
//!
//! let down = tracker.down(PointerInput::new(PointerId(7), Point::new(10.0, 10.0))).unwrap();
//! assert_eq!(down.phase, PointerPhase::Down);
//! assert_eq!(down.last_pointer_len, 0);
//!
//! let up = tracker.up(PointerInput::new(PointerId(7), Point::new(12.0, 10.0))).unwrap();
//! assert_eq!(up.last_pointer_len, 1);
//! assert!(up.pointers.is_empty());
//! ```

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Platform pointer identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// The button that triggered a down or up event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button, touch contact or pen contact.
    #[default]
    Primary,
    /// Any other button (right, middle, back, ...).
    Other,
}

/// Where an event was dispatched, relative to the tracked region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventTarget {
    /// The target is the tracked region or one of its descendants.
    #[default]
    Inside,
    /// The target is the document root.
    Root,
    /// Anything else on the page.
    Outside,
}

/// A raw pointer event, as forwarded by the shell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Pointer identifier.
    pub id: PointerId,
    /// Position in viewport coordinates.
    pub position: Point,
    /// Movement since the previous event of this pointer.
    pub movement: Vec2,
    /// Button for down/up events.
    pub button: PointerButton,
    /// Dispatch target.
    pub target: EventTarget,
}

impl PointerInput {
    /// A primary-button event inside the region with no movement.
    pub fn new(id: PointerId, position: Point) -> Self {
        Self {
            id,
            position,
            movement: Vec2::ZERO,
            button: PointerButton::Primary,
            target: EventTarget::Inside,
        }
    }

    /// Set the movement since the previous event.
    #[must_use]
    pub fn with_movement(mut self, movement: Vec2) -> Self {
        self.movement = movement;
        self
    }

    /// Set the button.
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Set the dispatch target.
    #[must_use]
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }
}

/// Last known state of a tracked pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedPointer {
    /// Pointer identifier.
    pub id: PointerId,
    /// Last position.
    pub position: Point,
    /// Last movement delta.
    pub movement: Vec2,
}

/// Phase of a [`PointerUpdate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    /// A pointer went down.
    Down,
    /// A tracked pointer moved.
    Move,
    /// A tracked pointer was released.
    Up,
    /// A tracked pointer was cancelled by the platform.
    Cancel,
}

/// Active pointers, in the order they went down.
pub type PointerList = SmallVec<[TrackedPointer; 4]>;

/// A normalized pointer event.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerUpdate {
    /// What happened.
    pub phase: PointerPhase,
    /// The pointer the event was about.
    pub pointer: TrackedPointer,
    /// Active pointers after the event was applied.
    pub pointers: PointerList,
    /// See the module docs.
    pub last_pointer_len: usize,
}

/// Tracks active pointers for one region.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    tracking: bool,
    pointers: PointerList,
    last_down: Option<PointerId>,
    drop_armed: bool,
}

impl PointerTracker {
    /// Create a tracker that is not yet tracking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin accepting events.
    pub fn start(&mut self) {
        self.tracking = true;
    }

    /// Stop accepting events and forget every pointer.
    pub fn stop(&mut self) {
        self.tracking = false;
        self.pointers.clear();
        self.last_down = None;
        self.drop_armed = false;
    }

    /// Returns `true` between [`start`](Self::start) and [`stop`](Self::stop).
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Currently active pointers.
    pub fn pointers(&self) -> &[TrackedPointer] {
        &self.pointers
    }

    /// Average position of the active pointers.
    pub fn centroid(&self) -> Option<Point> {
        centroid(&self.pointers)
    }

    /// Handle a pointer-down event.
    pub fn down(&mut self, input: PointerInput) -> Option<PointerUpdate> {
        if !self.tracking || input.button != PointerButton::Primary {
            return None;
        }
        self.last_down = Some(input.id);
        self.drop_armed = true;

        let pointer = TrackedPointer {
            id: input.id,
            position: input.position,
            movement: Vec2::ZERO,
        };
        self.pointers.push(pointer);
        Some(PointerUpdate {
            phase: PointerPhase::Down,
            pointer,
            pointers: self.pointers.clone(),
            last_pointer_len: self.pointers.len() - 1,
        })
    }

    /// Handle a pointer-move event. Unknown pointers are ignored.
    pub fn moved(&mut self, input: PointerInput) -> Option<PointerUpdate> {
        if !self.tracking {
            return None;
        }
        let pointer = self.pointers.iter_mut().find(|p| p.id == input.id)?;
        pointer.position = input.position;
        pointer.movement = input.movement;
        let pointer = *pointer;
        Some(PointerUpdate {
            phase: PointerPhase::Move,
            pointer,
            pointers: self.pointers.clone(),
            last_pointer_len: self.pointers.len() - 1,
        })
    }

    /// Handle a pointer-up event.
    pub fn up(&mut self, input: PointerInput) -> Option<PointerUpdate> {
        if !self.tracking || input.button != PointerButton::Primary {
            return None;
        }
        self.drop_armed = false;
        self.release(input, PointerPhase::Up)
    }

    /// Handle a pointer-cancel event.
    pub fn cancel(&mut self, input: PointerInput) -> Option<PointerUpdate> {
        if !self.tracking {
            return None;
        }
        self.release(input, PointerPhase::Cancel)
    }

    /// Handle a context-menu or auxiliary-click event.
    ///
    /// The pointer that most recently went down is dropped without an update,
    /// once per down event. Browsers do not deliver an up event after a
    /// context menu opens mid-drag.
    pub fn context_menu(&mut self) {
        if !core::mem::take(&mut self.drop_armed) {
            return;
        }
        if let Some(id) = self.last_down {
            self.pointers.retain(|p| p.id != id);
        }
    }

    fn release(&mut self, input: PointerInput, phase: PointerPhase) -> Option<PointerUpdate> {
        if input.target == EventTarget::Outside {
            return None;
        }
        let index = self.pointers.iter().position(|p| p.id == input.id)?;
        let last_pointer_len = self.pointers.len();
        let mut pointer = self.pointers.remove(index);
        pointer.position = input.position;
        Some(PointerUpdate {
            phase,
            pointer,
            pointers: self.pointers.clone(),
            last_pointer_len,
        })
    }
}

/// Average position of `pointers`, or `None` when empty.
pub fn centroid(pointers: &[TrackedPointer]) -> Option<Point> {
    if pointers.is_empty() {
        return None;
    }
    let sum = pointers
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.position.to_vec2());
    Some((sum / pointers.len() as f64).to_point())
}

/// Euclidean distance between two pointers.
pub fn distance(a: &TrackedPointer, b: &TrackedPointer) -> f64 {
    a.position.distance(b.position)
}
