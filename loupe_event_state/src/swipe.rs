// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Swipe tracker: axis-locked single-pointer swipes.
//!
//! The first movement that is clearly horizontal or vertical locks the swipe to
//! that axis for the rest of the gesture. On release the total offset along the
//! locked axis decides the outcome:
//!
//! | Axis       | Offset                         | Outcome                      |
//! |------------|--------------------------------|------------------------------|
//! | vertical   | `abs(dy) > 144`                | [`SwipeOutcome::Dismiss`]    |
//! | horizontal | `dx > 64`                      | [`SwipeOutcome::Previous`]   |
//! | horizontal | `dx < -64`                     | [`SwipeOutcome::Next`]       |
//! | either     | otherwise                      | [`SwipeOutcome::SnapBack`]   |
//!
//! Horizontal swipes can be disallowed (for example when there is only one item
//! to show); vertical swipes are always tracked.

use kurbo::{Point, Vec2};

/// Vertical distance past which a swipe dismisses.
pub const DISMISS_DISTANCE: f64 = 144.0;

/// Horizontal distance past which a swipe navigates.
pub const NAVIGATE_DISTANCE: f64 = 64.0;

/// Axis a swipe is locked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeAxis {
    /// Left/right.
    Horizontal,
    /// Up/down.
    Vertical,
}

/// Result of a finished swipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Vertical swipe far enough to close.
    Dismiss,
    /// Swipe to the right: show the previous item.
    Previous,
    /// Swipe to the left: show the next item.
    Next,
    /// Not far enough; animate back along this axis.
    SnapBack(SwipeAxis),
}

/// Live drag along the locked axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipeDrag {
    /// Locked axis.
    pub axis: SwipeAxis,
    /// Offset from the start along `axis`, in pixels.
    pub offset: f64,
}

/// Tracks one swipe at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwipeTracker {
    start: Option<Point>,
    current: Point,
    axis: Option<SwipeAxis>,
}

impl SwipeTracker {
    /// Create an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a swipe at `position`.
    pub fn begin(&mut self, position: Point) {
        self.start = Some(position);
        self.current = position;
        self.axis = None;
    }

    /// Returns `true` between [`begin`](Self::begin) and [`finish`](Self::finish).
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Locked axis, if any.
    pub fn axis(&self) -> Option<SwipeAxis> {
        self.axis
    }

    /// Total offset from the start.
    pub fn offset(&self) -> Option<Vec2> {
        self.start.map(|start| self.current - start)
    }

    /// Move the pointer, returning the drag to apply when an axis is locked.
    pub fn update(&mut self, position: Point, allow_horizontal: bool) -> Option<SwipeDrag> {
        let start = self.start?;
        self.current = position;
        let delta = position - start;

        let vertical = match self.axis {
            Some(SwipeAxis::Vertical) => true,
            Some(SwipeAxis::Horizontal) => false,
            None if delta.y.abs() > delta.x.abs() => true,
            None if delta.x.abs() > delta.y.abs() => false,
            None => return None,
        };

        if vertical {
            self.axis = Some(SwipeAxis::Vertical);
            Some(SwipeDrag {
                axis: SwipeAxis::Vertical,
                offset: delta.y,
            })
        } else if allow_horizontal {
            self.axis = Some(SwipeAxis::Horizontal);
            Some(SwipeDrag {
                axis: SwipeAxis::Horizontal,
                offset: delta.x,
            })
        } else {
            None
        }
    }

    /// End the swipe and classify it. Returns `None` if no axis was locked.
    pub fn finish(&mut self, allow_horizontal: bool) -> Option<SwipeOutcome> {
        let delta = self.offset();
        let axis = self.axis;
        *self = Self::default();
        let delta = delta?;

        match axis? {
            SwipeAxis::Vertical if delta.y.abs() > DISMISS_DISTANCE => Some(SwipeOutcome::Dismiss),
            SwipeAxis::Vertical => Some(SwipeOutcome::SnapBack(SwipeAxis::Vertical)),
            SwipeAxis::Horizontal if !allow_horizontal => None,
            SwipeAxis::Horizontal if delta.x > NAVIGATE_DISTANCE => Some(SwipeOutcome::Previous),
            SwipeAxis::Horizontal if delta.x < -NAVIGATE_DISTANCE => Some(SwipeOutcome::Next),
            SwipeAxis::Horizontal => Some(SwipeOutcome::SnapBack(SwipeAxis::Horizontal)),
        }
    }
}
