// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Momentum integration for released drags.

use kurbo::{Point, Rect, Vec2};

/// Below this speed on both axes (px per frame) a throw settles.
pub const THROW_STOP_SPEED: f64 = 0.1;

const DECAY: f64 = 0.9;
const BOUNDARY_DECAY: f64 = 0.7;
const BOUNDARY_PULL: f64 = 0.1;

/// Result of one [`MomentumThrow::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThrowStep {
    /// Apply this transform offset; the throw continues next frame.
    Continue(Vec2),
    /// The throw is over; animate the transform offset to this value.
    Settle(Vec2),
}

/// A per-frame momentum integrator.
///
/// Content is considered out of bounds when it no longer covers the viewport
/// center on some axis (its right edge is left of the center, its left edge
/// right of it, and likewise vertically). On such frames the content is pulled
/// back by a tenth of the overshoot and the velocity on that axis loses an
/// extra 30%, on top of the regular 10% decay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentumThrow {
    velocity: Vec2,
}

impl MomentumThrow {
    /// Start a throw with `velocity` in px per frame.
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Advance one frame.
    ///
    /// `offset` is the current transform offset, `bounds` the content's
    /// on-screen rectangle at that offset, and `center` the viewport center.
    pub fn step(&mut self, offset: Vec2, bounds: Rect, center: Point) -> ThrowStep {
        let v = self.velocity;
        if v.x.abs() < THROW_STOP_SPEED && v.y.abs() < THROW_STOP_SPEED {
            return ThrowStep::Settle(settle_offset(offset, bounds, center));
        }

        let mut next = offset + v;
        let mut v = v;
        if bounds.x1 < center.x {
            next.x += (center.x - bounds.x1) * BOUNDARY_PULL;
            v.x *= BOUNDARY_DECAY;
        }
        if bounds.x0 > center.x {
            next.x -= (bounds.x0 - center.x) * BOUNDARY_PULL;
            v.x *= BOUNDARY_DECAY;
        }
        if bounds.y1 < center.y {
            next.y += (center.y - bounds.y1) * BOUNDARY_PULL;
            v.y *= BOUNDARY_DECAY;
        }
        if bounds.y0 > center.y {
            next.y -= (bounds.y0 - center.y) * BOUNDARY_PULL;
            v.y *= BOUNDARY_DECAY;
        }
        self.velocity = v * DECAY;
        ThrowStep::Continue(next)
    }
}

/// Offset that brings content at `bounds` back over `center` on every axis
/// where it has strayed past it. Axes already covering the center keep their
/// current offset.
pub fn settle_offset(offset: Vec2, bounds: Rect, center: Point) -> Vec2 {
    let x = if bounds.x1 < center.x {
        offset.x + (center.x - bounds.x1)
    } else if bounds.x0 > center.x {
        offset.x - (bounds.x0 - center.x)
    } else {
        offset.x
    };
    let y = if bounds.y1 < center.y {
        offset.y + (center.y - bounds.y1)
    } else if bounds.y0 > center.y {
        offset.y - (bounds.y0 - center.y)
    } else {
        offset.y
    };
    Vec2::new(x, y)
}
