// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};

/// Offset of a thumbnail's center from the viewport center.
///
/// The thumbnail position is clamped to at most one thumbnail size outside the
/// viewport, so that items scrolled far away still animate in from a nearby
/// edge.
pub fn thumbnail_offset(thumbnail: Rect, viewport: Size) -> Vec2 {
    let w = thumbnail.width();
    let h = thumbnail.height();
    let left = thumbnail.x0.max(-w).min(viewport.width + w);
    let top = thumbnail.y0.max(-h).min(viewport.height + h);
    Vec2::new(
        left - viewport.width / 2.0 + w / 2.0,
        top - viewport.height / 2.0 + h / 2.0,
    )
}

/// Translation for a zoom of `factor` that keeps `anchor` visually fixed,
/// while following the gesture as it pans from `anchor` to `center`.
///
/// `content_center` is the on-screen center of the content when the gesture
/// started.
pub fn anchored_zoom(content_center: Point, anchor: Point, center: Point, factor: f64) -> Vec2 {
    let zoom = (anchor - content_center) * (1.0 - factor);
    let pan = center - anchor;
    zoom + pan
}
