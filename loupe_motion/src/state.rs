// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};

/// In-progress gesture transform: an offset and a uniform scale about the
/// box's center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxTransform {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
    /// Uniform scale.
    pub scale: f64,
}

impl BoxTransform {
    /// No offset, scale 1.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    /// A transform with the given offset and scale.
    pub const fn new(offset: Vec2, scale: f64) -> Self {
        Self {
            x: offset.x,
            y: offset.y,
            scale,
        }
    }

    /// The offset component.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Default for BoxTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Observable state of one media box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxState {
    /// Laid-out width.
    pub width: f64,
    /// Laid-out height.
    pub height: f64,
    /// Gesture transform applied on top of the layout.
    pub transform: BoxTransform,
    /// Persistent translation from the viewport center.
    pub translate: Vec2,
    /// Set while a gesture has shrunk the box below its close threshold.
    pub below_min_width: bool,
}

impl BoxState {
    /// Laid-out size, without the gesture scale.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// On-screen bounds when the box is centered on `origin` (usually the
    /// viewport center).
    pub fn bounds(&self, origin: Point) -> Rect {
        let center = origin + self.translate + self.transform.offset();
        Rect::from_center_size(
            center,
            Size::new(
                self.width * self.transform.scale,
                self.height * self.transform.scale,
            ),
        )
    }

    /// Apply every field present in `patch`.
    pub fn apply(&mut self, patch: &StatePatch) {
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(transform) = patch.transform {
            self.transform = transform;
        }
        if let Some(translate) = patch.translate {
            self.translate = translate;
        }
        if let Some(below) = patch.below_min_width {
            self.below_min_width = below;
        }
    }
}

/// A set of field writes to a [`BoxState`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatePatch {
    /// New width.
    pub width: Option<f64>,
    /// New height.
    pub height: Option<f64>,
    /// New transform.
    pub transform: Option<BoxTransform>,
    /// New translation.
    pub translate: Option<Vec2>,
    /// New below-minimum marker.
    pub below_min_width: Option<bool>,
}

impl StatePatch {
    /// Returns `true` if the patch writes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write width and height.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.width = Some(size.width);
        self.height = Some(size.height);
        self
    }

    /// Write the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: BoxTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Write the translation.
    #[must_use]
    pub fn with_translate(mut self, translate: Vec2) -> Self {
        self.translate = Some(translate);
        self
    }

    /// Write the below-minimum marker.
    #[must_use]
    pub fn with_below_min_width(mut self, below: bool) -> Self {
        self.below_min_width = Some(below);
        self
    }
}

/// Target values for an animation. Absent fields are left alone.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateTarget {
    /// Target width.
    pub width: Option<f64>,
    /// Target height.
    pub height: Option<f64>,
    /// Target transform offset x.
    pub x: Option<f64>,
    /// Target transform offset y.
    pub y: Option<f64>,
    /// Target transform scale.
    pub scale: Option<f64>,
    /// Target translation x.
    pub translate_x: Option<f64>,
    /// Target translation y.
    pub translate_y: Option<f64>,
}

impl StateTarget {
    /// Animate width and height.
    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Animate the whole transform.
    pub fn transform(transform: BoxTransform) -> Self {
        Self {
            x: Some(transform.x),
            y: Some(transform.y),
            scale: Some(transform.scale),
            ..Self::default()
        }
    }

    /// Animate the transform offset only.
    pub fn offset(offset: Vec2) -> Self {
        Self {
            x: Some(offset.x),
            y: Some(offset.y),
            ..Self::default()
        }
    }

    /// Also animate the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: BoxTransform) -> Self {
        self.x = Some(transform.x);
        self.y = Some(transform.y);
        self.scale = Some(transform.scale);
        self
    }

    /// Also animate the translation.
    #[must_use]
    pub fn with_translate(mut self, translate: Vec2) -> Self {
        self.translate_x = Some(translate.x);
        self.translate_y = Some(translate.y);
        self
    }

    /// Returns `true` when every present field equals its target exactly.
    pub fn is_reached(&self, state: &BoxState) -> bool {
        fn at(target: Option<f64>, current: f64) -> bool {
            target.is_none_or(|t| t == current)
        }
        at(self.width, state.width)
            && at(self.height, state.height)
            && at(self.x, state.transform.x)
            && at(self.y, state.transform.y)
            && at(self.scale, state.transform.scale)
            && at(self.translate_x, state.translate.x)
            && at(self.translate_y, state.translate.y)
    }
}
