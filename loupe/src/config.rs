// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewer configuration.
//!
//! [`ViewerConfig`] is plain data: it derives `serde` traits behind the
//! `serde` feature so shells can load it from JSON. Callbacks live in
//! [`Hooks`](crate::Hooks) instead.

/// Default base duration of animated transitions, in milliseconds.
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 333;

/// Default maximum zoom, relative to the media's natural width.
pub const DEFAULT_MAX_ZOOM_LEVEL: f64 = 2.0;

/// Default number of neighbours preloaded on each side of the current item.
pub const DEFAULT_PRELOADS: usize = 1;

/// Default window within which consecutive swaps count as rapid, in
/// milliseconds.
pub const DEFAULT_RAPID_LIMIT_MS: u64 = 222;

/// A control the overlay can show.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum ControlId {
    /// `"n / total"` text.
    IndexDisplay,
    /// Alt text of the current item.
    Description,
    /// Zoom-in button.
    ZoomIn,
    /// Zoom-out button.
    ZoomOut,
    /// Close button.
    Close,
    /// Previous-item button.
    Prev,
    /// Next-item button.
    Next,
    /// Control supplied by the extension with this name.
    Extension(String),
}

impl ControlId {
    /// Shorthand for [`ControlId::Extension`].
    pub fn extension(name: impl Into<String>) -> Self {
        Self::Extension(name.into())
    }
}

/// Placement of controls in the overlay's six slots.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct Controls {
    /// Top-left slot.
    pub top_left: Vec<ControlId>,
    /// Top-center slot.
    pub top_center: Vec<ControlId>,
    /// Top-right slot.
    pub top_right: Vec<ControlId>,
    /// Bottom-left slot.
    pub bottom_left: Vec<ControlId>,
    /// Bottom-center slot.
    pub bottom_center: Vec<ControlId>,
    /// Bottom-right slot.
    pub bottom_right: Vec<ControlId>,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            top_left: vec![ControlId::IndexDisplay],
            top_center: Vec::new(),
            top_right: vec![ControlId::ZoomIn, ControlId::ZoomOut, ControlId::Close],
            bottom_left: vec![ControlId::Description],
            bottom_center: Vec::new(),
            bottom_right: Vec::new(),
        }
    }
}

impl Controls {
    /// No controls at all.
    pub fn empty() -> Self {
        Self {
            top_left: Vec::new(),
            top_center: Vec::new(),
            top_right: Vec::new(),
            bottom_left: Vec::new(),
            bottom_center: Vec::new(),
            bottom_right: Vec::new(),
        }
    }

    /// Every placed control, slot by slot.
    pub fn iter(&self) -> impl Iterator<Item = &ControlId> {
        self.top_left
            .iter()
            .chain(&self.top_center)
            .chain(&self.top_right)
            .chain(&self.bottom_left)
            .chain(&self.bottom_center)
            .chain(&self.bottom_right)
    }

    /// Returns `true` if `control` is placed in any slot.
    pub fn contains(&self, control: &ControlId) -> bool {
        self.iter().any(|c| c == control)
    }
}

/// Options of a [`Viewer`](crate::Viewer).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct ViewerConfig {
    /// Base duration of animated transitions, in milliseconds.
    pub animation_duration_base: u64,
    /// Stacking order the host should give the overlay, if any.
    pub initial_z_index: Option<i32>,
    /// Maximum zoom relative to the media's natural width.
    pub max_zoom_level: f64,
    /// Neighbours preloaded on each side of the current item.
    pub preloads: usize,
    /// Handle arrow keys and Escape.
    pub keyboard_listeners: bool,
    /// Show previous/next arrows on small screens too.
    pub arrow_on_small_screens: bool,
    /// Swaps started within this many milliseconds of the previous one are
    /// rapid: they skip transitions and hold reveal animations.
    pub rapid_limit: u64,
    /// Control placement.
    pub controls: Controls,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            animation_duration_base: DEFAULT_ANIMATION_DURATION_MS,
            initial_z_index: None,
            max_zoom_level: DEFAULT_MAX_ZOOM_LEVEL,
            preloads: DEFAULT_PRELOADS,
            keyboard_listeners: true,
            arrow_on_small_screens: false,
            rapid_limit: DEFAULT_RAPID_LIMIT_MS,
            controls: Controls::default(),
        }
    }
}

impl ViewerConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base animation duration.
    #[must_use]
    pub fn with_animation_duration(mut self, ms: u64) -> Self {
        self.animation_duration_base = ms;
        self
    }

    /// Set the overlay's stacking order.
    #[must_use]
    pub fn with_initial_z_index(mut self, z: i32) -> Self {
        self.initial_z_index = Some(z);
        self
    }

    /// Set the maximum zoom level.
    #[must_use]
    pub fn with_max_zoom_level(mut self, level: f64) -> Self {
        self.max_zoom_level = level;
        self
    }

    /// Set the number of neighbours preloaded on each side.
    #[must_use]
    pub fn with_preloads(mut self, preloads: usize) -> Self {
        self.preloads = preloads;
        self
    }

    /// Enable or disable keyboard handling.
    #[must_use]
    pub fn with_keyboard_listeners(mut self, enabled: bool) -> Self {
        self.keyboard_listeners = enabled;
        self
    }

    /// Show arrows on small screens.
    #[must_use]
    pub fn with_arrow_on_small_screens(mut self, enabled: bool) -> Self {
        self.arrow_on_small_screens = enabled;
        self
    }

    /// Set the rapid-swap window.
    #[must_use]
    pub fn with_rapid_limit(mut self, ms: u64) -> Self {
        self.rapid_limit = ms;
        self
    }

    /// Replace the control placement.
    #[must_use]
    pub fn with_controls(mut self, controls: Controls) -> Self {
        self.controls = controls;
        self
    }
}
