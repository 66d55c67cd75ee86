// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Media variants.
//!
//! A [`MediaBox`](crate::MediaBox) delegates what differs between kinds of
//! media to a [`Media`] implementation: how its size bounds are derived, whether
//! it can be zoomed, and which source it should show at a given width.
//! Extensions supply their own variants from
//! [`Extension::initialize_box`](crate::Extension::initialize_box).

use core::fmt::Debug;

use kurbo::Size;
use loupe_fit::{SrcSet, full_size};

use crate::source::ItemConfig;

/// Fraction of the full width below which a released gesture closes the viewer.
pub const MIN_WIDTH_RATIO: f64 = 0.5;

/// Maximum width of embedded media.
pub const EMBED_MAX_WIDTH: f64 = 800.0;

/// Size bounds of one box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeBounds {
    /// Size at rest.
    pub full: Size,
    /// Width below which a released gesture closes the viewer.
    pub min_width: f64,
    /// Widest the box may be zoomed to.
    pub max_width: f64,
}

/// Behaviour of one kind of media.
pub trait Media: Debug {
    /// Short variant name, reported to the host in [`WindowSlot`](crate::WindowSlot).
    fn kind(&self) -> &'static str;

    /// Initial source for `config`.
    fn source(&self, config: &ItemConfig) -> String {
        config.src.clone()
    }

    /// Whether the host must report a decode before the box can reveal.
    fn needs_decode(&self) -> bool {
        true
    }

    /// Bounds for media of `natural` size (`None` when it has no intrinsic
    /// size) in `viewport`.
    fn bounds(&self, natural: Option<Size>, viewport: Size, max_zoom_level: f64) -> SizeBounds;

    /// Whether gestures and zoom controls apply.
    fn zoomable(&self) -> bool {
        true
    }

    /// Whether settling at full size fires a content change.
    fn emits_content_change(&self) -> bool {
        true
    }

    /// Source to show at `width` on a `device_pixel_ratio` display.
    fn responsive_source<'a>(
        &self,
        _width: f64,
        _device_pixel_ratio: f64,
        _srcset: Option<&'a SrcSet>,
    ) -> Option<&'a str> {
        None
    }
}

/// A zoomable image.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageMedia;

impl Media for ImageMedia {
    fn kind(&self) -> &'static str {
        "image"
    }

    fn bounds(&self, natural: Option<Size>, viewport: Size, max_zoom_level: f64) -> SizeBounds {
        let natural = natural.unwrap_or(viewport);
        let full = full_size(natural, viewport);
        SizeBounds {
            full,
            min_width: full.width * MIN_WIDTH_RATIO,
            max_width: natural.width * max_zoom_level,
        }
    }

    fn responsive_source<'a>(
        &self,
        width: f64,
        device_pixel_ratio: f64,
        srcset: Option<&'a SrcSet>,
    ) -> Option<&'a str> {
        srcset?
            .select(width, device_pixel_ratio)
            .map(|entry| entry.url.as_str())
    }
}

/// A fixed 16:9 frame for embedded content. Not zoomable.
#[derive(Clone, Debug, Default)]
pub struct EmbedMedia {
    url: String,
}

impl EmbedMedia {
    /// Embed `url` instead of the item's own source.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The embedded URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Media for EmbedMedia {
    fn kind(&self) -> &'static str {
        "embed"
    }

    fn source(&self, config: &ItemConfig) -> String {
        if self.url.is_empty() {
            config.src.clone()
        } else {
            self.url.clone()
        }
    }

    fn needs_decode(&self) -> bool {
        false
    }

    fn bounds(&self, _natural: Option<Size>, viewport: Size, _max_zoom_level: f64) -> SizeBounds {
        let width = viewport.width.min(EMBED_MAX_WIDTH);
        let full = Size::new(width, width * 9.0 / 16.0);
        SizeBounds {
            full,
            min_width: full.width * MIN_WIDTH_RATIO,
            max_width: full.width,
        }
    }

    fn zoomable(&self) -> bool {
        false
    }

    fn emits_content_change(&self) -> bool {
        false
    }
}
