// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=loupe_fit --heading-base-level=0

//! Loupe Fit: sizing helpers for media shown in a full-screen viewer.
//!
//! This crate is pure geometry. It answers the questions a lightbox asks about
//! a piece of media before and while it is on screen:
//!
//! - How large is an image rendered inside its thumbnail box, given the box's
//!   CSS `object-fit`? See [`fitted_size`].
//! - How large should it be when shown "full screen"? See [`full_size`] and
//!   [`aspect_fit`].
//! - Which entry of a responsive `srcset` should be loaded for a given
//!   on-screen width? See [`SrcSet`].
//! - Where is the thumbnail relative to the viewport center, and what
//!   translation keeps a point fixed while zooming? See [`thumbnail_offset`]
//!   and [`anchored_zoom`].
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Size;
//! use loupe_fit::{ObjectFit, SrcSet, fitted_size, full_size};
//!
//! // A 400x200 image inside a 100x100 `object-fit: cover` thumbnail.
//! let thumb = fitted_size(Some(ObjectFit::Cover), Size::new(400.0, 200.0), Size::new(100.0, 100.0));
//! assert_eq!(thumb, Size::new(200.0, 100.0));
//!
//! // Full-screen size of a 4000x2000 image in a 1000x800 viewport.
//! let full = full_size(Size::new(4000.0, 2000.0), Size::new(1000.0, 800.0));
//! assert_eq!(full, Size::new(1000.0, 500.0));
//!
//! let srcset = SrcSet::parse("small.jpg 480w, large.jpg 1600w, medium.jpg 960w");
//! assert_eq!(srcset.select(500.0, 2.0).map(|e| e.url.as_str()), Some("large.jpg"));
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod fit;
mod placement;
mod srcset;

pub use fit::{ObjectFit, aspect_fit, fitted_size, full_size};
pub use placement::{anchored_zoom, thumbnail_offset};
pub use srcset::{SrcSet, SrcSetEntry};
