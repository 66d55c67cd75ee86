// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=loupe --heading-base-level=0

//! Loupe: a headless lightbox core.
//!
//! A [`Viewer`] shows a set of items (thumbnails on a page, or plain
//! [`ItemConfig`] records) one at a time in an overlay, with pinch and wheel
//! zoom, momentum panning, swipe navigation and a sliding swap between items.
//! It renders nothing itself. Everything visible goes through a [`Host`]:
//!
//! - The viewer pushes every change of a box's observable state to
//!   [`Host::project`] as it happens, and asks the host to load media, mount
//!   the overlay and move the container of boxes.
//! - The host forwards input ([`Viewer::pointer_down`], [`Viewer::key_down`],
//!   [`Viewer::wheel`], ...), reports decodes and transition ends, and calls
//!   [`Viewer::frame`] once per animation frame while the overlay is shown.
//!
//! Around the current item the viewer keeps a window of
//! `2 * preloads + 1` [`MediaBox`]es. Navigating builds the next window,
//! optionally slides the container, and then drops the previous one.
//!
//! Behaviour can be extended with [`Hooks`] (plain callbacks) and
//! [`Extension`]s, which can contribute overlay controls, alternative
//! [`Media`] for some items, and queue [`Command`]s in response to viewer
//! events. [`DownloadExtension`] and [`LoggerExtension`] are included.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Size;
//! use loupe::{
//!     BoxId, ElementId, ElementInfo, Hooks, Host, ItemConfig, OpenRegistry, Phase, Projection,
//!     Source, Viewer, ViewerConfig,
//! };
//!
//! #[derive(Debug, Default)]
//! struct Shell {
//!     now: u64,
//!     loads: Vec<BoxId>,
//! }
//!
//! impl Host for Shell {
//!     fn now(&self) -> u64 {
//!         self.now
//!     }
//!     fn viewport(&self) -> Size {
//!         Size::new(800.0, 600.0)
//!     }
//!     fn query(&mut self, _selector: &str) -> Vec<ElementId> {
//!         Vec::new()
//!     }
//!     fn element(&self, _element: ElementId) -> Option<ElementInfo> {
//!         None
//!     }
//!     fn project(&mut self, _id: BoxId, _projection: &Projection) {}
//!     fn load_media(&mut self, id: BoxId, _src: &str) {
//!         self.loads.push(id);
//!     }
//! }
//!
//! let records = vec![ItemConfig::new("a.jpg"), ItemConfig::new("b.jpg")];
//! let mut viewer = Viewer::try_new(
//!     Source::Records(records),
//!     ViewerConfig::default(),
//!     Hooks::new(),
//!     Shell::default(),
//!     OpenRegistry::new(),
//! )
//! .unwrap();
//!
//! viewer.open(0);
//! for id in viewer.host_mut().loads.drain(..).collect::<Vec<_>>() {
//!     viewer.on_media_loaded(id, Size::new(1600.0, 1200.0));
//! }
//! viewer.frame();
//! viewer.frame();
//! assert_eq!(viewer.phase(), Phase::Open);
//!
//! viewer.next();
//! assert_eq!(viewer.current_index(), Some(1));
//!
//! let closed = viewer.close(false);
//! assert!(closed.is_resolved());
//! ```

mod config;
mod download;
mod error;
mod extension;
mod hooks;
mod host;
mod logger;
mod media;
mod media_box;
mod registry;
mod signal;
mod source;
mod swipe;
mod throttle;
mod transition;
mod ui;
mod viewer;

pub use config::{
    ControlId, Controls, DEFAULT_ANIMATION_DURATION_MS, DEFAULT_MAX_ZOOM_LEVEL, DEFAULT_PRELOADS,
    DEFAULT_RAPID_LIMIT_MS, ViewerConfig,
};
pub use download::{DOWNLOAD, DownloadExtension, download_target};
pub use error::SourceError;
pub use extension::{
    BoxParams, BoxSummary, Command, ContentSnapshot, ControlSpec, Extension, ExtensionContext, Via,
    ViewData, ViewIndex,
};
pub use hooks::{
    ContentFn, Hooks, InitContext, InitFn, ListenerEvent, PointerListener, SnapshotFn,
    TransitionEnv, TransitionFn, ViewFn,
};
pub use host::{
    ContainerMotion, Host, OverlaySetup, OverlayState, Placement, Projection, SlideDirection,
    ThumbnailLayout, WindowSlot,
};
pub use logger::LoggerExtension;
pub use media::{EMBED_MAX_WIDTH, EmbedMedia, ImageMedia, MIN_WIDTH_RATIO, Media, SizeBounds};
pub use media_box::{BoxFlags, BoxId, MediaBox, NORMALIZE_DELAY_MS, REVEAL_DELAY_MS, ScaleReport};
pub use registry::{OpenRegistry, ViewerId};
pub use signal::{CancellationToken, Completion};
pub use source::{
    ElementId, ElementInfo, ItemConfig, OriginInfo, ParsedItem, Source, parse_element,
    parse_record,
};
pub use swipe::{SNAP_BACK_MS, SwipeNavigator};
pub use throttle::Throttle;
pub use transition::slide_transition;
pub use ui::UiGate;
pub use viewer::{
    Key, Phase, RAPID_RELEASE_MS, Viewer, ViewerSnapshot, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR,
    ZOOM_THROTTLE_MS,
};

pub use loupe_event_state::pointers::{
    EventTarget, PointerButton, PointerId, PointerInput, PointerUpdate,
};
pub use loupe_event_state::swipe::{SwipeAxis, SwipeDrag};
pub use loupe_fit::{ObjectFit, SrcSet};
pub use loupe_motion::{BoxState, BoxTransform};
