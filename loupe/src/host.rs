// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary between the viewer and the shell that renders it.
//!
//! The viewer never touches a document or a window directly. Everything it
//! would do to one goes through [`Host`]: querying source elements, mounting
//! the overlay, projecting box state, starting loads and container motions.
//! Signals flow the other way, as calls into [`Viewer`](crate::Viewer):
//! `frame()` once per animation frame, `on_media_loaded` when a decode
//! finishes, `on_transition_end` and `on_root_transition_end` when the
//! shell's transitions finish.
//!
//! Only the methods a viewer cannot work without are required; the rest
//! default to no-ops so small shells (and test fakes) stay small.

use kurbo::{Size, Vec2};
use loupe_event_state::swipe::{SwipeAxis, SwipeDrag};
use loupe_fit::ObjectFit;
use loupe_motion::BoxTransform;

use crate::config::ControlId;
use crate::extension::ControlSpec;
use crate::media_box::{BoxFlags, BoxId};
use crate::source::{ElementId, ElementInfo};

/// One field of a media box, pushed to the host whenever it is written.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    /// Laid-out width.
    Width(f64),
    /// Laid-out height.
    Height(f64),
    /// Gesture transform.
    Transform(BoxTransform),
    /// Persistent translation from the viewport center.
    Translate(Vec2),
    /// Whether a gesture has shrunk the box below its close threshold.
    BelowMinWidth(bool),
    /// Source URL the media element should show.
    Source(String),
    /// Status markers.
    Flags(BoxFlags),
    /// Geometry of the lifted thumbnail inside the box.
    Thumbnail(ThumbnailLayout),
    /// Size the box starts from before revealing.
    InitialSize(Size),
    /// The media could not be loaded.
    Failed,
}

/// Geometry that places a lifted thumbnail over its original position.
#[derive(Clone, Debug, PartialEq)]
pub struct ThumbnailLayout {
    /// Size of the thumbnail's origin rectangle.
    pub size: Size,
    /// Offset of the thumbnail's center from the viewport center.
    pub offset: Vec2,
    /// Border radius to keep while the box grows.
    pub border_radius: String,
    /// Object-fit of the thumbnail.
    pub object_fit: ObjectFit,
}

/// Where a lifted thumbnail came from, so it can be put back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Former parent.
    pub parent: ElementId,
    /// Former next sibling, or `None` if it was the last child.
    pub next_sibling: Option<ElementId>,
    /// Inline style to restore.
    pub style: String,
}

/// Direction of a slide transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlideDirection {
    /// Content moves left: towards the next item.
    Forward,
    /// Content moves right: towards the previous item.
    Backward,
}

/// Motion of the container holding the window of boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContainerMotion {
    /// Slide one viewport width. The host calls
    /// [`Viewer::on_transition_end`](crate::Viewer::on_transition_end) when done.
    Slide {
        /// Which way.
        direction: SlideDirection,
        /// Duration in milliseconds.
        duration: u64,
    },
    /// Follow a swipe along one axis, without animation.
    Drag(SwipeDrag),
    /// Animate back to rest along one axis.
    SnapBack {
        /// Axis to reset.
        axis: SwipeAxis,
        /// Duration in milliseconds.
        duration: u64,
    },
    /// Jump back to rest.
    Reset,
}

/// State marker of the overlay root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayState {
    /// Shown and interactive.
    Active,
    /// The opening transition has finished.
    Settled,
    /// Playing the closing transition.
    Closing,
}

/// One box of a freshly built window, in mount order.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowSlot {
    /// Box handle used by every later projection.
    pub id: BoxId,
    /// Position relative to the current item.
    pub position: isize,
    /// Item index.
    pub index: usize,
    /// Media variant name, such as `"image"` or `"embed"`.
    pub kind: &'static str,
    /// Initial source.
    pub src: String,
    /// Alternative text.
    pub alt: String,
}

/// What the host needs to build the overlay.
#[derive(Clone, Copy, Debug)]
pub struct OverlaySetup<'a> {
    /// Control placement.
    pub controls: &'a crate::Controls,
    /// Extension-supplied controls, keyed by [`ControlId::Extension`] name.
    pub extension_controls: &'a [(String, ControlSpec)],
    /// Base animation duration.
    pub animation_duration: u64,
    /// Stacking order, if configured.
    pub initial_z_index: Option<i32>,
    /// Show arrows on small screens.
    pub arrow_on_small_screens: bool,
}

/// The environment a [`Viewer`](crate::Viewer) runs in.
pub trait Host {
    /// Monotonic time in milliseconds.
    fn now(&self) -> u64;

    /// Size of the viewport.
    fn viewport(&self) -> Size;

    /// Elements matching `selector`, in document order.
    fn query(&mut self, selector: &str) -> Vec<ElementId>;

    /// Snapshot of `element`, or `None` if it no longer exists.
    fn element(&self, element: ElementId) -> Option<ElementInfo>;

    /// Reflect one field of box `id`.
    fn project(&mut self, id: BoxId, projection: &Projection);

    /// Start loading `src` into box `id`. The host reports the outcome through
    /// [`Viewer::on_media_loaded`](crate::Viewer::on_media_loaded) or
    /// [`Viewer::on_media_failed`](crate::Viewer::on_media_failed).
    fn load_media(&mut self, id: BoxId, src: &str);

    /// Device pixel ratio used for srcset selection.
    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }

    /// Whether the user prefers reduced motion.
    fn prefers_reduced_motion(&self) -> bool {
        false
    }

    /// Make `element` open the viewer at `index` when activated.
    fn bind_activation(&mut self, _element: ElementId, _index: usize) {}

    /// Undo [`bind_activation`](Self::bind_activation).
    fn unbind_activation(&mut self, _element: ElementId) {}

    /// Hide or show a source element while its item is viewed.
    fn set_origin_hidden(&mut self, _element: ElementId, _hidden: bool) {}

    /// Move thumbnail `image` into box `id`, returning where it came from.
    fn take_thumbnail(&mut self, _image: ElementId, _id: BoxId) -> Option<Placement> {
        None
    }

    /// Put a thumbnail back where [`take_thumbnail`](Self::take_thumbnail)
    /// found it.
    fn restore_thumbnail(&mut self, _image: ElementId, _placement: &Placement) {}

    /// Build and show the overlay.
    fn mount_overlay(&mut self, _setup: &OverlaySetup<'_>) {}

    /// Remove the overlay.
    fn unmount_overlay(&mut self) {}

    /// Mark the overlay root.
    fn set_overlay_state(&mut self, _state: OverlayState) {}

    /// Replace the container's contents with these boxes.
    fn mount_window(&mut self, _slots: &[WindowSlot]) {}

    /// Remove box `id` from the document.
    fn detach_box(&mut self, _id: BoxId) {}

    /// Enable or disable a control.
    fn set_control_enabled(&mut self, _control: &ControlId, _enabled: bool) {}

    /// Show or hide the previous/next arrows.
    fn set_navigation_visible(&mut self, _visible: bool) {}

    /// Update the index display.
    fn set_index_display(&mut self, _text: &str) {}

    /// Update the description text and its accessible label.
    fn set_description(&mut self, _text: &str, _label: &str) {}

    /// Move the container of boxes.
    fn move_container(&mut self, _motion: ContainerMotion) {}

    /// Lock or unlock page scrolling.
    fn set_body_scroll_locked(&mut self, _locked: bool) {}

    /// Download `url` as `file_name`.
    fn download(&mut self, _url: &str, _file_name: &str) {}
}
