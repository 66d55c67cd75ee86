// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extensions: pluggable behaviour notified of viewer events.
//!
//! Every hook has a no-op default. Hooks that may drive the viewer receive an
//! [`ExtensionContext`]; the commands queued on it run after every extension
//! has seen the event, in the order they were queued.

use core::fmt::Debug;

use kurbo::Point;
use loupe_fit::SrcSet;
use loupe_motion::BoxState;

use crate::config::ControlId;
use crate::host::ContainerMotion;
use crate::media::Media;
use crate::media_box::BoxId;
use crate::source::{ItemConfig, OriginInfo};
use crate::viewer::ViewerSnapshot;

/// A control an extension contributes to the overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlSpec {
    /// Accessible label.
    pub label: String,
}

impl ControlSpec {
    /// A control labelled `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// How a view was reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Via {
    /// Opened, or [`Viewer::view`](crate::Viewer::view) called directly.
    #[default]
    Direct,
    /// [`Viewer::next`](crate::Viewer::next).
    Next,
    /// [`Viewer::prev`](crate::Viewer::prev).
    Prev,
}

/// Item indices of a view change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewIndex {
    /// Previous index; `None` when opening.
    pub from: Option<usize>,
    /// New index.
    pub to: usize,
}

/// Identity and content of one box.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSummary {
    /// Box handle.
    pub id: BoxId,
    /// Position in its window.
    pub position: isize,
    /// Item index.
    pub index: usize,
    /// Item source, alt and srcset.
    pub config: ItemConfig,
    /// Parsed srcset.
    pub srcset: Option<SrcSet>,
}

/// A view change: the window being left and the window being shown.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewData {
    /// Indices.
    pub index: ViewIndex,
    /// How the change was requested.
    pub via: Via,
    /// Boxes of the previous window; empty when opening.
    pub from: Vec<BoxSummary>,
    /// Boxes of the new window.
    pub to: Vec<BoxSummary>,
}

impl ViewData {
    /// The position-0 box of the new window.
    pub fn center(&self) -> Option<&BoxSummary> {
        self.to.iter().find(|b| b.position == 0)
    }
}

/// State of a box that came to rest at full size or beyond.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentSnapshot {
    /// Box handle.
    pub id: BoxId,
    /// Item index.
    pub index: usize,
    /// Position in the window.
    pub position: isize,
    /// Item source, alt and srcset.
    pub config: ItemConfig,
    /// Parsed srcset.
    pub srcset: Option<SrcSet>,
    /// Origin element, for element sources.
    pub origin: Option<OriginInfo>,
    /// Box state.
    pub state: BoxState,
    /// Size at rest.
    pub full: kurbo::Size,
}

/// Parameters offered to [`Extension::initialize_box`].
#[derive(Clone, Copy, Debug)]
pub struct BoxParams<'a> {
    /// Position in the window being built.
    pub position: isize,
    /// Item index.
    pub index: usize,
    /// Item source, alt and srcset.
    pub config: &'a ItemConfig,
    /// Origin element, for element sources.
    pub origin: Option<&'a OriginInfo>,
}

/// A request an extension or pointer listener makes of the viewer.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Show the next item.
    Next,
    /// Show the previous item.
    Prev,
    /// Close with animation.
    Close,
    /// Show this index.
    View(usize),
    /// Zoom in about the anchor.
    ZoomIn,
    /// Zoom out about the anchor.
    ZoomOut,
    /// Move the zoom anchor of the current box.
    Anchor(Point),
    /// Abort a running slide and complete the swap now.
    AbortTransition,
    /// Disable controls until the next swap.
    DeactivateUi {
        /// Controls to disable.
        controls: Vec<ControlId>,
        /// Box on whose behalf.
        requester: Option<BoxId>,
    },
    /// Ask the host to download a file.
    Download {
        /// URL to fetch.
        url: String,
        /// Suggested file name.
        file_name: String,
    },
    /// Move the container of boxes.
    MoveContainer(ContainerMotion),
}

/// Handed to extension hooks that may drive the viewer.
#[derive(Debug)]
pub struct ExtensionContext<'a> {
    snapshot: &'a ViewerSnapshot,
    commands: Vec<Command>,
}

impl<'a> ExtensionContext<'a> {
    pub(crate) fn new(snapshot: &'a ViewerSnapshot) -> Self {
        Self {
            snapshot,
            commands: Vec::new(),
        }
    }

    /// Viewer state when the event fired.
    pub fn snapshot(&self) -> &ViewerSnapshot {
        self.snapshot
    }

    /// Queue a command.
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Queue [`Command::Next`].
    pub fn next(&mut self) {
        self.push(Command::Next);
    }

    /// Queue [`Command::Prev`].
    pub fn prev(&mut self) {
        self.push(Command::Prev);
    }

    /// Queue [`Command::Close`].
    pub fn close(&mut self) {
        self.push(Command::Close);
    }

    /// Queue [`Command::DeactivateUi`].
    pub fn deactivate_ui(&mut self, controls: &[ControlId], requester: Option<BoxId>) {
        self.push(Command::DeactivateUi {
            controls: controls.to_vec(),
            requester,
        });
    }

    /// Queue [`Command::Download`].
    pub fn download(&mut self, url: impl Into<String>, file_name: impl Into<String>) {
        self.push(Command::Download {
            url: url.into(),
            file_name: file_name.into(),
        });
    }

    /// Queued commands.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub(crate) fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

/// Pluggable viewer behaviour.
pub trait Extension: Debug {
    /// Unique name; controls refer to it as [`ControlId::Extension`].
    fn name(&self) -> &str;

    /// A control to place in the overlay.
    fn control(&self) -> Option<ControlSpec> {
        None
    }

    /// The host activated this extension's control.
    fn on_control(&mut self, _cx: &mut ExtensionContext<'_>) {}

    /// Offer a media variant for a box being built. The first extension
    /// returning `Some` wins; otherwise the box shows an image.
    fn initialize_box(&mut self, _params: &BoxParams<'_>) -> Option<Box<dyn Media>> {
        None
    }

    /// A view finished opening or swapping.
    fn on_image_view(&mut self, _data: &ViewData, _cx: &mut ExtensionContext<'_>) {}

    /// The current box came to rest after a gesture.
    fn on_content_change(&mut self, _content: &ContentSnapshot, _cx: &mut ExtensionContext<'_>) {}

    /// The overlay became active.
    fn on_open(&mut self, _cx: &mut ExtensionContext<'_>) {}

    /// The overlay was torn down.
    fn on_close(&mut self, _snapshot: &ViewerSnapshot) {}

    /// Controls were disabled on behalf of `requester`.
    fn on_deactivate_ui(
        &mut self,
        _controls: &[ControlId],
        _requester: Option<BoxId>,
        _cx: &mut ExtensionContext<'_>,
    ) {
    }

    /// Controls disabled earlier were enabled again.
    fn on_reactivate_ui(&mut self, _cx: &mut ExtensionContext<'_>) {}
}
