// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller-supplied callbacks and pointer listeners.

use core::fmt;

use loupe_event_state::pointers::PointerUpdate;

use crate::extension::{Command, ContentSnapshot, ViewData};
use crate::host::ContainerMotion;
use crate::signal::CancellationToken;
use crate::viewer::ViewerSnapshot;

/// What a transition function knows besides the view change itself.
#[derive(Clone, Debug)]
pub struct TransitionEnv {
    /// Number of items.
    pub total: usize,
    /// The user prefers reduced motion.
    pub reduced_motion: bool,
    /// Cancelled once this navigation no longer applies. A transition that
    /// keeps the token must stop acting on the swap when it is cancelled.
    pub signal: CancellationToken,
    /// Base animation duration in milliseconds.
    pub duration: u64,
}

impl TransitionEnv {
    /// Returns `true` once the navigation was superseded.
    pub fn is_aborted(&self) -> bool {
        self.signal.is_cancelled()
    }
}

/// Picks the container motion for a view change; `None` swaps without one.
pub type TransitionFn = Box<dyn FnMut(&ViewData, &TransitionEnv) -> Option<ContainerMotion>>;
/// Callback receiving a view change.
pub type ViewFn = Box<dyn FnMut(&ViewData)>;
/// Callback receiving viewer state.
pub type SnapshotFn = Box<dyn FnMut(&ViewerSnapshot)>;
/// Callback receiving a content snapshot.
pub type ContentFn = Box<dyn FnMut(&ContentSnapshot)>;
/// One-time setup run before the first open.
pub type InitFn = Box<dyn FnMut(&mut InitContext)>;

/// A pointer update as seen by an external listener.
#[derive(Clone, Copy, Debug)]
pub struct ListenerEvent<'a> {
    /// The update.
    pub update: &'a PointerUpdate,
    /// Viewer state after the built-in gesture handling ran.
    pub snapshot: &'a ViewerSnapshot,
    /// The built-in gestures are using this update (zoomed in, or pinching).
    pub has_internal_execution: bool,
}

/// Receives every pointer update while the viewer is open.
pub trait PointerListener: fmt::Debug {
    /// Handle `event`, queueing commands for the viewer.
    fn on_pointer(&mut self, event: &ListenerEvent<'_>, commands: &mut Vec<Command>);
}

/// Passed to the init hook.
#[derive(Debug, Default)]
pub struct InitContext {
    pub(crate) listeners: Vec<Box<dyn PointerListener>>,
}

impl InitContext {
    /// Register a pointer listener for the lifetime of the viewer.
    pub fn register_pointer_listener(&mut self, listener: impl PointerListener + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

/// Callbacks a caller can attach to a viewer. All are optional.
///
/// Without an `init` hook the viewer registers
/// [`SwipeNavigator`](crate::SwipeNavigator); without a `transition` hook it
/// uses [`slide_transition`](crate::slide_transition).
#[derive(Default)]
pub struct Hooks {
    /// Chooses the container motion for a swap.
    pub transition: Option<TransitionFn>,
    /// Runs when a new window has been built, before it is mounted.
    pub image_setup: Option<ViewFn>,
    /// Runs when the overlay is mounted, before activation.
    pub open: Option<SnapshotFn>,
    /// Runs during teardown.
    pub close: Option<SnapshotFn>,
    /// Runs once, before the first open.
    pub init: Option<InitFn>,
    /// A view finished opening or swapping.
    pub on_image_view: Option<ViewFn>,
    /// The current box came to rest after a gesture.
    pub on_content_change: Option<ContentFn>,
    /// The overlay became active.
    pub on_open: Option<SnapshotFn>,
    /// The overlay was torn down.
    pub on_close: Option<SnapshotFn>,
}

impl Hooks {
    /// No hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transition function.
    #[must_use]
    pub fn with_transition(
        mut self,
        f: impl FnMut(&ViewData, &TransitionEnv) -> Option<ContainerMotion> + 'static,
    ) -> Self {
        self.transition = Some(Box::new(f));
        self
    }

    /// Set the image-setup hook.
    #[must_use]
    pub fn with_image_setup(mut self, f: impl FnMut(&ViewData) + 'static) -> Self {
        self.image_setup = Some(Box::new(f));
        self
    }

    /// Set the open hook.
    #[must_use]
    pub fn with_open(mut self, f: impl FnMut(&ViewerSnapshot) + 'static) -> Self {
        self.open = Some(Box::new(f));
        self
    }

    /// Set the close hook.
    #[must_use]
    pub fn with_close(mut self, f: impl FnMut(&ViewerSnapshot) + 'static) -> Self {
        self.close = Some(Box::new(f));
        self
    }

    /// Set the init hook, replacing the default swipe navigation.
    #[must_use]
    pub fn with_init(mut self, f: impl FnMut(&mut InitContext) + 'static) -> Self {
        self.init = Some(Box::new(f));
        self
    }

    /// Set the image-view callback.
    #[must_use]
    pub fn on_image_view(mut self, f: impl FnMut(&ViewData) + 'static) -> Self {
        self.on_image_view = Some(Box::new(f));
        self
    }

    /// Set the content-change callback.
    #[must_use]
    pub fn on_content_change(mut self, f: impl FnMut(&ContentSnapshot) + 'static) -> Self {
        self.on_content_change = Some(Box::new(f));
        self
    }

    /// Set the open callback.
    #[must_use]
    pub fn on_open(mut self, f: impl FnMut(&ViewerSnapshot) + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    /// Set the close callback.
    #[must_use]
    pub fn on_close(mut self, f: impl FnMut(&ViewerSnapshot) + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("transition", &self.transition.is_some())
            .field("image_setup", &self.image_setup.is_some())
            .field("open", &self.open.is_some())
            .field("close", &self.close.is_some())
            .field("init", &self.init.is_some())
            .field("on_image_view", &self.on_image_view.is_some())
            .field("on_content_change", &self.on_content_change.is_some())
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}
