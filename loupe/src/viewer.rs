// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The viewer controller.
//!
//! A [`Viewer`] owns the window of [`MediaBox`]es around the current item and
//! drives them from host signals. Navigation builds a new window, optionally
//! runs a container transition, and swaps the windows when the host reports the
//! transition finished (or immediately, for rapid navigation and jumps).
//!
//! The viewer is a synchronous state machine: waiting for a transition, a
//! decode or a timer is modelled as state that a later host call resolves.
//! [`frame`](Viewer::frame) must be called once per animation frame while the
//! overlay is shown.

mod frame;
mod input;

pub use input::Key;

use loupe_event_state::gesture::GestureInterpreter;
use loupe_event_state::pointers::PointerTracker;
use loupe_motion::Animator;

use crate::config::{ControlId, ViewerConfig};
use crate::error::SourceError;
use crate::extension::{
    BoxParams, BoxSummary, Command, ContentSnapshot, ControlSpec, Extension, ExtensionContext,
    Via, ViewData, ViewIndex,
};
use crate::hooks::{Hooks, InitContext, PointerListener, TransitionEnv};
use crate::host::{ContainerMotion, Host, OverlaySetup, OverlayState, WindowSlot};
use crate::media::ImageMedia;
use crate::media_box::{BoxCx, BoxId, JobEnd, MediaBox, ScaleReport};
use crate::registry::{OpenRegistry, ViewerId};
use crate::signal::{CancellationToken, Completion};
use crate::source::{
    ElementId, ParsedItem, Source, parse_element, parse_record, validate_records,
};
use crate::swipe::SwipeNavigator;
use crate::throttle::Throttle;
use crate::transition::slide_transition;
use crate::ui::UiGate;

/// Zoom factor of one zoom-in step.
pub const ZOOM_IN_FACTOR: f64 = 1.68;

/// Zoom factor of one zoom-out step.
pub const ZOOM_OUT_FACTOR: f64 = 0.68;

/// Minimum interval between zoom steps, in milliseconds.
pub const ZOOM_THROTTLE_MS: u64 = 222;

/// Quiet period after a rapid swap before held reveals resume.
pub const RAPID_RELEASE_MS: u64 = 333;

/// Animation frames between mounting the overlay and activating it.
const ACTIVATION_FRAMES: u8 = 2;

/// Root transition-ends of an animated close: boxes are released at the
/// second, the overlay is torn down at the third.
const CLOSE_RELEASE_AT: u8 = 2;
const CLOSE_TEARDOWN_AT: u8 = 3;

/// Lifecycle phase of a viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No overlay.
    #[default]
    Closed,
    /// Overlay mounted, waiting for activation.
    Opening,
    /// Overlay active.
    Open,
    /// Playing the closing transition.
    Closing,
}

/// Viewer state handed to hooks and extensions.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerSnapshot {
    /// Lifecycle phase.
    pub phase: Phase,
    /// The opening transition has finished.
    pub settled: bool,
    /// Current item; `None` while closed.
    pub current_index: Option<usize>,
    /// Number of items.
    pub total: usize,
    /// The current box is larger than full size.
    pub zoomed_in: bool,
    /// The user prefers reduced motion.
    pub reduced_motion: bool,
    /// The current box.
    pub current: Option<BoxSummary>,
}

struct PendingSwap {
    old: Vec<MediaBox>,
    to: usize,
    data: ViewData,
    signal: CancellationToken,
}

struct Activation {
    frames_left: u8,
    data: ViewData,
}

struct Closing {
    transitions_seen: u8,
    completion: Completion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Motion {
    Throw(BoxId),
    Settle(BoxId),
}

/// A lightbox over a set of items.
///
/// Dropping a viewer that is still open tears it down as
/// [`destroy`](Self::destroy) does, releasing its [`OpenRegistry`].
pub struct Viewer<H: Host> {
    host: H,
    id: ViewerId,
    registry: OpenRegistry,
    source: Source,
    config: ViewerConfig,
    hooks: Hooks,
    extensions: Vec<Box<dyn Extension>>,
    listeners: Vec<Box<dyn PointerListener>>,
    initialized: bool,
    elements: Vec<ElementId>,
    total: usize,

    phase: Phase,
    settled: bool,
    zoomed_in: bool,
    current: Option<usize>,
    window: Vec<MediaBox>,
    next_box_id: u64,
    animator: Animator<BoxId, JobEnd>,
    tracker: PointerTracker,
    gestures: GestureInterpreter,
    throttle: Throttle<&'static str>,
    ui: UiGate,
    cancel: CancellationToken,
    pending: Option<PendingSwap>,
    last_swap_start: Option<u64>,
    rapid: bool,
    rapid_release_at: Option<u64>,
    activation: Option<Activation>,
    closing: Option<Closing>,
    close_requested: bool,
    motion: Option<Motion>,
}

impl<H: Host> core::fmt::Debug for Viewer<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Viewer")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("config", &self.config)
            .field("hooks", &self.hooks)
            .field("extensions", &self.extensions)
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("total", &self.total)
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Viewer<H> {
    /// Create a viewer, reporting why the source is unusable.
    pub fn try_new(
        source: Source,
        config: ViewerConfig,
        hooks: Hooks,
        host: H,
        registry: OpenRegistry,
    ) -> Result<Self, SourceError> {
        let mut viewer = Self {
            host,
            id: registry.register(),
            registry,
            source,
            config,
            hooks,
            extensions: Vec::new(),
            listeners: Vec::new(),
            initialized: false,
            elements: Vec::new(),
            total: 0,
            phase: Phase::Closed,
            settled: false,
            zoomed_in: false,
            current: None,
            window: Vec::new(),
            next_box_id: 0,
            animator: Animator::new(),
            tracker: PointerTracker::new(),
            gestures: GestureInterpreter::new(),
            throttle: Throttle::new(),
            ui: UiGate::new(),
            cancel: CancellationToken::new(),
            pending: None,
            last_swap_start: None,
            rapid: false,
            rapid_release_at: None,
            activation: None,
            closing: None,
            close_requested: false,
            motion: None,
        };
        viewer.load_source()?;
        Ok(viewer)
    }

    /// Create a viewer, logging why the source is unusable.
    pub fn new(
        source: Source,
        config: ViewerConfig,
        hooks: Hooks,
        host: H,
        registry: OpenRegistry,
    ) -> Option<Self> {
        match Self::try_new(source, config, hooks, host, registry) {
            Ok(viewer) => Some(viewer),
            Err(err) => {
                log::error!("cannot create viewer: {err}");
                None
            }
        }
    }

    /// Register an extension. Extensions are consulted in registration order.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Extension + 'static) -> Self {
        self.add_extension(Box::new(extension));
        self
    }

    /// Register a boxed extension.
    pub fn add_extension(&mut self, extension: Box<dyn Extension>) {
        self.extensions.push(extension);
    }

    /// Register a pointer listener in addition to those of the init hook.
    pub fn add_pointer_listener(&mut self, listener: Box<dyn PointerListener>) {
        self.listeners.push(listener);
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `true` from [`open`](Self::open) until teardown.
    pub fn is_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    /// Returns `true` once the opening transition has finished.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Returns `true` while the current box is larger than full size.
    pub fn is_zoomed_in(&self) -> bool {
        self.zoomed_in
    }

    /// Returns `true` while recent swaps hold reveal animations.
    pub fn is_rapid(&self) -> bool {
        self.rapid
    }

    /// Returns `true` while a container transition is running.
    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of items.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Current item, or `None` while closed.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Boxes of the mounted window, in position order.
    pub fn boxes(&self) -> &[MediaBox] {
        &self.window
    }

    /// The position-0 box.
    pub fn current_box(&self) -> Option<&MediaBox> {
        self.window.iter().find(|b| b.position() == 0)
    }

    /// Returns `true` if an animation is registered for box `id`.
    pub fn is_animating(&self, id: BoxId) -> bool {
        self.animator.is_running(&id)
    }

    /// Disabled-controls state.
    pub fn ui(&self) -> &UiGate {
        &self.ui
    }

    /// Current state, as handed to hooks.
    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            phase: self.phase,
            settled: self.settled,
            current_index: self.current,
            total: self.total,
            zoomed_in: self.zoomed_in,
            reduced_motion: self.host.prefers_reduced_motion(),
            current: self.current_box().map(MediaBox::summary),
        }
    }

    /// Re-read the source and rebind element activation.
    pub fn reset(&mut self) {
        if let Err(err) = self.load_source() {
            log::warn!("reset: {err}");
        }
    }

    fn load_source(&mut self) -> Result<(), SourceError> {
        match &self.source {
            Source::Selector(selector) => {
                let ids = self.host.query(selector);
                if ids.is_empty() {
                    return Err(SourceError::NoMatchingElements(selector.clone()));
                }
                for &id in &ids {
                    let info = self
                        .host
                        .element(id)
                        .ok_or(SourceError::UnknownElement(id))?;
                    parse_element(&info)?;
                }
                for old in self.elements.drain(..) {
                    self.host.unbind_activation(old);
                }
                for (index, &id) in ids.iter().enumerate() {
                    self.host.bind_activation(id, index);
                }
                self.total = ids.len();
                self.elements = ids;
            }
            Source::Records(records) => {
                validate_records(records)?;
                self.total = records.len();
            }
        }
        Ok(())
    }

    fn parse_item(&self, index: usize) -> ParsedItem {
        let parsed = match &self.source {
            Source::Records(records) => records
                .get(index)
                .map_or(Err(SourceError::MissingRecordSource(index)), |record| {
                    parse_record(index, record)
                }),
            Source::Selector(selector) => match self.elements.get(index) {
                Some(&id) => self
                    .host
                    .element(id)
                    .ok_or(SourceError::UnknownElement(id))
                    .and_then(|info| parse_element(&info)),
                None => Err(SourceError::NoMatchingElements(selector.clone())),
            },
        };
        parsed.unwrap_or_else(|err| {
            log::warn!("item {index}: {err}");
            ParsedItem::default()
        })
    }

    fn run_init(&mut self) {
        if core::mem::replace(&mut self.initialized, true) {
            return;
        }
        let mut cx = InitContext::default();
        match self.hooks.init.as_mut() {
            Some(init) => init(&mut cx),
            None => cx.register_pointer_listener(SwipeNavigator::new()),
        }
        self.listeners.extend(cx.listeners);
    }

    /// Open the overlay at `start`, wrapped into range.
    pub fn open(&mut self, start: isize) {
        if self.registry.is_open() {
            log::warn!("a viewer is already open; close it before opening another");
            return;
        }
        self.reset();
        if self.total == 0 {
            log::warn!("nothing to show");
            return;
        }
        if !self.registry.try_acquire(self.id) {
            return;
        }
        self.run_init();

        let index = wrap(start, self.total);
        self.phase = Phase::Opening;
        self.settled = false;
        self.current = Some(index);
        self.cancel = CancellationToken::new();
        self.pending = None;
        self.last_swap_start = None;
        self.rapid = false;
        self.rapid_release_at = None;
        self.closing = None;
        self.close_requested = false;
        self.motion = None;

        self.host.set_body_scroll_locked(true);
        let extension_controls: Vec<(String, ControlSpec)> = self
            .extensions
            .iter()
            .filter_map(|ext| ext.control().map(|spec| (ext.name().to_owned(), spec)))
            .collect();
        self.host.mount_overlay(&OverlaySetup {
            controls: &self.config.controls,
            extension_controls: &extension_controls,
            animation_duration: self.config.animation_duration_base,
            initial_z_index: self.config.initial_z_index,
            arrow_on_small_screens: self.config.arrow_on_small_screens,
        });

        self.window = self.build_window(index);
        let data = view_data(None, index, Via::Direct, &[], &self.window);
        if let Some(setup) = self.hooks.image_setup.as_mut() {
            setup(&data);
        }
        self.mount_window();
        self.host.set_navigation_visible(self.total > 1);
        self.reset_zoom_controls();
        self.display_current_info();

        let snapshot = self.snapshot();
        if let Some(open) = self.hooks.open.as_mut() {
            open(&snapshot);
        }
        self.tracker.start();
        self.gestures.reset();
        self.activation = Some(Activation {
            frames_left: ACTIVATION_FRAMES,
            data,
        });
        log::debug!("opened at index {index}");
    }

    /// Close the overlay. Resolves immediately unless `animate` is set, in
    /// which case the host's closing transitions must be reported through
    /// [`on_root_transition_end`](Self::on_root_transition_end).
    pub fn close(&mut self, animate: bool) -> Completion {
        if !self.registry.is_held_by(self.id) {
            return Completion::resolved();
        }
        if let Some(closing) = &self.closing {
            return closing.completion.clone();
        }

        self.tracker.stop();
        self.gestures.reset();
        self.motion = None;
        self.close_requested = false;
        self.activation = None;
        self.phase = Phase::Closing;
        self.cancel.cancel();
        if let Some(pending) = self.pending.take() {
            self.complete_swap(pending);
        }
        self.for_each_box(|b, cx| b.prepare_close(cx));

        let completion = Completion::new();
        if animate {
            self.host.set_overlay_state(OverlayState::Closing);
            self.closing = Some(Closing {
                transitions_seen: 0,
                completion: completion.clone(),
            });
        } else {
            self.teardown(&completion);
        }
        completion
    }

    fn release_window(&mut self) {
        for mut b in core::mem::take(&mut self.window) {
            self.animator.stop(&b.id());
            b.destroy(&mut self.host);
        }
        for &element in &self.elements {
            self.host.set_origin_hidden(element, false);
        }
    }

    fn teardown(&mut self, completion: &Completion) {
        self.release_window();
        self.animator.clear();
        self.closing = None;
        self.host.unmount_overlay();
        self.host.set_body_scroll_locked(false);
        self.phase = Phase::Closed;
        self.settled = false;
        self.zoomed_in = false;
        self.rapid = false;
        self.rapid_release_at = None;
        self.last_swap_start = None;

        let snapshot = self.snapshot();
        self.current = None;
        self.registry.release(self.id);
        if let Some(close) = self.hooks.close.as_mut() {
            close(&snapshot);
        }
        if let Some(on_close) = self.hooks.on_close.as_mut() {
            on_close(&snapshot);
        }
        for ext in &mut self.extensions {
            ext.on_close(&snapshot);
        }
        completion.resolve();
        log::debug!("closed");
    }

    /// Close without animation and stop responding to source elements.
    pub fn destroy(&mut self) {
        match self.closing.take() {
            Some(closing) => self.teardown(&closing.completion),
            None => {
                self.close(false);
            }
        }
        for element in self.elements.drain(..) {
            self.host.unbind_activation(element);
        }
        self.total = 0;
        self.listeners.clear();
        self.initialized = false;
    }

    /// Show the next item, wrapping after the last.
    pub fn next(&mut self) {
        if let Some(index) = self.offset_index(1) {
            self.navigate(index, Via::Next);
        }
    }

    /// Show the previous item, wrapping before the first.
    pub fn prev(&mut self) {
        if let Some(index) = self.offset_index(-1) {
            self.navigate(index, Via::Prev);
        }
    }

    /// Show item `index`, wrapped into range.
    pub fn view(&mut self, index: isize) {
        self.navigate(index, Via::Direct);
    }

    fn offset_index(&self, delta: isize) -> Option<isize> {
        let Some(current) = self.current else {
            log::warn!("viewer is not open");
            return None;
        };
        Some(isize::try_from(current).unwrap_or(isize::MAX) + delta)
    }

    fn navigate(&mut self, index: isize, via: Via) {
        if !self.registry.is_held_by(self.id) || matches!(self.phase, Phase::Closed | Phase::Closing)
        {
            log::warn!("viewer is not open");
            return;
        }
        if self.total < 2 {
            return;
        }
        let index = wrap(index, self.total);
        let before = self.current;
        self.current = Some(index);
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        if let Some(pending) = self.pending.take() {
            let data = self.complete_swap(pending);
            self.notify_image_view(&data);
        }
        self.swap(before, via);
    }

    fn swap(&mut self, before: Option<usize>, via: Via) {
        let Some(index) = self.current else {
            return;
        };
        self.reactivate_ui();
        let now = self.host.now();

        let window = self.build_window(index);
        let old = core::mem::replace(&mut self.window, window);
        let data = view_data(before, index, via, &old, &self.window);
        if let Some(setup) = self.hooks.image_setup.as_mut() {
            setup(&data);
        }
        self.reset_zoom_controls();
        self.display_current_info();

        let rapid = self
            .last_swap_start
            .is_some_and(|start| now.saturating_sub(start) < self.config.rapid_limit);
        self.last_swap_start = Some(now);
        self.rapid = rapid;
        let pending = PendingSwap {
            old,
            to: index,
            data,
            signal: self.cancel.clone(),
        };

        if rapid {
            self.rapid_release_at = Some(now + RAPID_RELEASE_MS);
            let data = self.complete_swap(pending);
            self.notify_image_view(&data);
            return;
        }
        self.rapid_release_at = None;

        let env = TransitionEnv {
            total: self.total,
            reduced_motion: self.host.prefers_reduced_motion(),
            signal: pending.signal.clone(),
            duration: self.config.animation_duration_base,
        };
        let motion = match self.hooks.transition.as_mut() {
            Some(transition) => transition(&pending.data, &env),
            None => slide_transition(&pending.data, &env),
        };
        match motion {
            Some(motion) => {
                self.host.move_container(motion);
                self.pending = Some(pending);
            }
            None => {
                let data = self.complete_swap(pending);
                self.notify_image_view(&data);
            }
        }
    }

    /// Drop the previous window and mount the new one.
    fn complete_swap(&mut self, swap: PendingSwap) -> ViewData {
        let PendingSwap { mut old, to, data, .. } = swap;
        for b in &mut old {
            b.cancel_pending_load(&mut self.host);
        }
        if let Some(previous) = old.iter().find(|b| b.index() == to) {
            let in_flight = self.animator.stop(&previous.id());
            if let Some(current) = self.window.iter_mut().find(|b| b.position() == 0) {
                current.adopt(previous, in_flight, &mut self.host);
            }
        }
        for mut b in old {
            self.animator.stop(&b.id());
            b.destroy(&mut self.host);
        }
        self.host.move_container(ContainerMotion::Reset);
        self.mount_window();
        data
    }

    fn abort_transition(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.signal.cancel();
            let data = self.complete_swap(pending);
            self.notify_image_view(&data);
        }
    }

    fn build_window(&mut self, center: usize) -> Vec<MediaBox> {
        let viewport = self.host.viewport();
        let radius = isize::try_from(self.config.preloads).unwrap_or(0);
        let center = isize::try_from(center).unwrap_or(0);
        let mut boxes = Vec::new();
        for position in -radius..=radius {
            let index = wrap(center + position, self.total);
            let item = self.parse_item(index);
            let params = BoxParams {
                position,
                index,
                config: &item.config,
                origin: item.origin.as_ref(),
            };
            let media = self
                .extensions
                .iter_mut()
                .find_map(|ext| ext.initialize_box(&params))
                .unwrap_or_else(|| Box::new(ImageMedia));
            self.next_box_id += 1;
            let mut b = MediaBox::new(
                BoxId(self.next_box_id),
                position,
                index,
                item,
                media,
                self.config.max_zoom_level,
                viewport,
            );
            b.attach(&mut self.host, viewport);
            boxes.push(b);
        }
        boxes
    }

    fn mount_window(&mut self) {
        let slots: Vec<WindowSlot> = self
            .window
            .iter()
            .map(|b| WindowSlot {
                id: b.id(),
                position: b.position(),
                index: b.index(),
                kind: b.media().kind(),
                src: b.source().to_owned(),
                alt: b.config().alt.clone(),
            })
            .collect();
        self.host.mount_window(&slots);
        self.for_each_box(|b, cx| b.init(cx));
    }

    fn display_current_info(&mut self) {
        let Some(index) = self.current else {
            return;
        };
        for (i, &element) in self.elements.iter().enumerate() {
            self.host.set_origin_hidden(element, i == index);
        }
        let n = index + 1;
        let total = self.total;
        self.host.set_index_display(&format!("{n} / {total}"));
        let alt = self
            .current_box()
            .map(|b| b.config().alt.clone())
            .unwrap_or_default();
        let label = if alt.is_empty() {
            format!("Image {n} of {total}")
        } else {
            format!("Image {n} of {total}: {alt}")
        };
        self.host.set_description(&alt, &label);
    }

    fn reset_zoom_controls(&mut self) {
        self.zoomed_in = false;
        if !self.ui.is_deactivated(&ControlId::ZoomIn) {
            self.host.set_control_enabled(&ControlId::ZoomIn, true);
        }
        self.host.set_control_enabled(&ControlId::ZoomOut, false);
    }

    fn apply_scale_report(&mut self, report: ScaleReport) {
        self.zoomed_in = !report.is_min;
        if !self.ui.is_deactivated(&ControlId::ZoomOut) {
            self.host
                .set_control_enabled(&ControlId::ZoomOut, !report.is_min);
        }
        if !self.ui.is_deactivated(&ControlId::ZoomIn) {
            self.host
                .set_control_enabled(&ControlId::ZoomIn, !report.is_max);
        }
    }

    /// Zoom the current item in by one step.
    pub fn zoom_in(&mut self) {
        self.zoom(ControlId::ZoomIn, ZOOM_IN_FACTOR);
    }

    /// Zoom the current item out by one step.
    pub fn zoom_out(&mut self) {
        self.zoom(ControlId::ZoomOut, ZOOM_OUT_FACTOR);
    }

    fn zoom(&mut self, control: ControlId, factor: f64) {
        if !self.registry.is_held_by(self.id) {
            log::warn!("viewer is not open");
            return;
        }
        if self.ui.is_deactivated(&control) {
            return;
        }
        let now = self.host.now();
        if !self.throttle.first_in("zoom", ZOOM_THROTTLE_MS, now) {
            return;
        }
        if let Some(report) = self
            .with_current(|b, cx| b.animate_zoom(factor, None, cx))
            .flatten()
        {
            self.apply_scale_report(report);
        }
    }

    /// Disable `controls` until the next swap, on behalf of `requester`.
    pub fn deactivate_ui(&mut self, controls: &[ControlId], requester: Option<BoxId>) {
        self.ui.deactivate(controls, requester);
        for control in controls {
            self.host.set_control_enabled(control, false);
        }
        self.dispatch(|ext, cx| ext.on_deactivate_ui(controls, requester, cx));
    }

    fn reactivate_ui(&mut self) {
        let Some((controls, _)) = self.ui.take() else {
            return;
        };
        for control in &controls {
            self.host.set_control_enabled(control, true);
        }
        self.dispatch(|ext, cx| ext.on_reactivate_ui(cx));
    }

    fn notify_image_view(&mut self, data: &ViewData) {
        if let Some(on_image_view) = self.hooks.on_image_view.as_mut() {
            on_image_view(data);
        }
        self.dispatch(|ext, cx| ext.on_image_view(data, cx));
    }

    fn notify_content_change(&mut self, content: &ContentSnapshot) {
        if let Some(on_content_change) = self.hooks.on_content_change.as_mut() {
            on_content_change(content);
        }
        self.dispatch(|ext, cx| ext.on_content_change(content, cx));
    }

    /// Call `f` on every extension, then run the commands they queued.
    fn dispatch(&mut self, mut f: impl FnMut(&mut dyn Extension, &mut ExtensionContext<'_>)) {
        if self.extensions.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        let mut cx = ExtensionContext::new(&snapshot);
        for ext in &mut self.extensions {
            f(ext.as_mut(), &mut cx);
        }
        let commands = cx.into_commands();
        self.run_commands(commands);
    }

    fn run_commands(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Next => self.next(),
                Command::Prev => self.prev(),
                Command::Close => {
                    self.close(true);
                }
                Command::View(index) => self.view(isize::try_from(index).unwrap_or(isize::MAX)),
                Command::ZoomIn => self.zoom_in(),
                Command::ZoomOut => self.zoom_out(),
                Command::Anchor(point) => {
                    self.with_current(|b, _| b.set_anchor(point));
                }
                Command::AbortTransition => self.abort_transition(),
                Command::DeactivateUi {
                    controls,
                    requester,
                } => self.deactivate_ui(&controls, requester),
                Command::Download { url, file_name } => self.host.download(&url, &file_name),
                Command::MoveContainer(motion) => self.host.move_container(motion),
            }
        }
    }

    fn for_each_box(&mut self, mut f: impl FnMut(&mut MediaBox, &mut BoxCx<'_, H>)) {
        let now = self.host.now();
        let viewport = self.host.viewport();
        let mut cx = BoxCx {
            host: &mut self.host,
            animator: &mut self.animator,
            now,
            viewport,
        };
        for b in &mut self.window {
            f(b, &mut cx);
        }
    }

    fn with_current<R>(
        &mut self,
        f: impl FnOnce(&mut MediaBox, &mut BoxCx<'_, H>) -> R,
    ) -> Option<R> {
        let now = self.host.now();
        let viewport = self.host.viewport();
        let b = self.window.iter_mut().find(|b| b.position() == 0)?;
        let mut cx = BoxCx {
            host: &mut self.host,
            animator: &mut self.animator,
            now,
            viewport,
        };
        Some(f(b, &mut cx))
    }

    /// Run `f` on box `id`, whether in the window or still leaving it.
    fn with_box<R>(
        &mut self,
        id: BoxId,
        f: impl FnOnce(&mut MediaBox, &mut BoxCx<'_, H>) -> R,
    ) -> Option<R> {
        let now = self.host.now();
        let viewport = self.host.viewport();
        let b = match self.window.iter_mut().find(|b| b.id() == id) {
            Some(b) => b,
            None => self
                .pending
                .as_mut()?
                .old
                .iter_mut()
                .find(|b| b.id() == id)?,
        };
        let mut cx = BoxCx {
            host: &mut self.host,
            animator: &mut self.animator,
            now,
            viewport,
        };
        Some(f(b, &mut cx))
    }
}

impl<H: Host> Drop for Viewer<H> {
    fn drop(&mut self) {
        if self.registry.is_held_by(self.id) {
            self.destroy();
        }
    }
}

/// Wrap `index` into `0..total`.
fn wrap(index: isize, total: usize) -> usize {
    let Ok(total_signed) = isize::try_from(total) else {
        return 0;
    };
    if total_signed == 0 {
        return 0;
    }
    usize::try_from(index.rem_euclid(total_signed)).unwrap_or(0)
}

fn view_data(
    from: Option<usize>,
    to: usize,
    via: Via,
    old: &[MediaBox],
    new: &[MediaBox],
) -> ViewData {
    ViewData {
        index: ViewIndex { from, to },
        via,
        from: old.iter().map(MediaBox::summary).collect(),
        to: new.iter().map(MediaBox::summary).collect(),
    }
}
