// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Media boxes: one per item in the mounted window.
//!
//! A [`MediaBox`] owns the observable [`BoxState`] of one item and pushes every
//! write to the host immediately, field by field, through
//! [`Host::project`]. Zoom and pan are expressed as a transform on top of the
//! laid-out size; when a gesture ends the transform is folded back into the
//! width, height and translation ("finalized") so the next gesture starts from
//! an identity transform.
//!
//! Lifecycle of a box:
//!
//! 1. Built for a window slot, then attached: the thumbnail is lifted into the
//!    position-0 box and the load is started.
//! 2. Initialized once mounted. When the host reports the decode, boxes near the
//!    current item wait [`REVEAL_DELAY_MS`] and then animate from the
//!    thumbnail's size to full size; farther boxes jump there.
//! 3. Ready: gestures apply.
//! 4. Cancelled and destroyed when the window moves on, restoring the thumbnail.

use kurbo::{Point, Size, Vec2};
use loupe_fit::{SrcSet, anchored_zoom, fitted_size, thumbnail_offset};
use loupe_motion::{
    Animator, BoxState, BoxTransform, MomentumThrow, StatePatch, StateTarget, ThrowStep, Step,
    WaitPolicy,
};

use crate::extension::{BoxSummary, ContentSnapshot};
use crate::host::{Host, Placement, Projection, ThumbnailLayout};
use crate::media::{Media, SizeBounds};
use crate::source::{ElementInfo, ItemConfig, OriginInfo, ParsedItem};

/// Delay between a decode and the start of the reveal animation.
pub const REVEAL_DELAY_MS: u64 = 333;

/// Debounce before a box smaller than full size animates back to it.
pub const NORMALIZE_DELAY_MS: u64 = 50;

/// Distance within which a finalized size or translation snaps to rest.
const REST_SNAP: f64 = 1.0;

/// Handle of a media box, unique within a viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub u64);

bitflags::bitflags! {
    /// Status markers of a media box.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BoxFlags: u8 {
        /// The host reported the media decoded.
        const DECODED = 0b0000_0001;
        /// Sized and waiting to reveal, or revealed.
        const LOADED = 0b0000_0010;
        /// At full size; gestures apply.
        const READY = 0b0000_0100;
        /// The window moved on; pending work is dropped.
        const LOAD_CANCELLED = 0b0000_1000;
        /// The media failed to load.
        const FAILED = 0b0001_0000;
        /// Larger than full size.
        const ZOOMED_IN = 0b0010_0000;
        /// A momentum throw is running.
        const THROWING = 0b0100_0000;
        /// Mounted and initialized.
        const INITIALIZED = 0b1000_0000;
    }
}

impl Default for BoxFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Completion tags of box animations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum JobEnd {
    /// The reveal reached full size.
    Reveal,
    /// A zoom or normalize finished; finalize the transform.
    Finalize,
    /// A throw settled; finalize the transform.
    EndThrow,
}

/// What a box needs from its viewer to do work.
pub(crate) struct BoxCx<'a, H: Host + ?Sized> {
    pub(crate) host: &'a mut H,
    pub(crate) animator: &'a mut Animator<BoxId, JobEnd>,
    pub(crate) now: u64,
    pub(crate) viewport: Size,
}

impl<H: Host + ?Sized> BoxCx<'_, H> {
    fn center(&self) -> Point {
        (self.viewport.to_vec2() / 2.0).to_point()
    }
}

/// Zoom state after a scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleReport {
    /// Width relative to full size.
    pub scale: f64,
    /// At or past the maximum zoom.
    pub is_max: bool,
    /// At or below full size.
    pub is_min: bool,
}

/// Outcome of folding a gesture transform into the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Finalized {
    /// The box was released below its close threshold.
    pub(crate) close: bool,
    /// The box came to rest as the current item.
    pub(crate) content_changed: bool,
    /// Zoom state after finalizing.
    pub(crate) report: ScaleReport,
}

#[derive(Clone, Debug)]
struct Origin {
    info: OriginInfo,
    placement: Option<Placement>,
}

/// One item of the mounted window.
#[derive(Debug)]
pub struct MediaBox {
    id: BoxId,
    position: isize,
    index: usize,
    config: ItemConfig,
    srcset: Option<SrcSet>,
    origin: Option<Origin>,
    media: Box<dyn Media>,
    state: BoxState,
    bounds: SizeBounds,
    initial: Size,
    natural: Option<Size>,
    max_zoom_level: f64,
    flags: BoxFlags,
    source: String,
    anchor: Point,
    gesture_origin: Option<Point>,
    reveal_at: Option<u64>,
    normalize_at: Option<u64>,
    throw: Option<MomentumThrow>,
    handoff: Option<StateTarget>,
    adopted_ready: bool,
}

impl MediaBox {
    pub(crate) fn new(
        id: BoxId,
        position: isize,
        index: usize,
        item: ParsedItem,
        media: Box<dyn Media>,
        max_zoom_level: f64,
        viewport: Size,
    ) -> Self {
        let source = media.source(&item.config);
        Self {
            id,
            position,
            index,
            config: item.config,
            srcset: item.srcset,
            origin: item.origin.map(|info| Origin {
                info,
                placement: None,
            }),
            media,
            state: BoxState::default(),
            bounds: SizeBounds::default(),
            initial: Size::ZERO,
            natural: None,
            max_zoom_level,
            flags: BoxFlags::default(),
            source,
            anchor: (viewport.to_vec2() / 2.0).to_point(),
            gesture_origin: None,
            reveal_at: None,
            normalize_at: None,
            throw: None,
            handoff: None,
            adopted_ready: false,
        }
    }

    /// Handle.
    pub fn id(&self) -> BoxId {
        self.id
    }

    /// Position relative to the current item.
    pub fn position(&self) -> isize {
        self.position
    }

    /// Item index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Item source, alt and srcset.
    pub fn config(&self) -> &ItemConfig {
        &self.config
    }

    /// Observable state.
    pub fn state(&self) -> &BoxState {
        &self.state
    }

    /// Status markers.
    pub fn flags(&self) -> BoxFlags {
        self.flags
    }

    /// Size bounds, known once decoded.
    pub fn bounds(&self) -> SizeBounds {
        self.bounds
    }

    /// Size the box starts revealing from.
    pub fn initial_size(&self) -> Size {
        self.initial
    }

    /// Source currently shown.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Media variant.
    pub fn media(&self) -> &dyn Media {
        &*self.media
    }

    /// The element this item was opened from.
    pub fn origin(&self) -> Option<&OriginInfo> {
        self.origin.as_ref().map(|o| &o.info)
    }

    /// Reference point for zooms.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Returns `true` once gestures apply.
    pub fn is_ready(&self) -> bool {
        self.flags.contains(BoxFlags::READY)
    }

    /// Returns `true` while larger than full size.
    pub fn is_zoomed_in(&self) -> bool {
        self.flags.contains(BoxFlags::ZOOMED_IN)
    }

    pub(crate) fn set_anchor(&mut self, anchor: Point) {
        self.anchor = anchor;
    }

    /// Summary for view notifications.
    pub fn summary(&self) -> BoxSummary {
        BoxSummary {
            id: self.id,
            position: self.position,
            index: self.index,
            config: self.config.clone(),
            srcset: self.srcset.clone(),
        }
    }

    /// Snapshot for content-change notifications.
    pub fn snapshot(&self) -> ContentSnapshot {
        ContentSnapshot {
            id: self.id,
            index: self.index,
            position: self.position,
            config: self.config.clone(),
            srcset: self.srcset.clone(),
            origin: self.origin().cloned(),
            state: self.state,
            full: self.bounds.full,
        }
    }

    /// Write `patch` and project every field it contains.
    pub(crate) fn apply<H: Host + ?Sized>(&mut self, patch: StatePatch, host: &mut H) {
        self.state.apply(&patch);
        if let Some(width) = patch.width {
            host.project(self.id, &Projection::Width(width));
        }
        if let Some(height) = patch.height {
            host.project(self.id, &Projection::Height(height));
        }
        if let Some(transform) = patch.transform {
            host.project(self.id, &Projection::Transform(transform));
        }
        if let Some(translate) = patch.translate {
            host.project(self.id, &Projection::Translate(translate));
        }
        if let Some(below) = patch.below_min_width {
            host.project(self.id, &Projection::BelowMinWidth(below));
        }
        if let Some(width) = patch.width {
            self.update_source(width, host);
        }
    }

    fn update_source<H: Host + ?Sized>(&mut self, width: f64, host: &mut H) {
        if self.flags.contains(BoxFlags::LOAD_CANCELLED) {
            return;
        }
        let dpr = host.device_pixel_ratio();
        let Some(url) = self
            .media
            .responsive_source(width, dpr, self.srcset.as_ref())
        else {
            return;
        };
        if url != self.source {
            self.source = url.to_owned();
            host.project(self.id, &Projection::Source(self.source.clone()));
        }
    }

    fn set_flag<H: Host + ?Sized>(&mut self, flag: BoxFlags, on: bool, host: &mut H) {
        if self.flags.contains(flag) != on {
            self.flags.set(flag, on);
            host.project(self.id, &Projection::Flags(self.flags));
        }
    }

    /// Lift the thumbnail (position 0 only), lay it out and start the load.
    pub(crate) fn attach<H: Host + ?Sized>(&mut self, host: &mut H, viewport: Size) {
        if self.position == 0 {
            if let Some(origin) = self.origin.as_mut() {
                origin.placement = host.take_thumbnail(origin.info.image, self.id);
            }
        }
        self.layout_thumbnail(host, viewport);

        if self.media.needs_decode() {
            host.load_media(self.id, &self.source);
        } else {
            host.project(self.id, &Projection::Source(self.source.clone()));
            self.decoded(None, viewport);
        }
    }

    fn layout_thumbnail<H: Host + ?Sized>(&mut self, host: &mut H, viewport: Size) {
        let Some(origin) = &self.origin else {
            return;
        };
        let info = &origin.info;
        let mut initial = Size::ZERO;
        if origin.placement.is_some() {
            host.project(
                self.id,
                &Projection::Thumbnail(ThumbnailLayout {
                    size: info.rect.size(),
                    offset: thumbnail_offset(info.rect, viewport),
                    border_radius: info.border_radius.clone(),
                    object_fit: info.object_fit,
                }),
            );
            let fitted = fitted_size(Some(info.object_fit), info.natural_size, info.image_size);
            initial = Size::new(
                fitted.width.min(info.rect.width()),
                fitted.height.min(info.rect.height()),
            );
        }
        self.initial = initial;
        host.project(self.id, &Projection::InitialSize(initial));
    }

    fn decoded(&mut self, natural: Option<Size>, viewport: Size) {
        self.natural = natural;
        self.bounds = self.media.bounds(natural, viewport, self.max_zoom_level);
        self.flags.insert(BoxFlags::DECODED);
    }

    /// Mark the box mounted and, if already decoded, start revealing.
    pub(crate) fn init<H: Host + ?Sized>(&mut self, cx: &mut BoxCx<'_, H>) {
        self.flags.insert(BoxFlags::INITIALIZED);
        if self.flags.contains(BoxFlags::DECODED) {
            self.start(cx);
        }
    }

    /// The host finished decoding the media.
    pub(crate) fn on_decoded<H: Host + ?Sized>(&mut self, natural: Size, cx: &mut BoxCx<'_, H>) {
        if self
            .flags
            .intersects(BoxFlags::LOAD_CANCELLED | BoxFlags::DECODED)
        {
            return;
        }
        self.decoded(Some(natural), cx.viewport);
        if self.flags.contains(BoxFlags::INITIALIZED) {
            self.start(cx);
        }
    }

    /// The host could not load the media.
    pub(crate) fn fail<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.flags.contains(BoxFlags::LOAD_CANCELLED) {
            return;
        }
        self.reveal_at = None;
        self.set_flag(BoxFlags::FAILED, true, host);
        host.project(self.id, &Projection::Failed);
    }

    fn start<H: Host + ?Sized>(&mut self, cx: &mut BoxCx<'_, H>) {
        if !self.flags.contains(BoxFlags::LOADED) {
            self.apply(StatePatch::default().with_size(self.initial), cx.host);
        }

        if self.position.abs() > 1 {
            self.apply(StatePatch::default().with_size(self.bounds.full), cx.host);
            self.flags.insert(BoxFlags::LOADED | BoxFlags::READY);
            cx.host.project(self.id, &Projection::Flags(self.flags));
        } else if self.flags.contains(BoxFlags::LOADED) {
            if self.adopted_ready {
                self.set_flag(BoxFlags::READY, true, cx.host);
            } else {
                self.reveal(cx);
            }
        } else {
            self.set_flag(BoxFlags::LOADED, true, cx.host);
            self.reveal_at = Some(cx.now + REVEAL_DELAY_MS);
        }
    }

    fn reveal<H: Host + ?Sized>(&mut self, cx: &mut BoxCx<'_, H>) {
        if self.flags.contains(BoxFlags::LOAD_CANCELLED) {
            return;
        }
        let full = self.bounds.full;
        let target = self
            .handoff
            .take()
            .filter(|t| t.width.is_some() && t.height.is_some())
            .unwrap_or_else(|| StateTarget::size(full.width, full.height));
        cx.animator
            .start(self.id, target, WaitPolicy::WhileRapid, JobEnd::Reveal);
    }

    fn revealed<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.flags.contains(BoxFlags::LOAD_CANCELLED) {
            self.set_flag(BoxFlags::READY, true, host);
        }
    }

    /// Take over the look of `old`, which showed the same item in the previous
    /// window. `in_flight` is the target of the animation `old` was running.
    pub(crate) fn adopt<H: Host + ?Sized>(
        &mut self,
        old: &Self,
        in_flight: Option<StateTarget>,
        host: &mut H,
    ) {
        self.handoff = in_flight;
        if old.flags.contains(BoxFlags::LOADED) {
            self.apply(StatePatch::default().with_size(old.state.size()), host);
            self.set_flag(BoxFlags::LOADED, true, host);
            self.adopted_ready = old.flags.contains(BoxFlags::READY);
        }
    }

    /// Zoom by `factor` relative to the gesture start, keeping the anchor
    /// under `center` (the anchor itself when `None`).
    pub(crate) fn scale_move<H: Host + ?Sized>(
        &mut self,
        factor: f64,
        center: Option<Point>,
        animate: bool,
        cx: &mut BoxCx<'_, H>,
    ) -> Option<ScaleReport> {
        if !self.is_ready() || !self.media.zoomable() {
            return None;
        }
        let bounds_center = self.state.bounds(cx.center()).center();
        let content_center = *self.gesture_origin.get_or_insert(bounds_center);
        let offset = anchored_zoom(
            content_center,
            self.anchor,
            center.unwrap_or(self.anchor),
            factor,
        );
        let transform = BoxTransform::new(offset, factor);
        if animate {
            cx.animator.start(
                self.id,
                StateTarget::transform(transform),
                WaitPolicy::Never,
                JobEnd::Finalize,
            );
        } else {
            self.apply(StatePatch::default().with_transform(transform), cx.host);
        }

        let scaled = self.state.width * factor;
        self.set_flag(BoxFlags::ZOOMED_IN, scaled > self.bounds.full.width, cx.host);
        let below = scaled < self.bounds.min_width;
        if below != self.state.below_min_width {
            self.apply(StatePatch::default().with_below_min_width(below), cx.host);
        }
        Some(self.report(scaled))
    }

    /// Animated zoom by `factor`. Ignored when it would end below the close
    /// threshold.
    pub(crate) fn animate_zoom<H: Host + ?Sized>(
        &mut self,
        factor: f64,
        center: Option<Point>,
        cx: &mut BoxCx<'_, H>,
    ) -> Option<ScaleReport> {
        if self.state.width * factor < self.bounds.min_width {
            return None;
        }
        self.scale_move(factor, center, true, cx)
    }

    fn report(&self, width: f64) -> ScaleReport {
        let full = self.bounds.full.width;
        ScaleReport {
            scale: if full > 0.0 { width / full } else { 1.0 },
            is_max: width >= self.bounds.max_width,
            is_min: width <= full,
        }
    }

    /// Fold the gesture transform into size and translation.
    pub(crate) fn set_final_transform<H: Host + ?Sized>(
        &mut self,
        cx: &mut BoxCx<'_, H>,
    ) -> Option<Finalized> {
        if !self.is_ready() {
            return None;
        }
        self.gesture_origin = None;

        let BoxState {
            width,
            height,
            transform,
            translate,
            ..
        } = self.state;
        let full = self.bounds.full;
        let mut size = Size::new(width * transform.scale, height * transform.scale);
        if (size.width - full.width).abs() < REST_SNAP {
            size = full;
        }
        let mut translate = translate + transform.offset();
        if translate.x.abs() < REST_SNAP {
            translate.x = 0.0;
        }
        if translate.y.abs() < REST_SNAP {
            translate.y = 0.0;
        }
        self.apply(
            StatePatch::default()
                .with_size(size)
                .with_transform(BoxTransform::IDENTITY)
                .with_translate(translate)
                .with_below_min_width(false),
            cx.host,
        );
        self.set_flag(BoxFlags::ZOOMED_IN, size.width > full.width, cx.host);

        let mut outcome = Finalized {
            close: false,
            content_changed: false,
            report: self.report(size.width),
        };
        if size.width < self.bounds.min_width {
            outcome.close = true;
        } else if size.width > self.bounds.max_width {
            let factor = self.bounds.max_width / size.width;
            if let Some(report) = self.animate_zoom(factor, None, cx) {
                outcome.report = report;
            }
        } else if size.width < full.width {
            self.normalize_at = Some(cx.now + NORMALIZE_DELAY_MS);
        } else if self.position == 0 && self.media.emits_content_change() {
            outcome.content_changed = true;
        }
        Some(outcome)
    }

    /// Start a momentum throw. Returns `false` when the box is not ready.
    pub(crate) fn begin_throw<H: Host + ?Sized>(&mut self, velocity: Vec2, host: &mut H) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.throw = Some(MomentumThrow::new(velocity));
        self.set_flag(BoxFlags::THROWING, true, host);
        true
    }

    /// Stop a running throw and finalize where it is.
    pub(crate) fn cancel_throw<H: Host + ?Sized>(
        &mut self,
        cx: &mut BoxCx<'_, H>,
    ) -> Option<Finalized> {
        if self.throw.is_none() && !self.flags.contains(BoxFlags::THROWING) {
            return None;
        }
        cx.animator.stop(&self.id);
        self.throw = None;
        self.set_flag(BoxFlags::THROWING, false, cx.host);
        self.set_final_transform(cx)
    }

    fn step_throw<H: Host + ?Sized>(&mut self, cx: &mut BoxCx<'_, H>) {
        let center = cx.center();
        let Some(throw) = self.throw.as_mut() else {
            return;
        };
        let step = throw.step(
            self.state.transform.offset(),
            self.state.bounds(center),
            center,
        );
        match step {
            ThrowStep::Continue(offset) => {
                let transform = BoxTransform::new(offset, self.state.transform.scale);
                self.apply(StatePatch::default().with_transform(transform), cx.host);
            }
            ThrowStep::Settle(offset) => {
                self.throw = None;
                cx.animator.start(
                    self.id,
                    StateTarget::offset(offset),
                    WaitPolicy::Never,
                    JobEnd::EndThrow,
                );
            }
        }
    }

    fn start_normalize<H: Host + ?Sized>(&mut self, cx: &mut BoxCx<'_, H>) {
        let full = self.bounds.full;
        cx.animator.start(
            self.id,
            StateTarget::size(full.width, full.height)
                .with_translate(Vec2::ZERO)
                .with_transform(BoxTransform::IDENTITY),
            WaitPolicy::Never,
            JobEnd::Finalize,
        );
    }

    /// Jump to full size at rest.
    fn normalize_now<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.apply(
            StatePatch::default()
                .with_size(self.bounds.full)
                .with_transform(BoxTransform::IDENTITY)
                .with_translate(Vec2::ZERO)
                .with_below_min_width(false),
            host,
        );
        self.set_flag(BoxFlags::ZOOMED_IN, false, host);
    }

    /// Recompute geometry after the viewport changed. `element` is a fresh
    /// snapshot of the origin element, if the item has one.
    pub(crate) fn set_sizes<H: Host + ?Sized>(
        &mut self,
        element: Option<&ElementInfo>,
        cx: &mut BoxCx<'_, H>,
    ) {
        if let (Some(origin), Some(element)) = (self.origin.as_mut(), element) {
            origin.info.refresh(element);
        }
        self.layout_thumbnail(cx.host, cx.viewport);
        if self.flags.contains(BoxFlags::LOAD_CANCELLED) || !self.flags.contains(BoxFlags::DECODED)
        {
            return;
        }
        self.bounds = self
            .media
            .bounds(self.natural, cx.viewport, self.max_zoom_level);
        if self.is_ready() && !self.is_zoomed_in() {
            cx.animator.stop(&self.id);
            self.normalize_now(cx.host);
        }
    }

    /// Advance timers, throws and animations by one frame.
    pub(crate) fn frame<H: Host + ?Sized>(
        &mut self,
        cx: &mut BoxCx<'_, H>,
        rapid: bool,
    ) -> Option<Finalized> {
        if self.flags.contains(BoxFlags::LOAD_CANCELLED) {
            cx.animator.stop(&self.id);
            return None;
        }
        if self.reveal_at.is_some_and(|at| cx.now >= at) {
            self.reveal_at = None;
            self.reveal(cx);
        }
        if self.normalize_at.is_some_and(|at| cx.now >= at) {
            self.normalize_at = None;
            self.start_normalize(cx);
        }
        if self.throw.is_some() {
            self.step_throw(cx);
        }

        match cx.animator.step(&self.id, &self.state, rapid) {
            Step::Idle | Step::Waiting => None,
            Step::Advance(patch) => {
                self.apply(patch, cx.host);
                None
            }
            Step::Done(patch, end) => {
                self.apply(patch, cx.host);
                match end {
                    JobEnd::Reveal => {
                        self.revealed(cx.host);
                        None
                    }
                    JobEnd::Finalize => self.set_final_transform(cx),
                    JobEnd::EndThrow => {
                        self.set_flag(BoxFlags::THROWING, false, cx.host);
                        self.set_final_transform(cx)
                    }
                }
            }
        }
    }

    /// Drop pending loads and reveals; later decodes are ignored.
    pub(crate) fn cancel_pending_load<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.reveal_at = None;
        self.set_flag(BoxFlags::LOAD_CANCELLED, true, host);
    }

    /// Stop every motion and finalize, ahead of closing.
    pub(crate) fn prepare_close<H: Host + ?Sized>(&mut self, cx: &mut BoxCx<'_, H>) {
        cx.animator.stop(&self.id);
        self.throw = None;
        self.reveal_at = None;
        self.normalize_at = None;
        self.set_flag(BoxFlags::THROWING, false, cx.host);
        self.set_final_transform(cx);
    }

    /// Restore the thumbnail and detach the box.
    pub(crate) fn destroy<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.throw = None;
        self.reveal_at = None;
        self.normalize_at = None;
        if let Some(origin) = self.origin.as_mut() {
            if let Some(placement) = origin.placement.take() {
                host.restore_thumbnail(origin.info.image, &placement);
            }
        }
        host.detach_box(self.id);
    }
}
