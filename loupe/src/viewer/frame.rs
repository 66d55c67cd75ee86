// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-driven progress: animation frames, decodes and transition ends.

use kurbo::Size;

use super::{CLOSE_RELEASE_AT, CLOSE_TEARDOWN_AT, Phase, Viewer};
use crate::extension::ViewData;
use crate::host::{Host, OverlayState};
use crate::media_box::{BoxCx, BoxId, Finalized, MediaBox};

impl<H: Host> Viewer<H> {
    /// Advance one animation frame.
    pub fn frame(&mut self) {
        if self.phase == Phase::Closed {
            return;
        }
        let now = self.host.now();

        let activate = match self.activation.as_mut() {
            Some(activation) => {
                activation.frames_left = activation.frames_left.saturating_sub(1);
                activation.frames_left == 0
            }
            None => false,
        };
        if activate {
            if let Some(activation) = self.activation.take() {
                self.activate(activation.data);
            }
        }

        if self.rapid_release_at.is_some_and(|at| now >= at) {
            self.rapid_release_at = None;
            self.rapid = false;
        }

        self.drive_boxes(now);

        if core::mem::take(&mut self.close_requested) {
            self.close(true);
        }
    }

    fn activate(&mut self, data: ViewData) {
        self.phase = Phase::Open;
        self.host.set_overlay_state(OverlayState::Active);
        let snapshot = self.snapshot();
        if let Some(on_open) = self.hooks.on_open.as_mut() {
            on_open(&snapshot);
        }
        self.dispatch(|ext, cx| ext.on_open(cx));
        self.notify_image_view(&data);
    }

    fn drive_boxes(&mut self, now: u64) {
        let viewport = self.host.viewport();
        let rapid = self.rapid;
        let mut finalized = Vec::new();
        let mut cx = BoxCx {
            host: &mut self.host,
            animator: &mut self.animator,
            now,
            viewport,
        };
        let leaving = self
            .pending
            .as_mut()
            .map(|p| p.old.as_mut_slice())
            .unwrap_or_default();
        for b in self.window.iter_mut().chain(leaving.iter_mut()) {
            if let Some(f) = b.frame(&mut cx, rapid) {
                finalized.push((b.id(), f));
            }
        }

        let alive: Vec<BoxId> = self
            .window
            .iter()
            .chain(self.pending.iter().flat_map(|p| p.old.iter()))
            .map(MediaBox::id)
            .collect();
        self.animator.retain(|id| alive.contains(id));

        for (id, f) in finalized {
            self.after_finalize(id, f, false);
        }
    }

    /// React to a box coming to rest. Close requests are only honored for
    /// gestures the user released; they run on the next frame.
    pub(super) fn after_finalize(&mut self, id: BoxId, finalized: Finalized, honor_close: bool) {
        let is_current = self.current_box().is_some_and(|b| b.id() == id);
        if !is_current {
            return;
        }
        self.apply_scale_report(finalized.report);
        if finalized.content_changed && self.phase != Phase::Closing {
            if let Some(content) = self.current_box().map(MediaBox::snapshot) {
                self.notify_content_change(&content);
            }
        }
        if honor_close && finalized.close {
            self.close_requested = true;
        }
    }

    /// The host decoded the media of box `id`.
    pub fn on_media_loaded(&mut self, id: BoxId, natural: Size) {
        if self.with_box(id, |b, cx| b.on_decoded(natural, cx)).is_none() {
            log::debug!("decode for {id:?} arrived after its box was dropped");
        }
    }

    /// The host failed to load the media of box `id`.
    pub fn on_media_failed(&mut self, id: BoxId, reason: &str) {
        log::warn!("media of {id:?} failed to load: {reason}");
        self.with_box(id, |b, cx| b.fail(cx.host));
    }

    /// The container transition started by a swap finished.
    pub fn on_transition_end(&mut self) {
        if let Some(pending) = self.pending.take() {
            let data = self.complete_swap(pending);
            self.notify_image_view(&data);
        }
    }

    /// A transition of the overlay root finished.
    ///
    /// While closing, the second report releases the boxes and the third tears
    /// the overlay down. While open, the first report marks the opening
    /// transition as settled.
    pub fn on_root_transition_end(&mut self) {
        if let Some(closing) = self.closing.as_mut() {
            closing.transitions_seen = closing.transitions_seen.saturating_add(1);
            let seen = closing.transitions_seen;
            if seen >= CLOSE_TEARDOWN_AT {
                if let Some(closing) = self.closing.take() {
                    self.teardown(&closing.completion);
                }
            } else if seen == CLOSE_RELEASE_AT {
                self.release_window();
            }
            return;
        }
        if self.phase == Phase::Open && !self.settled {
            self.settled = true;
            self.host.set_overlay_state(OverlayState::Settled);
        }
    }
}
