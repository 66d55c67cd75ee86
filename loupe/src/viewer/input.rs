// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User input: pointers, keys, the wheel, overlay controls and resizes.

use kurbo::Point;
use loupe_event_state::gesture::GestureAction;
use loupe_event_state::pointers::{PointerInput, PointerUpdate};

use super::{Motion, Phase, Viewer};
use crate::config::ControlId;
use crate::hooks::ListenerEvent;
use crate::host::Host;
use crate::media_box::BoxCx;

/// Keys the viewer responds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Previous item.
    ArrowLeft,
    /// Next item.
    ArrowRight,
    /// Zoom in.
    ArrowUp,
    /// Zoom out.
    ArrowDown,
    /// Close.
    Escape,
    /// Anything else.
    Other,
}

impl<H: Host> Viewer<H> {
    /// A pointer went down.
    pub fn pointer_down(&mut self, input: PointerInput) {
        let update = self.tracker.down(input);
        self.handle_pointer(update);
    }

    /// A pointer moved.
    pub fn pointer_move(&mut self, input: PointerInput) {
        let update = self.tracker.moved(input);
        self.handle_pointer(update);
    }

    /// A pointer was released.
    pub fn pointer_up(&mut self, input: PointerInput) {
        let update = self.tracker.up(input);
        self.handle_pointer(update);
    }

    /// The platform cancelled a pointer.
    pub fn pointer_cancel(&mut self, input: PointerInput) {
        let update = self.tracker.cancel(input);
        self.handle_pointer(update);
    }

    /// A context menu opened.
    pub fn context_menu(&mut self) {
        self.tracker.context_menu();
    }

    /// A non-primary button was clicked.
    pub fn aux_click(&mut self) {
        self.tracker.context_menu();
    }

    /// Handle a key press. Returns `true` if the key was used.
    pub fn key_down(&mut self, key: Key) -> bool {
        if !self.config.keyboard_listeners || !self.accepts_input() {
            return false;
        }
        match key {
            Key::ArrowLeft => self.prev(),
            Key::ArrowRight => self.next(),
            Key::ArrowUp => self.zoom_in(),
            Key::ArrowDown => self.zoom_out(),
            Key::Escape => {
                self.close(true);
            }
            Key::Other => return false,
        }
        true
    }

    /// Zoom about `position` by one step. Negative `delta_y` zooms in.
    /// Returns `true` if the event was used.
    pub fn wheel(&mut self, position: Point, delta_y: f64) -> bool {
        if !self.accepts_input() || delta_y == 0.0 {
            return false;
        }
        self.with_current(|b, _| b.set_anchor(position));
        if delta_y < 0.0 {
            self.zoom_in();
        } else {
            self.zoom_out();
        }
        true
    }

    /// The host activated `control` in the overlay.
    pub fn activate_control(&mut self, control: &ControlId) {
        if !self.accepts_input() || self.ui.is_deactivated(control) {
            return;
        }
        match control {
            ControlId::Close => {
                self.close(true);
            }
            ControlId::Prev => self.prev(),
            ControlId::Next => self.next(),
            ControlId::ZoomIn => self.zoom_in(),
            ControlId::ZoomOut => self.zoom_out(),
            ControlId::IndexDisplay | ControlId::Description => {}
            ControlId::Extension(name) => {
                self.dispatch(|ext, cx| {
                    if ext.name() == name.as_str() {
                        ext.on_control(cx);
                    }
                });
            }
        }
    }

    /// The viewport changed size. Re-reads origin geometry and refits every box.
    pub fn resize(&mut self) {
        let now = self.host.now();
        let viewport = self.host.viewport();
        for b in &mut self.window {
            let element = b.origin().and_then(|o| self.host.element(o.element()));
            let mut cx = BoxCx {
                host: &mut self.host,
                animator: &mut self.animator,
                now,
                viewport,
            };
            b.set_sizes(element.as_ref(), &mut cx);
        }
    }

    fn accepts_input(&self) -> bool {
        self.registry.is_held_by(self.id) && matches!(self.phase, Phase::Opening | Phase::Open)
    }

    fn handle_pointer(&mut self, update: Option<PointerUpdate>) {
        let Some(update) = update else {
            return;
        };
        if !self.accepts_input() {
            return;
        }
        let now = self.host.now();
        for action in self.gestures.interpret(&update, self.zoomed_in, now) {
            match action {
                GestureAction::CancelMotion => self.cancel_motion(),
                GestureAction::Anchor(point) => {
                    self.with_current(|b, _| b.set_anchor(point));
                }
                GestureAction::ScaleMove { factor, center } => {
                    let report = self
                        .with_current(|b, cx| b.scale_move(factor, Some(center), false, cx))
                        .flatten();
                    if let Some(report) = report {
                        self.apply_scale_report(report);
                    }
                }
                GestureAction::Release => {
                    let released = self.with_current(|b, cx| (b.id(), b.set_final_transform(cx)));
                    if let Some((id, Some(finalized))) = released {
                        self.motion = Some(Motion::Settle(id));
                        self.after_finalize(id, finalized, true);
                    }
                }
                GestureAction::Throw(velocity) => {
                    let thrown =
                        self.with_current(|b, cx| (b.id(), b.begin_throw(velocity, cx.host)));
                    if let Some((id, true)) = thrown {
                        self.motion = Some(Motion::Throw(id));
                    }
                }
            }
        }

        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        let event = ListenerEvent {
            update: &update,
            snapshot: &snapshot,
            has_internal_execution: self.zoomed_in || self.gestures.is_pinching(now),
        };
        let mut commands = Vec::new();
        for listener in &mut self.listeners {
            listener.on_pointer(&event, &mut commands);
        }
        self.run_commands(commands);
    }

    /// Stop the throw or settle animation of the last gesture, folding the
    /// transform in where it stopped.
    fn cancel_motion(&mut self) {
        match self.motion.take() {
            Some(Motion::Throw(id)) => {
                if let Some(Some(finalized)) = self.with_box(id, |b, cx| b.cancel_throw(cx)) {
                    self.after_finalize(id, finalized, false);
                }
            }
            Some(Motion::Settle(id)) => {
                if !self.animator.is_running(&id) {
                    return;
                }
                let finalized = self.with_box(id, |b, cx| {
                    cx.animator.stop(&id);
                    b.set_final_transform(cx)
                });
                if let Some(Some(finalized)) = finalized {
                    self.after_finalize(id, finalized, false);
                }
            }
            None => {}
        }
    }
}
