// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use loupe_event_state::pointers::PointerPhase;
use loupe_event_state::swipe::{SwipeAxis, SwipeOutcome, SwipeTracker};

use crate::extension::Command;
use crate::hooks::{ListenerEvent, PointerListener};
use crate::host::ContainerMotion;

/// Duration of the snap-back after a swipe that went nowhere.
pub const SNAP_BACK_MS: u64 = 222;

/// Default pointer listener: swipe sideways to navigate, vertically to close.
///
/// Ignores updates the built-in gestures are using, and multi-pointer updates.
/// Horizontal swipes only navigate when there is more than one item.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwipeNavigator {
    tracker: SwipeTracker,
}

impl SwipeNavigator {
    /// An idle navigator.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PointerListener for SwipeNavigator {
    fn on_pointer(&mut self, event: &ListenerEvent<'_>, commands: &mut Vec<Command>) {
        let update = event.update;
        if event.has_internal_execution || update.pointers.len() > 1 {
            return;
        }
        let allow_horizontal = event.snapshot.total > 1;
        let position = update.pointer.position;

        match update.phase {
            PointerPhase::Down => {
                self.tracker.begin(position);
                commands.push(Command::AbortTransition);
            }
            PointerPhase::Move => {
                if let Some(drag) = self.tracker.update(position, allow_horizontal) {
                    commands.push(Command::MoveContainer(ContainerMotion::Drag(drag)));
                }
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                match self.tracker.finish(allow_horizontal) {
                    Some(SwipeOutcome::Dismiss) => {
                        commands.push(snap_back(SwipeAxis::Vertical));
                        commands.push(Command::Close);
                    }
                    Some(SwipeOutcome::Previous) => {
                        commands.push(Command::MoveContainer(ContainerMotion::Reset));
                        commands.push(Command::Prev);
                    }
                    Some(SwipeOutcome::Next) => {
                        commands.push(Command::MoveContainer(ContainerMotion::Reset));
                        commands.push(Command::Next);
                    }
                    Some(SwipeOutcome::SnapBack(axis)) => commands.push(snap_back(axis)),
                    None => {}
                }
            }
        }
    }
}

fn snap_back(axis: SwipeAxis) -> Command {
    Command::MoveContainer(ContainerMotion::SnapBack {
        axis,
        duration: SNAP_BACK_MS,
    })
}
