// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::config::ControlId;
use crate::media_box::BoxId;

/// Controls an extension has asked to disable until the next swap.
///
/// There is a single pending set: deactivating again adds to it and replaces
/// the requester.
#[derive(Clone, Debug, Default)]
pub struct UiGate {
    deactivated: Vec<ControlId>,
    requester: Option<BoxId>,
}

impl UiGate {
    /// An empty gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable `controls` on behalf of `requester`.
    pub fn deactivate(&mut self, controls: &[ControlId], requester: Option<BoxId>) {
        for control in controls {
            if !self.deactivated.contains(control) {
                self.deactivated.push(control.clone());
            }
        }
        self.requester = requester;
    }

    /// Returns `true` if `control` is currently disabled.
    pub fn is_deactivated(&self, control: &ControlId) -> bool {
        self.deactivated.contains(control)
    }

    /// Disabled controls.
    pub fn deactivated(&self) -> &[ControlId] {
        &self.deactivated
    }

    /// The box on whose behalf the controls were disabled.
    pub fn requester(&self) -> Option<BoxId> {
        self.requester
    }

    /// Clear the pending set, returning it if anything was pending.
    pub fn take(&mut self) -> Option<(Vec<ControlId>, Option<BoxId>)> {
        if self.deactivated.is_empty() && self.requester.is_none() {
            return None;
        }
        Some((
            core::mem::take(&mut self.deactivated),
            self.requester.take(),
        ))
    }
}
