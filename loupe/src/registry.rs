// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cell::Cell;
use std::rc::Rc;

/// Identity of a viewer within an [`OpenRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewerId(u64);

#[derive(Debug, Default)]
struct RegistryState {
    next_id: Cell<u64>,
    open: Cell<Option<ViewerId>>,
}

/// Tracks which viewer, if any, is currently open.
///
/// At most one viewer sharing a registry can be open at a time. Clones share
/// the same state; give every viewer on a page a clone of one registry.
#[derive(Clone, Debug, Default)]
pub struct OpenRegistry {
    state: Rc<RegistryState>,
}

impl OpenRegistry {
    /// A registry with no open viewer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an identity for a new viewer.
    pub fn register(&self) -> ViewerId {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        ViewerId(id)
    }

    /// Mark `id` as the open viewer. Fails if another viewer is open.
    pub fn try_acquire(&self, id: ViewerId) -> bool {
        match self.state.open.get() {
            Some(open) => open == id,
            None => {
                self.state.open.set(Some(id));
                true
            }
        }
    }

    /// Clear the open viewer if it is `id`.
    pub fn release(&self, id: ViewerId) {
        if self.state.open.get() == Some(id) {
            self.state.open.set(None);
        }
    }

    /// Returns `true` if any viewer is open.
    pub fn is_open(&self) -> bool {
        self.state.open.get().is_some()
    }

    /// The open viewer.
    pub fn current(&self) -> Option<ViewerId> {
        self.state.open.get()
    }

    /// Returns `true` if `id` is the open viewer.
    pub fn is_held_by(&self, id: ViewerId) -> bool {
        self.state.open.get() == Some(id)
    }
}
