// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancellation tokens and completion signals.
//!
//! Both are cheap `Rc` handles; clones observe the same underlying flag. The
//! viewer is single-threaded, so neither type is `Send`.

use core::cell::{Cell, RefCell};
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, Waker};
use std::rc::Rc;

/// A flag that in-flight work checks before acting.
///
/// A viewer replaces its token on every navigation; the previous token is
/// cancelled, never reset.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[derive(Debug, Default)]
struct CompletionState {
    resolved: bool,
    wakers: Vec<Waker>,
}

/// A one-shot completion signal that can be polled or awaited.
///
/// [`Viewer::close`](crate::Viewer::close) returns one: it resolves when the
/// overlay has been torn down, which for an animated close happens after the
/// host reports the closing transitions.
#[derive(Clone, Debug, Default)]
pub struct Completion {
    state: Rc<RefCell<CompletionState>>,
}

impl Completion {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// An already-resolved completion.
    pub fn resolved() -> Self {
        let completion = Self::new();
        completion.resolve();
        completion
    }

    /// Returns `true` once the work has finished.
    pub fn is_resolved(&self) -> bool {
        self.state.borrow().resolved
    }

    pub(crate) fn resolve(&self) {
        let wakers = {
            let mut state = self.state.borrow_mut();
            state.resolved = true;
            core::mem::take(&mut state.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.state.borrow_mut();
        if state.resolved {
            Poll::Ready(())
        } else {
            state.wakers.push(cx.waker().clone());
            Poll::Pending
        }
    }
}
