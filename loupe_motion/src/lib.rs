// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=loupe_motion --heading-base-level=0

//! Loupe Motion: frame-driven easing and momentum for media boxes.
//!
//! A media box on screen is described by a [`BoxState`]: its laid-out size, a
//! persistent translation, and an in-progress transform (offset + uniform
//! scale) used during gestures. This crate moves that state over time:
//!
//! - [`Animator`] eases state fields towards a [`StateTarget`], one job per
//!   key, using exponential approach (`next = current + (target - current) * 0.2`)
//!   with a snap threshold per field.
//! - [`MomentumThrow`] integrates a released drag: it adds velocity, decays it,
//!   and pulls the content back with an elastic correction when it strays past
//!   the viewport center.
//!
//! Neither type schedules anything. The host calls [`Animator::step`] and
//! [`MomentumThrow::step`] once per animation frame and applies the returned
//! [`StatePatch`] to whatever renders the box.
//!
//! ## Example
//!
//! ```rust
//! use loupe_motion::{Animator, BoxState, Step, StateTarget, WaitPolicy};
//!
//! let mut state = BoxState { width: 100.0, height: 50.0, ..BoxState::default() };
//! let mut animator: Animator<u32, &str> = Animator::new();
//! animator.start(7, StateTarget::size(200.0, 100.0), WaitPolicy::Never, "revealed");
//!
//! let mut frames = 0;
//! loop {
//!     frames += 1;
//!     match animator.step(&7, &state, false) {
//!         Step::Advance(patch) => state.apply(&patch),
//!         Step::Done(patch, tag) => {
//!             state.apply(&patch);
//!             assert_eq!(tag, "revealed");
//!             break;
//!         }
//!         Step::Idle | Step::Waiting => unreachable!(),
//!     }
//! }
//! assert_eq!(state.width, 200.0);
//! assert!(frames > 10);
//! ```
//!
//! This crate is `no_std` compatible.

#![no_std]

mod animator;
mod momentum;
mod state;

pub use animator::{
    Animator, Job, SCALE_SNAP, SIZE_SNAP, Step, WaitPolicy, ease,
};
pub use momentum::{MomentumThrow, THROW_STOP_SPEED, ThrowStep, settle_offset};
pub use state::{BoxState, BoxTransform, StatePatch, StateTarget};
