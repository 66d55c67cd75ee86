// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=loupe_event_state --heading-base-level=0

//! Loupe Event State: pointer and gesture state machines for a media viewer.
//!
//! This crate provides the small, focused state machines that sit between raw
//! pointer events and the zoom/pan/navigate actions of a lightbox. Each module
//! handles one interaction pattern:
//!
//! - [`pointers`]: Track the set of active pointers and emit normalized updates
//! - [`gesture`]: Interpret pointer updates as anchors, pinch scales, pans and throws
//! - [`swipe`]: Axis-locked single-pointer swipes for dismiss and navigation
//!
//! ## Design Philosophy
//!
//! None of these types listen to anything. The embedding shell forwards the
//! platform's pointer events (with timestamps where needed), and the state
//! machines return values describing what happened. This keeps them trivially
//! testable and independent of any event loop.
//!
//! ## Usage Patterns
//!
//! ### Pinch to zoom
//!
//! ```rust
//! use kurbo::Point;
//! use loupe_event_state::gesture::{GestureAction, GestureInterpreter};
//! use loupe_event_state::pointers::{PointerId, PointerInput, PointerTracker};
//!
//! let mut tracker = PointerTracker::new();
//! let mut gestures = GestureInterpreter::new();
//! tracker.start();
//!
//! let a = tracker.down(PointerInput::new(PointerId(1), Point::new(350.0, 300.0))).unwrap();
//! gestures.interpret(&a, false, 0);
//! let b = tracker.down(PointerInput::new(PointerId(2), Point::new(450.0, 300.0))).unwrap();
//! gestures.interpret(&b, false, 0);
//!
//! // Spread the fingers to twice the distance around the same center.
//! tracker.moved(PointerInput::new(PointerId(1), Point::new(300.0, 300.0)));
//! let m = tracker.moved(PointerInput::new(PointerId(2), Point::new(500.0, 300.0))).unwrap();
//! let actions = gestures.interpret(&m, false, 16);
//! assert_eq!(
//!     actions.as_slice(),
//!     &[GestureAction::ScaleMove { factor: 2.0, center: Point::new(400.0, 300.0) }]
//! );
//! ```
//!
//! ### Swipes
//!
//! ```rust
//! use kurbo::Point;
//! use loupe_event_state::swipe::{SwipeOutcome, SwipeTracker};
//!
//! let mut swipe = SwipeTracker::new();
//! swipe.begin(Point::new(100.0, 100.0));
//! swipe.update(Point::new(20.0, 110.0), true);
//! assert_eq!(swipe.finish(true), Some(SwipeOutcome::Next));
//! ```
//!
//! This crate is `no_std` compatible.

#![no_std]

pub mod gesture;
pub mod pointers;
pub mod swipe;
