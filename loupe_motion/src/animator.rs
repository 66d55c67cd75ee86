// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-key easing jobs.

use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::Vec2;

use crate::state::{BoxState, BoxTransform, StatePatch, StateTarget};

/// Snap threshold for sizes, offsets and translations, in pixels.
pub const SIZE_SNAP: f64 = 1.0;

/// Snap threshold for scale. Scale multiplies large pixel sizes, so it needs a
/// much tighter epsilon than pixel values.
pub const SCALE_SNAP: f64 = 0.005;

const EASE_FACTOR: f64 = 0.2;

/// One exponential-approach step from `current` towards `target`, snapping to
/// `target` once the remaining distance is below `threshold`.
pub fn ease(current: f64, target: f64, threshold: f64) -> f64 {
    let diff = target - current;
    if diff.abs() < threshold {
        target
    } else {
        current + diff * EASE_FACTOR
    }
}

/// Whether a job may advance while the owner is in a "rapid" period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Always advance.
    #[default]
    Never,
    /// Hold (without advancing) while the owner reports a rapid period.
    WhileRapid,
}

/// A registered animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Job<C> {
    /// Values being animated towards.
    pub target: StateTarget,
    /// Wait policy.
    pub wait: WaitPolicy,
    /// Tag handed back when the job completes.
    pub completion: C,
}

/// Result of stepping one key for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step<C> {
    /// No job is registered for the key.
    Idle,
    /// The job is holding because of its [`WaitPolicy`].
    Waiting,
    /// Apply this patch; the job continues next frame.
    Advance(StatePatch),
    /// Apply this patch; the job is finished and removed.
    Done(StatePatch, C),
}

/// Eases [`BoxState`]s towards targets, at most one job per key.
#[derive(Clone, Debug)]
pub struct Animator<K, C> {
    jobs: HashMap<K, Job<C>>,
}

impl<K, C> Default for Animator<K, C> {
    fn default() -> Self {
        Self {
            jobs: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, C> Animator<K, C> {
    /// Create an animator with no jobs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job for `key`, replacing (and returning) any existing one.
    pub fn start(
        &mut self,
        key: K,
        target: StateTarget,
        wait: WaitPolicy,
        completion: C,
    ) -> Option<Job<C>> {
        self.jobs.insert(
            key,
            Job {
                target,
                wait,
                completion,
            },
        )
    }

    /// Remove the job for `key`, returning its target. The completion is not
    /// reported.
    pub fn stop(&mut self, key: &K) -> Option<StateTarget> {
        self.jobs.remove(key).map(|job| job.target)
    }

    /// The job registered for `key`.
    pub fn job(&self, key: &K) -> Option<&Job<C>> {
        self.jobs.get(key)
    }

    /// Returns `true` if a job is registered for `key`.
    pub fn is_running(&self, key: &K) -> bool {
        self.jobs.contains_key(key)
    }

    /// Number of registered jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns `true` if no job is registered.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Keys with a registered job.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.jobs.keys()
    }

    /// Drop every job whose key does not satisfy `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.jobs.retain(|key, _| keep(key));
    }

    /// Drop every job.
    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    /// Advance the job for `key` by one frame, given the box's `current` state.
    ///
    /// `rapid` reports whether the owner is in a rapid period; jobs with
    /// [`WaitPolicy::WhileRapid`] hold while it is set. All eased fields are
    /// returned in a single patch. A job is done when every target field is
    /// exactly reached after applying that patch.
    pub fn step(&mut self, key: &K, current: &BoxState, rapid: bool) -> Step<C> {
        let Some(job) = self.jobs.get(key) else {
            return Step::Idle;
        };
        if rapid && job.wait == WaitPolicy::WhileRapid {
            return Step::Waiting;
        }

        let patch = eased_patch(&job.target, current);
        let mut next = *current;
        next.apply(&patch);
        if job.target.is_reached(&next) {
            match self.jobs.remove(key) {
                Some(job) => Step::Done(patch, job.completion),
                None => Step::Idle,
            }
        } else {
            Step::Advance(patch)
        }
    }
}

fn eased_patch(target: &StateTarget, current: &BoxState) -> StatePatch {
    let mut patch = StatePatch {
        width: target.width.map(|t| ease(current.width, t, SIZE_SNAP)),
        height: target.height.map(|t| ease(current.height, t, SIZE_SNAP)),
        ..StatePatch::default()
    };

    if target.x.is_some() || target.y.is_some() || target.scale.is_some() {
        let t = current.transform;
        patch.transform = Some(BoxTransform {
            x: target.x.map_or(t.x, |x| ease(t.x, x, SIZE_SNAP)),
            y: target.y.map_or(t.y, |y| ease(t.y, y, SIZE_SNAP)),
            scale: target
                .scale
                .map_or(t.scale, |s| ease(t.scale, s, SCALE_SNAP)),
        });
    }

    if target.translate_x.is_some() || target.translate_y.is_some() {
        let t = current.translate;
        patch.translate = Some(Vec2::new(
            target.translate_x.map_or(t.x, |x| ease(t.x, x, SIZE_SNAP)),
            target.translate_y.map_or(t.y, |y| ease(t.y, y, SIZE_SNAP)),
        ));
    }

    patch
}
