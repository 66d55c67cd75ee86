// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::hash::Hash;

use hashbrown::HashMap;

/// First-in-wins rate limiter, keyed by action.
///
/// The first call for a key always passes. Later calls pass only once `wait`
/// milliseconds have elapsed since the last call that passed; calls in between
/// are dropped, not deferred.
#[derive(Clone, Debug)]
pub struct Throttle<K> {
    last: HashMap<K, u64>,
}

impl<K> Default for Throttle<K> {
    fn default() -> Self {
        Self {
            last: HashMap::new(),
        }
    }
}

impl<K: Hash + Eq> Throttle<K> {
    /// An empty throttle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the action for `key` may run at `now`.
    pub fn first_in(&mut self, key: K, wait: u64, now: u64) -> bool {
        match self.last.get(&key) {
            Some(&last) if now.saturating_sub(last) < wait => false,
            _ => {
                self.last.insert(key, now);
                true
            }
        }
    }
}
