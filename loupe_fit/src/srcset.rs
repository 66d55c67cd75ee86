// Copyright 2025 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// One `url NNNw` candidate of a `srcset`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SrcSetEntry {
    /// Candidate URL.
    pub url: String,
    /// Intrinsic width in pixels.
    pub width: u32,
}

/// A parsed `srcset` with width descriptors, sorted by ascending width.
///
/// Density descriptors (`2x`) and malformed candidates are skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SrcSet {
    entries: Vec<SrcSetEntry>,
}

impl SrcSet {
    /// Parse a `srcset` attribute value.
    pub fn parse(value: &str) -> Self {
        let mut entries: Vec<SrcSetEntry> = value
            .split(',')
            .filter_map(|candidate| {
                let mut parts = candidate.split_whitespace();
                let url = parts.next()?;
                let width = parts.next()?.strip_suffix('w')?.parse().ok()?;
                Some(SrcSetEntry {
                    url: url.to_string(),
                    width,
                })
            })
            .collect();
        entries.sort_by_key(|e| e.width);
        Self { entries }
    }

    /// Parsed entries, smallest first.
    pub fn entries(&self) -> &[SrcSetEntry] {
        &self.entries
    }

    /// Returns `true` if no candidate could be parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The widest candidate.
    pub fn largest(&self) -> Option<&SrcSetEntry> {
        self.entries.last()
    }

    /// The first candidate at least `width * device_pixel_ratio` wide, or the
    /// widest one if none is large enough.
    pub fn select(&self, width: f64, device_pixel_ratio: f64) -> Option<&SrcSetEntry> {
        let ratio = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let target = width * ratio;
        self.entries
            .iter()
            .find(|e| f64::from(e.width) >= target)
            .or_else(|| self.largest())
    }
}
