// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Interval placement
//!
//! Interrupts claim half-open sample ranges `[start, end)` on a signal. The
//! [`IntervalAllocator`] samples candidate ranges uniformly and, in
//! non-overlap mode, rejects any candidate that comes within `buffer`
//! samples of an already [`OccupiedSet`] range.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default separation kept between two placed intervals
pub const DEFAULT_BUFFER: usize = 100;
/// Default number of candidates sampled before giving up
pub const DEFAULT_MAX_TRIES: usize = 1000;

/// Half-open sample range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
}

impl Interval {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `other` stays at least `buffer` samples away on either side.
    pub fn is_clear_of(&self, other: &Interval, buffer: usize) -> bool {
        // end <= s - buffer, written without underflow
        self.end + buffer <= other.start || self.start >= other.end + buffer
    }
}

impl From<(usize, usize)> for Interval {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

/// Intervals already claimed on one signal, in placement order.
///
/// The set only ever grows and lives for a single composition call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupiedSet(Vec<Interval>);

impl OccupiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, interval: Interval) {
        self.0.push(interval);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.0
    }

    /// True when `candidate` keeps `buffer` samples away from every member.
    pub fn admits(&self, candidate: &Interval, buffer: usize) -> bool {
        self.0.iter().all(|occupied| candidate.is_clear_of(occupied, buffer))
    }
}

impl<I: Into<Interval>> FromIterator<I> for OccupiedSet {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a OccupiedSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Randomised interval finder with a bounded number of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalAllocator {
    /// Minimum gap in samples between a new interval and occupied ones
    pub buffer: usize,
    /// Candidates sampled before reporting exhaustion
    pub max_tries: usize,
}

impl Default for IntervalAllocator {
    fn default() -> Self {
        Self {
            buffer: DEFAULT_BUFFER,
            max_tries: DEFAULT_MAX_TRIES,
        }
    }
}

impl IntervalAllocator {
    pub fn new(buffer: usize, max_tries: usize) -> Self {
        Self { buffer, max_tries }
    }

    /// Find an interval of `duration` samples clear of every occupied one.
    ///
    /// Returns `None` when no candidate was accepted within `max_tries`
    /// draws, or when the request cannot fit at all (`duration` of zero or
    /// not shorter than the signal). Exhaustion is not an error: callers
    /// skip the interrupt and carry on.
    pub fn find<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        signal_length: usize,
        duration: usize,
        occupied: &OccupiedSet,
    ) -> Option<Interval> {
        let max_start = Self::max_start(signal_length, duration)?;

        for _ in 0..self.max_tries {
            let start = rng.random_range(0..=max_start);
            let candidate = Interval::new(start, start + duration);
            if occupied.admits(&candidate, self.buffer) {
                return Some(candidate);
            }
        }

        debug!(
            "No room for {} samples after {} tries ({} intervals occupied)",
            duration,
            self.max_tries,
            occupied.len()
        );
        None
    }

    /// Place an interval, enforcing separation only when `non_overlap` is set.
    pub fn place<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        signal_length: usize,
        duration: usize,
        occupied: &OccupiedSet,
        non_overlap: bool,
    ) -> Option<Interval> {
        if non_overlap {
            return self.find(rng, signal_length, duration, occupied);
        }

        let max_start = Self::max_start(signal_length, duration)?;
        let start = rng.random_range(0..=max_start);
        Some(Interval::new(start, start + duration))
    }

    /// Like [`place`](Self::place) with the duration given as a fraction of
    /// the signal length, floored to whole samples.
    pub fn place_ratio<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        signal_length: usize,
        duration_ratio: f64,
        occupied: &OccupiedSet,
        non_overlap: bool,
    ) -> Option<Interval> {
        let duration = ratio_to_samples(duration_ratio, signal_length);
        self.place(rng, signal_length, duration, occupied, non_overlap)
    }

    fn max_start(signal_length: usize, duration: usize) -> Option<usize> {
        if duration == 0 || duration >= signal_length {
            return None;
        }
        Some(signal_length - duration)
    }
}

/// `floor(ratio · n)`, clamped at zero.
pub fn ratio_to_samples(ratio: f64, n: usize) -> usize {
    (ratio * n as f64).floor().max(0.0) as usize
}
