// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Burst injection
//!
//! Dense, short, high-frequency bursts added straight onto a signal. Bursts
//! are not blended and their offsets are not solved against the device
//! bounds: excursions past the physical range are part of the burst noise.

use log::{debug, info};
use ndarray::s;
use rand::Rng;

use super::error::Result;
use super::interval::{IntervalAllocator, OccupiedSet};
use super::ranges::DeviceRanges;
use super::record::{InterruptKind, InterruptRecord};
use super::synthesizer::{check_range, SINUSOID_COUNT_RANGE};
use crate::signal::{generate_signal, max_of, min_of, uniform, Signal, TimeVector};

/// Inclusive range of the random burst count
pub const BURST_COUNT_RANGE: (usize, usize) = (15, 20);
/// Burst span as a fraction of the signal length
pub const BURST_DURATION_RATIO_RANGE: (f64, f64) = (0.001, 0.003);
/// Burst amplitude as a fraction of the envelope maximum
pub const BURST_AMPLITUDE_FRACTION: (f64, f64) = (0.7, 0.9);

/// Offset fractions of the base peak-to-peak range
const RISE_FRACTION: (f64, f64) = (0.01, 0.06);
const DROP_FRACTION: (f64, f64) = (0.06, 0.1);

/// Settings for [`inject_bursts`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstOptions {
    /// Burst count, random in `[15, 20]` when `None`
    pub n_bursts: Option<usize>,
    /// Keep bursts apart from each other by the allocator buffer
    pub non_overlap: bool,
    pub allocator: IntervalAllocator,
}

impl Default for BurstOptions {
    fn default() -> Self {
        Self {
            n_bursts: None,
            non_overlap: false,
            allocator: IntervalAllocator::default(),
        }
    }
}

/// Upper half of a frequency band: `(min + (max - min) / 2, max)`.
pub fn high_band(frequency: (f64, f64)) -> (f64, f64) {
    (frequency.0 + (frequency.1 - frequency.0) * 0.5, frequency.1)
}

/// Add short high-frequency bursts to `signal` in place.
///
/// Each burst spans `U(0.001, 0.003)` of the signal, sums `[2, 10]`
/// sinusoids with amplitudes in 70 to 90 % of the envelope maximum and
/// frequencies in the upper half of the envelope band, and is shifted by a
/// fraction of the base signal's peak-to-peak range. One burst in sixteen
/// rises by `U(0.01, 0.06)` of that range, the others drop by
/// `U(0.06, 0.1)`. Bursts that cannot be placed are skipped.
///
/// The returned records carry the signed offset that was added.
///
/// # Errors
///
/// [`InterruptError::UnknownDomain`](super::InterruptError::UnknownDomain)
/// and [`InterruptError::DomainLookup`](super::InterruptError::DomainLookup)
/// for a bad domain or condition key.
pub fn inject_bursts<R: Rng + ?Sized>(
    rng: &mut R,
    t: &TimeVector,
    signal: &mut Signal,
    domain: &str,
    interrupt_ranges: &DeviceRanges,
    condition: Option<&str>,
    options: &BurstOptions,
) -> Result<Vec<InterruptRecord>> {
    let range = interrupt_ranges.get(domain)?;
    let frequency = range.frequency.resolve(domain, condition)?;
    check_range("frequency", frequency)?;
    let band = high_band(frequency);
    let amplitude = (
        BURST_AMPLITUDE_FRACTION.0 * range.amplitude.1,
        BURST_AMPLITUDE_FRACTION.1 * range.amplitude.1,
    );

    let n_bursts = options
        .n_bursts
        .unwrap_or_else(|| rng.random_range(BURST_COUNT_RANGE.0..=BURST_COUNT_RANGE.1));
    // Peak-to-peak of the signal before any burst lands
    let spread = if signal.is_empty() {
        0.0
    } else {
        max_of(signal.iter()) - min_of(signal.iter())
    };

    let mut occupied = OccupiedSet::new();
    let mut records = Vec::with_capacity(n_bursts);
    for i in 0..n_bursts {
        let n_sinusoids = rng.random_range(SINUSOID_COUNT_RANGE.0..=SINUSOID_COUNT_RANGE.1);
        let (wave, params) = generate_signal(rng, t, n_sinusoids, amplitude, band);

        let ratio = uniform(rng, BURST_DURATION_RATIO_RANGE.0, BURST_DURATION_RATIO_RANGE.1);
        let Some(interval) =
            options
                .allocator
                .place_ratio(rng, signal.len(), ratio, &occupied, options.non_overlap)
        else {
            debug!("Burst {} skipped: no room left", i);
            continue;
        };

        let offset = if rng.random_bool(0.5) && (0..3).all(|_| rng.random_bool(0.5)) {
            spread * uniform(rng, RISE_FRACTION.0, RISE_FRACTION.1)
        } else {
            -spread * uniform(rng, DROP_FRACTION.0, DROP_FRACTION.1)
        };

        let (start, end) = (interval.start, interval.end);
        let mut window = signal.slice_mut(s![start..end]);
        window += &wave.slice(s![start..end]);
        window += offset;

        records.push(InterruptRecord::new(interval, offset, params, InterruptKind::Burst));
        occupied.push(interval);
    }

    info!("Injected {} of {} bursts into '{}'", records.len(), n_bursts, domain);
    Ok(records)
}
