// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Raw interrupt waveform synthesis
//!
//! An interrupt waveform spans the whole time vector; callers slice out the
//! interval they placed. Amplitude and frequency are drawn inside the
//! domain's envelope, optionally scaled, but scaling can only narrow the
//! envelope and never push it past the device's physical range.

use log::{debug, warn};
use rand::Rng;

use super::error::{InterruptError, Result};
use super::ranges::DeviceRanges;
use crate::signal::{generate_signal, Signal, SinusoidParams, TimeVector};

/// Inclusive bounds for the random component count
pub const SINUSOID_COUNT_RANGE: (usize, usize) = (2, 10);

/// Scale a `(min, max)` envelope without ever widening it.
///
/// `min' = max(min, min·scale)` and `max' = min(max, max·scale)`.
pub fn scale_range(range: (f64, f64), scale: f64) -> (f64, f64) {
    let (min, max) = range;
    (min.max(min * scale), max.min(max * scale))
}

pub(crate) fn check_range(what: &'static str, range: (f64, f64)) -> Result<()> {
    if range.0 > range.1 {
        return Err(InterruptError::InvalidRange {
            what,
            min: range.0,
            max: range.1,
        });
    }
    Ok(())
}

/// Synthesise a raw interrupt waveform for `domain`.
///
/// # Arguments
///
/// * `ranges` - Table holding the domain's amplitude and frequency envelopes
/// * `condition` - Key selecting a conditioned frequency range
/// * `n_sinusoids` - Component count, random in `[2, 10]` when `None`
/// * `amplitude_scale`, `frequency_scale` - Envelope scale factors
///
/// # Errors
///
/// [`InterruptError::UnknownDomain`] when the domain is missing and
/// [`InterruptError::DomainLookup`] when the condition key is not in a
/// conditioned frequency table.
#[allow(clippy::too_many_arguments)]
pub fn generate_interrupt<R: Rng + ?Sized>(
    rng: &mut R,
    t: &TimeVector,
    domain: &str,
    ranges: &DeviceRanges,
    condition: Option<&str>,
    n_sinusoids: Option<usize>,
    amplitude_scale: f64,
    frequency_scale: f64,
) -> Result<(Signal, Vec<SinusoidParams>)> {
    let range = ranges.get(domain)?;
    let frequency = range.frequency.resolve(domain, condition)?;
    check_range("amplitude", range.amplitude)?;
    check_range("frequency", frequency)?;

    let amplitude = scale_range(range.amplitude, amplitude_scale);
    let frequency = scale_range(frequency, frequency_scale);
    if amplitude.0 > amplitude.1 || frequency.0 > frequency.1 {
        warn!(
            "Scaled envelope for '{}' collapsed (amplitude {:?}, frequency {:?})",
            domain, amplitude, frequency
        );
    }

    let n = n_sinusoids.unwrap_or_else(|| {
        rng.random_range(SINUSOID_COUNT_RANGE.0..=SINUSOID_COUNT_RANGE.1)
    });
    debug!(
        "Synthesising '{}' interrupt: {} sinusoids, amplitude {:?}, frequency {:?}",
        domain, n, amplitude, frequency
    );

    Ok(generate_signal(rng, t, n, amplitude, frequency))
}

/// Synthesise a base signal that stays inside the device envelope of `domain`.
///
/// The signal is centred on the middle of the amplitude range and its
/// `n_sinusoids` components share half the range, each amplitude drawn from
/// `[half / 2n, half / n]`, so no sample can leave the range.
pub fn generate_base_signal<R: Rng + ?Sized>(
    rng: &mut R,
    t: &TimeVector,
    domain: &str,
    device_ranges: &DeviceRanges,
    condition: Option<&str>,
    n_sinusoids: usize,
) -> Result<(Signal, Vec<SinusoidParams>)> {
    let range = device_ranges.get(domain)?;
    let frequency = range.frequency.resolve(domain, condition)?;
    check_range("amplitude", range.amplitude)?;
    check_range("frequency", frequency)?;

    let (min, max) = range.amplitude;
    let centre = (min + max) / 2.0;
    let share = (max - min) / 2.0 / n_sinusoids.max(1) as f64;
    let (mut signal, params) = generate_signal(rng, t, n_sinusoids, (share / 2.0, share), frequency);
    signal += centre;
    debug!(
        "Base signal for '{}': {} sinusoids around {:.3}",
        domain, n_sinusoids, centre
    );
    Ok((signal, params))
}
