// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Periodic digital gating
//!
//! A semi-periodic binary pattern gates an interrupt waveform so that it
//! only shows through on the `1` samples, mimicking duty-cycled digital
//! interference. Two independent gates are used:
//!
//! - `gate1`, built from `pattern_length` bits, covers the samples before and
//!   after the main window and pulls the gated samples down by `offset / 1.3`
//! - `gate2`, built from `pattern_length · U(extra_length_range)` bits, is
//!   denser and covers the main window with an offset drawn from
//!   `[offset / 1.85, offset / 1.6]`
//!
//! Both gates are resampled to the signal length, so they always cover the
//! whole signal. A window running past the end of the signal is truncated.

use log::debug;
use ndarray::{s, Array1, ArrayView1};
use rand::Rng;

use super::error::{InterruptError, Result};
use crate::signal::{uniform, Signal};
use crate::utility::interpolate_linear;

/// Bit pattern repeated by the default generator
pub const DEFAULT_BASE_PATTERN: [u8; 12] = [0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1];
pub const DEFAULT_FLIP_PROBABILITY: f64 = 0.1;
/// Number of points the pattern is resampled to
pub const DEFAULT_RESOLUTION: usize = 10_000;
pub const DEFAULT_PATTERN_LENGTH: usize = 450;
pub const DEFAULT_EXTRA_LENGTH_RANGE: (f64, f64) = (1.7, 2.0);

/// Pre/post-window offset divisor
const OUTER_OFFSET_DIVISOR: f64 = 1.3;
/// In-window offset divisors, widest first
const INNER_OFFSET_DIVISORS: (f64, f64) = (1.85, 1.6);

/// Semi-periodic binary pattern generator.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternGenerator {
    pub base_pattern: Vec<u8>,
    /// Independent probability of flipping each bit
    pub flip_probability: f64,
    pub resolution: usize,
}

impl Default for PatternGenerator {
    fn default() -> Self {
        Self {
            base_pattern: DEFAULT_BASE_PATTERN.to_vec(),
            flip_probability: DEFAULT_FLIP_PROBABILITY,
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl PatternGenerator {
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Tile the base pattern to `length` bits, flip bits at random, then
    /// resample to `resolution` points rounded back to `{0, 1}`.
    ///
    /// A non-finite flip probability flips nothing.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, length: usize) -> Signal {
        let flip = if self.flip_probability.is_finite() {
            self.flip_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let bits: Array1<f64> = if self.base_pattern.is_empty() {
            Array1::zeros(length)
        } else {
            self.base_pattern
                .iter()
                .cycle()
                .take(length)
                .map(|&bit| {
                    let bit = if bit == 0 { 0.0 } else { 1.0 };
                    if rng.random_bool(flip) {
                        1.0 - bit
                    } else {
                        bit
                    }
                })
                .collect()
        };

        interpolate_linear(bits.view(), self.resolution).mapv_into(f64::round_ties_even)
    }
}

/// Shorthand for [`PatternGenerator::generate`] with the given settings.
pub fn generate_semi_periodic_signal<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    base_pattern: &[u8],
    flip_probability: f64,
    resolution: usize,
) -> Signal {
    PatternGenerator {
        base_pattern: base_pattern.to_vec(),
        flip_probability,
        resolution,
    }
    .generate(rng, length)
}

/// Settings for [`add_periodic_interrupts`].
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicOptions {
    /// Bit count of the pre/post-window gate
    pub pattern_length: usize,
    /// Multiplier range for the in-window gate's bit count
    pub extra_length_range: (f64, f64),
    /// Pattern source; its resolution is overridden by the signal length
    pub generator: PatternGenerator,
}

impl Default for PeriodicOptions {
    fn default() -> Self {
        Self {
            pattern_length: DEFAULT_PATTERN_LENGTH,
            extra_length_range: DEFAULT_EXTRA_LENGTH_RANGE,
            generator: PatternGenerator::default(),
        }
    }
}

/// Gate `interrupt` with two semi-periodic patterns and add it to `signal`.
///
/// Samples outside `[start_idx, start_idx + duration_idx)` receive
/// `gate1·(interrupt - offset / 1.3)`, samples inside receive
/// `gate2·(interrupt - scaled)` with `scaled` drawn once from
/// `[offset / 1.85, offset / 1.6]`. Returns `scaled`.
///
/// # Errors
///
/// [`InterruptError::ShapeMismatch`] when `interrupt` and `signal` differ in
/// length.
pub fn add_periodic_interrupts<R: Rng + ?Sized>(
    rng: &mut R,
    signal: &mut Signal,
    interrupt: ArrayView1<f64>,
    offset: f64,
    start_idx: usize,
    duration_idx: usize,
    options: &PeriodicOptions,
) -> Result<f64> {
    let n = signal.len();
    if interrupt.len() != n {
        return Err(InterruptError::ShapeMismatch {
            base: n,
            interrupt: interrupt.len(),
        });
    }

    let generator = options.generator.clone().with_resolution(n);
    let (lo, hi) = options.extra_length_range;
    let extra_min = (options.pattern_length as f64 * lo) as usize;
    let extra_max = ((options.pattern_length as f64 * hi) as usize).max(extra_min);
    let extra_length = rng.random_range(extra_min..=extra_max);

    let gate1 = generator.generate(rng, options.pattern_length);
    let gate2 = generator.generate(rng, extra_length);

    let start = start_idx.min(n);
    let end = start_idx.saturating_add(duration_idx).min(n);
    if end < start_idx.saturating_add(duration_idx) {
        debug!(
            "Periodic window [{}, {}) truncated to the signal end {}",
            start_idx,
            start_idx.saturating_add(duration_idx),
            n
        );
    }

    let outer = offset / OUTER_OFFSET_DIVISOR;
    let gated_outer = (&interrupt - outer) * &gate1;
    {
        let mut head = signal.slice_mut(s![..start]);
        head += &gated_outer.slice(s![..start]);
    }
    {
        let mut tail = signal.slice_mut(s![end..]);
        tail += &gated_outer.slice(s![end..]);
    }

    let (a, b) = (
        offset / INNER_OFFSET_DIVISORS.0,
        offset / INNER_OFFSET_DIVISORS.1,
    );
    let scaled = uniform(rng, a.min(b), a.max(b));
    let gated_inner = (&interrupt - scaled) * &gate2;
    let mut window = signal.slice_mut(s![start..end]);
    window += &gated_inner.slice(s![start..end]);

    debug!(
        "Periodic gating: {} + {} bits, window [{}, {}), offsets {:.4}/{:.4}",
        options.pattern_length, extra_length, start, end, outer, scaled
    );
    Ok(scaled)
}
