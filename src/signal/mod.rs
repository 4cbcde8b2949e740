// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Signal primitives
//!
//! Sample containers shared by every generator in the crate, plus the
//! multi-sinusoid generator used both for base signals and for interrupt
//! waveforms.
//!
//! A generated waveform is always
//!
//! ```text
//! x(t) = Σ amp_i · sin(2π · freq_i · t + phase_i)
//! ```
//!
//! and the list of [`SinusoidParams`] returned alongside it is enough to
//! rebuild the waveform exactly with [`render_sinusoids`].
//!
//! ## Examples
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use rust_interrupt_synth::signal::{generate_signal, time_vector};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let t = time_vector(1.0, 1000);
//! let (wave, params) = generate_signal(&mut rng, &t, 3, (0.5, 1.0), (5.0, 15.0));
//! assert_eq!(wave.len(), 1000);
//! assert_eq!(params.len(), 3);
//! ```


use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Ordered, monotonically increasing sample timestamps in seconds.
pub type TimeVector = Array1<f64>;

/// Real-valued samples, one per timestamp of the matching [`TimeVector`].
pub type Signal = Array1<f64>;

/// One component of a generated waveform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinusoidParams {
    /// Peak amplitude
    pub amp: f64,
    /// Frequency in Hz
    pub freq: f64,
    /// Phase in radians, in `[0, 2π)`
    pub phase: f64,
}

/// Build `n` evenly spaced timestamps covering `[0, duration_s]` inclusive.
pub fn time_vector(duration_s: f64, n: usize) -> TimeVector {
    Array1::linspace(0.0, duration_s, n)
}

/// Draw a value uniformly from `[min, max]`.
///
/// Degenerate or inverted ranges collapse to `min`, so callers never hit the
/// panic `rand` raises on empty ranges.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}

/// Generate a sum of `n_sinusoids` sinusoids with random parameters.
///
/// Each amplitude is drawn from `amplitude_range`, each frequency from
/// `frequency_range` and each phase from `[0, 2π)`, independently per
/// component. The returned signal has the length of `t`.
pub fn generate_signal<R: Rng + ?Sized>(
    rng: &mut R,
    t: &TimeVector,
    n_sinusoids: usize,
    amplitude_range: (f64, f64),
    frequency_range: (f64, f64),
) -> (Signal, Vec<SinusoidParams>) {
    let params: Vec<SinusoidParams> = (0..n_sinusoids)
        .map(|_| SinusoidParams {
            amp: uniform(rng, amplitude_range.0, amplitude_range.1),
            freq: uniform(rng, frequency_range.0, frequency_range.1),
            phase: rng.random_range(0.0..2.0 * PI),
        })
        .collect();

    (render_sinusoids(t, &params), params)
}

/// Rebuild a waveform from its component parameters.
pub fn render_sinusoids(t: &TimeVector, params: &[SinusoidParams]) -> Signal {
    let mut signal = Signal::zeros(t.len());
    for p in params {
        signal.zip_mut_with(t, |s, &ti| {
            *s += p.amp * (2.0 * PI * p.freq * ti + p.phase).sin();
        });
    }
    signal
}

/// Smallest sample of a signal slice, `+inf` when empty.
pub fn min_of<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> f64 {
    values.into_iter().copied().fold(f64::INFINITY, f64::min)
}

/// Largest sample of a signal slice, `-inf` when empty.
pub fn max_of<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> f64 {
    values.into_iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
