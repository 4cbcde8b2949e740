// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Baseline drift shapes

use ndarray::{Array1, ArrayView1};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::signal::{uniform, Signal};

/// Sign of a drift bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftDirection {
    Up,
    Down,
}

/// Add a parabolic bump that is zero at both ends and peaks at the middle.
///
/// The peak magnitude is drawn uniformly from `[min_drift, max_drift]` and
/// negated for [`DriftDirection::Down`]. Over the normalised position
/// `x ∈ [0, 1]` the bump is `peak · 4x(1 - x)`, so no sample moves by more
/// than the peak.
///
/// # Examples
///
/// ```
/// use ndarray::Array1;
/// use rand::{rngs::StdRng, SeedableRng};
/// use rust_interrupt_synth::variations::{apply_baseline_drift_middle_peak, DriftDirection};
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let flat = Array1::<f64>::zeros(11);
/// let bumped = apply_baseline_drift_middle_peak(&mut rng, flat.view(), 1.0, DriftDirection::Up, 1.0);
/// assert_eq!(bumped[0], 0.0);
/// assert!((bumped[5] - 1.0).abs() < 1e-12);
/// ```
pub fn apply_baseline_drift_middle_peak<R: Rng + ?Sized>(
    rng: &mut R,
    wave: ArrayView1<f64>,
    max_drift: f64,
    direction: DriftDirection,
    min_drift: f64,
) -> Signal {
    let n = wave.len();
    if n == 0 {
        return wave.to_owned();
    }

    let mut peak = uniform(rng, min_drift, max_drift);
    if direction == DriftDirection::Down {
        peak = -peak;
    }

    let x = Array1::linspace(0.0, 1.0, n);
    let drift = x.mapv(|xi| peak * 4.0 * xi * (1.0 - xi));
    &wave + &drift
}
