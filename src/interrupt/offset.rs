// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Feasible offset resolution
//!
//! Before an interrupt slice is blended into the base signal it is shifted
//! by a scalar offset, upwards for a rise event or downwards for a drop.
//! The offset is drawn from the interval that keeps every blended sample
//! inside the device bounds.
//!
//! With blend factor `b`, direction sign `s` (+1 rise, -1 drop) and offset
//! `o`, a blended sample is
//!
//! ```text
//! y = b·base + (1 - b)·(interrupt + s·o)
//! ```
//!
//! Requiring `b·B_min + (1 - b)·(I_min + s·o) >= device_min` and
//! `b·B_max + (1 - b)·(I_max + s·o) <= device_max` bounds every sample, which
//! gives the two closed-form constraints
//!
//! ```text
//! c_min = s · (device_min - b·B_min - (1 - b)·I_min) / (1 - b)
//! c_max = s · (device_max - b·B_max - (1 - b)·I_max) / (1 - b)
//! ```
//!
//! For a rise the offset lies in `[c_min, c_max]`; for a drop the sign flips
//! the inequalities and it lies in `[c_max, c_min]`. An empty interval
//! falls back to a zero offset.

use log::{debug, warn};
use ndarray::ArrayView1;
use rand::Rng;

use super::error::{InterruptError, Result};
use crate::signal::{max_of, min_of, uniform, Signal};
use crate::variations::{apply_baseline_drift_middle_peak, DriftDirection};

/// Closed offset interval `[lower, upper]` derived from the blend equation.
///
/// `lower > upper` means no offset keeps the blend inside the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetBounds {
    pub lower: f64,
    pub upper: f64,
}

impl OffsetBounds {
    pub fn is_feasible(&self) -> bool {
        self.lower <= self.upper
    }
}

/// Chosen offset and the slice it was applied to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInterrupt {
    /// Interrupt slice after optional drift shaping and offset
    pub slice: Signal,
    /// Offset magnitude; subtracted for drops, added for rises
    pub offset: f64,
    /// Whether the offset was drawn from a non-empty feasible interval
    pub feasible: bool,
}

/// Compute the feasible offset interval for already-shaped slices.
pub fn offset_bounds(
    interrupt: ArrayView1<f64>,
    base: ArrayView1<f64>,
    device_min: f64,
    device_max: f64,
    drop: bool,
    blend_factor: f64,
) -> OffsetBounds {
    let (b_min, b_max) = (min_of(&base), max_of(&base));
    let (i_min, i_max) = (min_of(&interrupt), max_of(&interrupt));
    let sign = if drop { -1.0 } else { 1.0 };
    let w = 1.0 - blend_factor;

    let c_min = sign * (device_min - blend_factor * b_min - w * i_min) / w;
    let c_max = sign * (device_max - blend_factor * b_max - w * i_max) / w;

    if drop {
        OffsetBounds {
            lower: c_max,
            upper: c_min,
        }
    } else {
        OffsetBounds {
            lower: c_min,
            upper: c_max,
        }
    }
}

/// Shape, offset and return an interrupt slice ready for blending.
///
/// With `disperse` set the slice first receives a middle-peak drift bump
/// whose magnitude never exceeds the headroom left towards the bound in
/// the direction of travel: `device_max - max(slice)` for a rise and
/// `min(slice) - device_min` for a drop, clamped at zero.
///
/// When a feasible interval exists the offset is drawn uniformly from it,
/// and blending the result with `base` at the same `blend_factor` stays
/// within `[device_min, device_max]`. Otherwise the offset is zero.
///
/// # Errors
///
/// [`InterruptError::ShapeMismatch`] for slices of different lengths and
/// [`InterruptError::InvalidBlendFactor`] outside `[0, 1)`.
#[allow(clippy::too_many_arguments)]
pub fn resolve<R: Rng + ?Sized>(
    rng: &mut R,
    interrupt: ArrayView1<f64>,
    base: ArrayView1<f64>,
    device_min: f64,
    device_max: f64,
    drop: bool,
    disperse: bool,
    blend_factor: f64,
) -> Result<ResolvedInterrupt> {
    if interrupt.len() != base.len() {
        return Err(InterruptError::ShapeMismatch {
            base: base.len(),
            interrupt: interrupt.len(),
        });
    }
    check_blend_factor(blend_factor)?;

    let mut slice = if disperse {
        let (direction, allowed) = if drop {
            (DriftDirection::Down, min_of(&interrupt) - device_min)
        } else {
            (DriftDirection::Up, device_max - max_of(&interrupt))
        };
        let allowed = allowed.max(0.0);
        debug!("Dispersing interrupt with drift up to {:.4}", allowed);
        apply_baseline_drift_middle_peak(rng, interrupt, allowed, direction, 0.0)
    } else {
        interrupt.to_owned()
    };

    let bounds = offset_bounds(slice.view(), base, device_min, device_max, drop, blend_factor);
    let (offset, feasible) = if bounds.is_feasible() {
        (uniform(rng, bounds.lower, bounds.upper), true)
    } else {
        warn!(
            "No feasible offset in [{:.4}, {:.4}] for bounds [{}, {}], using 0",
            bounds.lower, bounds.upper, device_min, device_max
        );
        (0.0, false)
    };

    if drop {
        slice -= offset;
    } else {
        slice += offset;
    }
    debug!("Offset applied: {:.4} (drop: {})", offset, drop);

    Ok(ResolvedInterrupt {
        slice,
        offset,
        feasible,
    })
}

pub(crate) fn check_blend_factor(blend_factor: f64) -> Result<()> {
    if !(0.0..1.0).contains(&blend_factor) {
        return Err(InterruptError::InvalidBlendFactor(blend_factor));
    }
    Ok(())
}
