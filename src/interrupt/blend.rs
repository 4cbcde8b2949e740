// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Linear mixing of a base slice with an interrupt slice

use ndarray::ArrayView1;

use super::error::{InterruptError, Result};
use crate::signal::Signal;

/// Default weight of the base signal in a blend
pub const DEFAULT_BLEND_FACTOR: f64 = 0.5;

/// `blend_factor · base + (1 - blend_factor) · interrupt`, elementwise.
///
/// # Errors
///
/// [`InterruptError::ShapeMismatch`] when the slices differ in length.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use rust_interrupt_synth::interrupt::blend;
///
/// let mixed = blend(array![1.0, 1.0].view(), array![0.0, 2.0].view(), 0.25).unwrap();
/// assert_eq!(mixed, array![0.25, 1.75]);
/// ```
pub fn blend(base: ArrayView1<f64>, interrupt: ArrayView1<f64>, blend_factor: f64) -> Result<Signal> {
    if base.len() != interrupt.len() {
        return Err(InterruptError::ShapeMismatch {
            base: base.len(),
            interrupt: interrupt.len(),
        });
    }
    Ok(&base * blend_factor + &interrupt * (1.0 - blend_factor))
}
