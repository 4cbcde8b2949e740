// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use ndarray::{Array1, ArrayView1};

/// Resample `values` to `resolution` points by linear interpolation.
///
/// Both the source and the target samples are spread evenly over `[0, 1]`,
/// so the first and last values are always preserved. A single source value
/// is repeated; an empty source yields zeros.
pub fn interpolate_linear(values: ArrayView1<f64>, resolution: usize) -> Array1<f64> {
    let n = values.len();
    if n == 0 {
        return Array1::zeros(resolution);
    }
    if n == 1 || resolution == 1 {
        return Array1::from_elem(resolution, values[0]);
    }

    let step = (n - 1) as f64 / (resolution - 1) as f64;
    Array1::from_shape_fn(resolution, |i| {
        let x = i as f64 * step;
        let j = (x.floor() as usize).min(n - 2);
        let frac = x - j as f64;
        values[j] + (values[j + 1] - values[j]) * frac
    })
}
