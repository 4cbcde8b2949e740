// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Signal comparison metrics
//!
//! Used to report how strongly a composition perturbed its base signal.

use ndarray::{Array1, ArrayView1};

fn mean_power(values: ArrayView1<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64
}

/// Power ratio in dB between a clean signal and the perturbation added to it.
///
/// `10·log10(P_clean / P_diff)` with `P` the mean squared value. Identical
/// signals give `+inf`.
pub fn perturbation_ratio_db(clean: ArrayView1<f64>, perturbed: ArrayView1<f64>) -> f64 {
    let diff = &perturbed - &clean;
    let signal_power = mean_power(clean);
    let noise_power = mean_power(diff.view());
    10.0 * (signal_power / noise_power).log10()
}

/// L2 norm of the element-wise difference.
pub fn euclidean_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Zero-mean, unit-variance copy of `signal`.
///
/// A constant signal has no spread to scale by and maps to zeros.
pub fn normalize(signal: ArrayView1<f64>) -> Array1<f64> {
    let Some(mean) = signal.mean() else {
        return Array1::zeros(0);
    };
    let std = signal.std(0.0);
    if std == 0.0 {
        return Array1::zeros(signal.len());
    }
    signal.mapv(|v| (v - mean) / std)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_perturbation_ratio() {
        let clean = array![1.0, -1.0, 1.0, -1.0];
        // Perturbation with a tenth of the amplitude, so a hundredth of the power
        let perturbed = &clean * 1.1;
        assert_abs_diff_eq!(perturbation_ratio_db(clean.view(), perturbed.view()), 20.0, epsilon = 1e-9);
        assert!(perturbation_ratio_db(clean.view(), clean.view()).is_infinite());
    }

    #[test]
    fn test_euclidean_distance() {
        let a = array![0.0, 0.0];
        let b = array![3.0, 4.0];
        assert_abs_diff_eq!(euclidean_distance(a.view(), b.view()), 5.0, epsilon = 1e-12);
        assert_eq!(euclidean_distance(b.view(), b.view()), 0.0);
    }

    #[test]
    fn test_normalize() {
        let out = normalize(array![1.0, 2.0, 3.0, 4.0].view());
        assert_abs_diff_eq!(out.mean().unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.std(0.0), 1.0, epsilon = 1e-12);

        assert_eq!(normalize(array![2.0, 2.0].view()), array![0.0, 0.0]);
        assert!(normalize(Array1::<f64>::zeros(0).view()).is_empty());
    }
}
