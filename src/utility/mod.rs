// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Utility module for array helpers shared by the generators and the CLI

pub mod interpolation;
pub mod metrics;

// Re-exports for use in other modules
pub use interpolation::interpolate_linear;
pub use metrics::{euclidean_distance, normalize, perturbation_ratio_db};
