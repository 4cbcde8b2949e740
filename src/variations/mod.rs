// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Waveform variations
//!
//! Only the baseline drift shape consumed by the interrupt engine lives here.

pub mod baseline_drift;

pub use baseline_drift::{apply_baseline_drift_middle_peak, DriftDirection};
