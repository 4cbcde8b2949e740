// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Base signal generation configuration
//!
//! This module defines how the base signal that interrupts are injected into
//! is produced: its length, duration, component count and target domain.

use serde::{Deserialize, Serialize};

/// Configuration for the base signal.
///
/// The base signal is a sum of `base_sinusoids` sinusoids sampled
/// `signal_length` times over `duration_s` seconds, drawn inside the physical
/// envelope of `domain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed of the random generator; entropy is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Number of samples in the generated signal. Must be greater than zero.
    pub signal_length: usize,

    /// Signal duration in seconds. Must be greater than zero.
    pub duration_s: f64,

    /// Number of sinusoids summed into the base signal
    pub base_sinusoids: usize,

    /// Domain name, looked up in both the device and interrupt tables
    pub domain: String,

    /// Condition key for domains with conditioned frequency tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            signal_length: 10_000,
            duration_s: 1.0,
            base_sinusoids: 3,
            domain: "Temperature".to_string(),
            condition: None,
        }
    }
}
