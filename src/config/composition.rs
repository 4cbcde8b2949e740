// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Interrupt composition configuration

use serde::{Deserialize, Serialize};

use crate::interrupt::{BurstOptions, ComposeOptions, IntervalAllocator, DEFAULT_BLEND_FACTOR};
use crate::interrupt::interval::{DEFAULT_BUFFER, DEFAULT_MAX_TRIES};

/// Settings controlling how interrupts are placed and blended.
///
/// Mirrors [`ComposeOptions`] plus the allocator settings and the optional
/// overrides of the randomly drawn main duration and small interrupt count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Weight of the base signal in `[0, 1)`
    pub blend_factor: f64,
    pub complex_iter: usize,
    pub shrink_complex: bool,
    /// Shrink factor in `(0, 1]`
    pub shrink_factor: f64,
    pub disperse: bool,
    pub drop: bool,
    pub non_overlap: bool,
    /// Minimum gap in samples between placed interrupts
    pub buffer: usize,
    /// Placement attempts before an interrupt is skipped
    pub max_tries: usize,
    /// Small interrupt count, random in `[0, 2]` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_small: Option<usize>,
    /// Main duration ratio, random in `[0.06, 0.12]` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ratio: Option<f64>,
    /// Sinusoids per interrupt, random in `[2, 10]` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_sinusoids: Option<usize>,
    /// Burst count for the burst mode, random in `[15, 20]` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_bursts: Option<usize>,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            blend_factor: DEFAULT_BLEND_FACTOR,
            complex_iter: 0,
            shrink_complex: false,
            shrink_factor: 0.9,
            disperse: true,
            drop: true,
            non_overlap: true,
            buffer: DEFAULT_BUFFER,
            max_tries: DEFAULT_MAX_TRIES,
            n_small: None,
            duration_ratio: None,
            n_sinusoids: None,
            n_bursts: None,
        }
    }
}

impl CompositionConfig {
    pub fn allocator(&self) -> IntervalAllocator {
        IntervalAllocator::new(self.buffer, self.max_tries)
    }

    /// Options for [`compose`](crate::interrupt::compose).
    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions {
            n_sinusoids: self.n_sinusoids,
            disperse: self.disperse,
            drop: self.drop,
            non_overlap: self.non_overlap,
            complex_iter: self.complex_iter,
            blend_factor: self.blend_factor,
            shrink_complex: self.shrink_complex,
            shrink_factor: self.shrink_factor,
            n_small: self.n_small.unwrap_or(0),
            small_duration_ratio: None,
            allocator: self.allocator(),
        }
    }

    /// Options for [`inject_bursts`](crate::interrupt::inject_bursts).
    ///
    /// Bursts may overlap each other regardless of `non_overlap`.
    pub fn burst_options(&self) -> BurstOptions {
        BurstOptions {
            n_bursts: self.n_bursts,
            non_overlap: false,
            allocator: self.allocator(),
        }
    }
}
