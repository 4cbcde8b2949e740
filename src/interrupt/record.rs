// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Metadata emitted for every placed interrupt

use serde::{Deserialize, Serialize};

use super::interval::Interval;
use crate::signal::SinusoidParams;

/// Role of an interrupt within a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptKind {
    /// The primary interrupt of a composition
    Main,
    /// A nested sub-interrupt inside the main interval
    MainOverlapping,
    /// An independent secondary interrupt
    Small,
    /// A short additive burst, not bounded by the device range
    Burst,
}

/// Description of one interrupt written into a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterruptRecord {
    pub start_idx: usize,
    pub duration_idx: usize,
    pub offset: f64,
    pub sinusoids_params: Vec<SinusoidParams>,
    #[serde(rename = "type")]
    pub kind: InterruptKind,
}

impl InterruptRecord {
    pub fn new(interval: Interval, offset: f64, sinusoids_params: Vec<SinusoidParams>, kind: InterruptKind) -> Self {
        Self {
            start_idx: interval.start,
            duration_idx: interval.len(),
            offset,
            sinusoids_params,
            kind,
        }
    }

    /// Sample range the interrupt was written to.
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_idx, self.start_idx + self.duration_idx)
    }
}
