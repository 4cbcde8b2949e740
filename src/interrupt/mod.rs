// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//! Interrupt placement and blending engine
//!
//! This module finds room for transient events on a signal, synthesises
//! them inside a device's envelope, solves a bounded offset and blends
//! them in. Bursts and periodic gating are independent, coarser injection
//! modes operating directly on the signal.

pub mod blend;
pub mod bursts;
pub mod composer;
pub mod error;
pub mod interval;
pub mod offset;
pub mod periodic;
pub mod ranges;
pub mod record;
pub mod synthesizer;
#[cfg(test)]
mod composer_test;

pub use blend::{blend, DEFAULT_BLEND_FACTOR};
pub use bursts::{inject_bursts, BurstOptions};
pub use composer::{add_interrupt_with_params, add_small_interrupts, compose, ComposeOptions, InterruptContext};
pub use error::{InterruptError, Result};
pub use interval::{Interval, IntervalAllocator, OccupiedSet};
pub use offset::{offset_bounds, resolve, OffsetBounds, ResolvedInterrupt};
pub use periodic::{add_periodic_interrupts, generate_semi_periodic_signal, PatternGenerator, PeriodicOptions};
pub use ranges::{DeviceRange, DeviceRanges, FrequencyRange};
pub use record::{InterruptKind, InterruptRecord};
pub use synthesizer::{generate_base_signal, generate_interrupt};
