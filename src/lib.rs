// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rust interrupt synthesizer library
//!
//! This library generates sensor-like signals and injects bounded transient
//! "interrupt" events into them, for testing and benchmarking downstream
//! signal-processing code.

pub mod config;
pub mod interrupt;
pub mod signal;
pub mod synthesis;
pub mod utility;
pub mod variations;

pub use synthesis::{run, Metadata, Mode, Synthesis};
