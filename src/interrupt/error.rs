// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Errors raised by the interrupt engine
//!
//! Only caller mistakes are errors. Running out of room for an interrupt, an
//! empty feasible-offset interval and degenerate nested intervals are all
//! handled by skipping or falling back, and never surface here.

use thiserror::Error;

/// Errors that can occur while synthesising or compositing interrupts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterruptError {
    #[error("Domain '{0}' not found in range table")]
    UnknownDomain(String),
    #[error("Domain '{domain}' has no frequency range for condition {key:?}")]
    DomainLookup { domain: String, key: Option<String> },
    #[error("Slice length mismatch: base has {base} samples, interrupt has {interrupt}")]
    ShapeMismatch { base: usize, interrupt: usize },
    #[error("Blend factor must lie in [0, 1), got {0}")]
    InvalidBlendFactor(f64),
    #[error("Shrink factor must lie in (0, 1], got {0}")]
    InvalidShrinkFactor(f64),
    #[error("Invalid {what} range: min {min} is greater than max {max}")]
    InvalidRange { what: &'static str, min: f64, max: f64 },
}

pub type Result<T> = std::result::Result<T, InterruptError>;
