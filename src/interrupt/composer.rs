// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Interrupt composition
//!
//! Places a main interrupt on a signal, nests optional "complex"
//! sub-interrupts inside it and scatters independent small interrupts
//! elsewhere. Every interrupt goes through the same pipeline:
//!
//! 1. place an interval ([`IntervalAllocator`])
//! 2. synthesise a full-length waveform ([`generate_interrupt`])
//! 3. resolve a device-bounded offset ([`resolve`])
//! 4. blend the slice into the signal ([`blend`]) and write it back
//!
//! The signal is borrowed mutably for the whole call and modified in place.
//! Interrupts that cannot be placed are skipped; whatever was placed before
//! stays in the signal and in the returned records.

use log::{debug, info};
use ndarray::s;
use rand::Rng;

use super::blend::{blend, DEFAULT_BLEND_FACTOR};
use super::error::{InterruptError, Result};
use super::interval::{Interval, IntervalAllocator, OccupiedSet};
use super::offset::{check_blend_factor, resolve};
use super::ranges::{widened_bounds, DeviceRange, DeviceRanges};
use super::record::{InterruptKind, InterruptRecord};
use super::synthesizer::generate_interrupt;
use crate::signal::{uniform, Signal, SinusoidParams, TimeVector};

/// Amplitude scale applied to small interrupts
pub const SMALL_AMPLITUDE_SCALE: f64 = 0.8;
/// Range the main duration ratio is drawn from when not given
pub const MAIN_DURATION_RATIO_RANGE: (f64, f64) = (0.06, 0.12);
/// Inclusive range of the random small interrupt count
pub const SMALL_COUNT_RANGE: (usize, usize) = (0, 2);

/// Which domain an interrupt belongs to and where its envelopes live.
#[derive(Debug, Clone, Copy)]
pub struct InterruptContext<'a> {
    pub domain: &'a str,
    /// Physical ranges of the devices
    pub device_ranges: &'a DeviceRanges,
    /// Envelopes interrupt waveforms are synthesised from
    pub interrupt_ranges: &'a DeviceRanges,
    /// Key into conditioned frequency tables
    pub condition: Option<&'a str>,
}

impl<'a> InterruptContext<'a> {
    pub fn new(
        domain: &'a str,
        device_ranges: &'a DeviceRanges,
        interrupt_ranges: &'a DeviceRanges,
        condition: Option<&'a str>,
    ) -> Self {
        Self {
            domain,
            device_ranges,
            interrupt_ranges,
            condition,
        }
    }

    pub fn interrupt_range(&self) -> Result<&'a DeviceRange> {
        self.interrupt_ranges.get(self.domain)
    }

    /// Amplitude bounds every bounded interrupt must respect: the union of
    /// the device's physical range and its interrupt range.
    pub fn bounds(&self) -> Result<(f64, f64)> {
        let device = self.device_ranges.get(self.domain)?;
        Ok(widened_bounds(device, self.interrupt_range()?))
    }

    /// Frequency range of the interrupt envelope for the current condition.
    pub fn frequency_range(&self) -> Result<(f64, f64)> {
        self.interrupt_range()?
            .frequency
            .resolve(self.domain, self.condition)
    }
}

/// Tuning knobs of [`compose`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposeOptions {
    /// Sinusoids per interrupt waveform, random in `[2, 10]` when `None`
    pub n_sinusoids: Option<usize>,
    /// Pre-shape main and small interrupts with a bounded drift bump
    pub disperse: bool,
    /// Shift interrupts downwards instead of upwards
    pub drop: bool,
    /// Keep placed intervals apart by the allocator buffer
    pub non_overlap: bool,
    /// Number of nested sub-interrupts inside the main one
    pub complex_iter: usize,
    /// Weight of the base signal when blending
    pub blend_factor: f64,
    /// Shrink the nested duration by `shrink_factor` at every iteration
    pub shrink_complex: bool,
    pub shrink_factor: f64,
    /// Number of independent small interrupts
    pub n_small: usize,
    /// Duration ratio of small interrupts, random when `None`
    pub small_duration_ratio: Option<f64>,
    pub allocator: IntervalAllocator,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            n_sinusoids: None,
            disperse: true,
            drop: true,
            non_overlap: true,
            complex_iter: 0,
            blend_factor: DEFAULT_BLEND_FACTOR,
            shrink_complex: false,
            shrink_factor: 0.9,
            n_small: 0,
            small_duration_ratio: None,
            allocator: IntervalAllocator::default(),
        }
    }
}

/// Place a main interrupt, its nested sub-interrupts and `n_small` small
/// interrupts into `signal`.
///
/// `duration_ratio` is the main span as a fraction of the signal length.
/// Returns the emitted records and every interval placed, in placement
/// order. When the main interrupt cannot be placed the signal is left
/// untouched and both collections are empty.
///
/// # Errors
///
/// Configuration errors only: unknown domain, missing condition key,
/// invalid blend or shrink factor, or a signal whose length differs from `t`.
pub fn compose<R: Rng + ?Sized>(
    rng: &mut R,
    t: &TimeVector,
    signal: &mut Signal,
    ctx: &InterruptContext<'_>,
    duration_ratio: f64,
    options: &ComposeOptions,
) -> Result<(Vec<InterruptRecord>, OccupiedSet)> {
    check_inputs(t, signal, options)?;
    let bounds = ctx.bounds()?;
    ctx.frequency_range()?;

    let mut occupied = OccupiedSet::new();
    let mut records = Vec::new();

    // PlaceMain
    let Some(main) =
        options
            .allocator
            .place_ratio(rng, signal.len(), duration_ratio, &occupied, options.non_overlap)
    else {
        info!(
            "Main interrupt ({:.3} of {} samples) could not be placed, signal left unchanged",
            duration_ratio,
            signal.len()
        );
        return Ok((records, occupied));
    };

    let (wave, params) = generate_interrupt(
        rng,
        t,
        ctx.domain,
        ctx.interrupt_ranges,
        ctx.condition,
        options.n_sinusoids,
        1.0,
        1.0,
    )?;

    // ModifyMain + BlendMain
    let offset = write_interrupt(
        rng,
        signal,
        &wave,
        main,
        bounds,
        options.drop,
        options.disperse,
        options.blend_factor,
    )?;
    info!(
        "Main interrupt placed at [{}, {}) with offset {:.4}",
        main.start, main.end, offset
    );
    records.push(InterruptRecord::new(main, offset, params.clone(), InterruptKind::Main));
    occupied.push(main);

    // PlaceComplex*
    records.extend(nest_complex(
        rng,
        signal,
        &wave,
        &params,
        main,
        bounds,
        options,
        &mut occupied,
    )?);

    if options.n_small > 0 {
        let small_ratio = options
            .small_duration_ratio
            .unwrap_or_else(|| uniform(rng, 0.01 * duration_ratio, 0.9 * duration_ratio));
        records.extend(add_small_interrupts(
            rng,
            t,
            signal,
            ctx,
            options.n_small,
            &mut occupied,
            small_ratio,
            options,
        )?);
    }

    Ok((records, occupied))
}

/// Place `n_small` independent interrupts, each `small_duration_ratio` of
/// the signal long, skipping any that find no room.
///
/// Placed intervals are appended to `occupied`, so later placements (and
/// later calls sharing the set) keep clear of them in non-overlap mode.
#[allow(clippy::too_many_arguments)]
pub fn add_small_interrupts<R: Rng + ?Sized>(
    rng: &mut R,
    t: &TimeVector,
    signal: &mut Signal,
    ctx: &InterruptContext<'_>,
    n_small: usize,
    occupied: &mut OccupiedSet,
    small_duration_ratio: f64,
    options: &ComposeOptions,
) -> Result<Vec<InterruptRecord>> {
    check_inputs(t, signal, options)?;
    let bounds = ctx.bounds()?;
    ctx.frequency_range()?;

    let mut records = Vec::with_capacity(n_small);
    for i in 0..n_small {
        // PlaceSmall
        let Some(interval) = options.allocator.place_ratio(
            rng,
            signal.len(),
            small_duration_ratio,
            occupied,
            options.non_overlap,
        ) else {
            debug!("Small interrupt {} skipped: no room left", i);
            continue;
        };

        let (wave, params) = generate_interrupt(
            rng,
            t,
            ctx.domain,
            ctx.interrupt_ranges,
            ctx.condition,
            options.n_sinusoids,
            SMALL_AMPLITUDE_SCALE,
            1.0,
        )?;

        // ModifySmall + BlendSmall
        let offset = write_interrupt(
            rng,
            signal,
            &wave,
            interval,
            bounds,
            options.drop,
            options.disperse,
            options.blend_factor,
        )?;
        debug!(
            "Small interrupt placed at [{}, {}) with offset {:.4}",
            interval.start, interval.end, offset
        );
        records.push(InterruptRecord::new(interval, offset, params, InterruptKind::Small));
        occupied.push(interval);
    }

    Ok(records)
}

/// One main interrupt plus a random handful of small ones.
///
/// `duration_ratio` defaults to `U(0.06, 0.12)` and `n_small` to a random
/// count in `[0, 2]`; the small duration ratio is drawn once from
/// `U(0.01·ratio, 0.9·ratio)` unless set in `options`. The `n_small` field of
/// `options` is ignored in favour of the argument.
pub fn add_interrupt_with_params<R: Rng + ?Sized>(
    rng: &mut R,
    t: &TimeVector,
    signal: &mut Signal,
    ctx: &InterruptContext<'_>,
    duration_ratio: Option<f64>,
    n_small: Option<usize>,
    options: &ComposeOptions,
) -> Result<(Vec<InterruptRecord>, OccupiedSet)> {
    let duration_ratio = duration_ratio.unwrap_or_else(|| {
        uniform(rng, MAIN_DURATION_RATIO_RANGE.0, MAIN_DURATION_RATIO_RANGE.1)
    });
    let n_small = n_small.unwrap_or_else(|| rng.random_range(SMALL_COUNT_RANGE.0..=SMALL_COUNT_RANGE.1));
    let small_duration_ratio = options
        .small_duration_ratio
        .unwrap_or_else(|| uniform(rng, 0.01 * duration_ratio, 0.9 * duration_ratio));

    let options = ComposeOptions {
        n_small,
        small_duration_ratio: Some(small_duration_ratio),
        ..*options
    };
    compose(rng, t, signal, ctx, duration_ratio, &options)
}

/// Nested sub-interrupts reuse the main waveform, sliced at each
/// sub-interval, and never apply the drift bump.
#[allow(clippy::too_many_arguments)]
fn nest_complex<R: Rng + ?Sized>(
    rng: &mut R,
    signal: &mut Signal,
    wave: &Signal,
    params: &[SinusoidParams],
    main: Interval,
    bounds: (f64, f64),
    options: &ComposeOptions,
    occupied: &mut OccupiedSet,
) -> Result<Vec<InterruptRecord>> {
    let mut records = Vec::with_capacity(options.complex_iter);
    let mut working = main.len();

    for i in 0..options.complex_iter {
        if options.shrink_complex {
            working = (working as f64 * options.shrink_factor).floor() as usize;
        }
        if working <= 1 {
            debug!("Complex interrupt {} skipped: degenerate duration {}", i, working);
            continue;
        }

        let start = rng.random_range(main.start..=main.end - working);
        let sub = Interval::new(start, start + working);
        let offset = write_interrupt(
            rng,
            signal,
            wave,
            sub,
            bounds,
            options.drop,
            false,
            options.blend_factor,
        )?;
        debug!(
            "Complex interrupt {} placed at [{}, {}) with offset {:.4}",
            i, sub.start, sub.end, offset
        );
        records.push(InterruptRecord::new(
            sub,
            offset,
            params.to_vec(),
            InterruptKind::MainOverlapping,
        ));
        occupied.push(sub);
    }

    Ok(records)
}

/// Resolve, blend and write one interrupt slice back into `signal`.
#[allow(clippy::too_many_arguments)]
fn write_interrupt<R: Rng + ?Sized>(
    rng: &mut R,
    signal: &mut Signal,
    wave: &Signal,
    interval: Interval,
    bounds: (f64, f64),
    drop: bool,
    disperse: bool,
    blend_factor: f64,
) -> Result<f64> {
    let (start, end) = (interval.start, interval.end);
    let resolved = resolve(
        rng,
        wave.slice(s![start..end]),
        signal.slice(s![start..end]),
        bounds.0,
        bounds.1,
        drop,
        disperse,
        blend_factor,
    )?;
    let mixed = blend(signal.slice(s![start..end]), resolved.slice.view(), blend_factor)?;
    signal.slice_mut(s![start..end]).assign(&mixed);
    Ok(resolved.offset)
}

fn check_inputs(t: &TimeVector, signal: &Signal, options: &ComposeOptions) -> Result<()> {
    if t.len() != signal.len() {
        return Err(InterruptError::ShapeMismatch {
            base: signal.len(),
            interrupt: t.len(),
        });
    }
    if options.shrink_complex && !(options.shrink_factor > 0.0 && options.shrink_factor <= 1.0) {
        return Err(InterruptError::InvalidShrinkFactor(options.shrink_factor));
    }
    check_blend_factor(options.blend_factor)
}
