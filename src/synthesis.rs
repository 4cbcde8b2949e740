// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! End-to-end synthesis runs
//!
//! Builds a base signal from a [`Config`], injects interrupts with one of
//! the three injection modes and collects what was written, ready to be
//! saved as audio and JSON metadata.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;
use ndarray::s;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::interrupt::{
    add_interrupt_with_params, add_periodic_interrupts, generate_base_signal, generate_interrupt,
    inject_bursts, resolve, InterruptContext, InterruptKind, InterruptRecord, OccupiedSet,
    PeriodicOptions,
};
use crate::interrupt::composer::MAIN_DURATION_RATIO_RANGE;
use crate::signal::{time_vector, uniform, Signal, SinusoidParams, TimeVector};
use crate::utility::perturbation_ratio_db;

/// Injection mode of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Main, nested and small bounded interrupts
    #[default]
    Compose,
    /// Dense additive bursts
    Bursts,
    /// Periodic digital gating around a main window
    Periodic,
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct Synthesis {
    pub t: TimeVector,
    /// Signal before any interrupt
    pub base: Signal,
    /// Signal after injection
    pub signal: Signal,
    pub metadata: Metadata,
}

/// JSON side-car describing a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub mode: Mode,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub base_sinusoids: Vec<SinusoidParams>,
    pub interrupts: Vec<InterruptRecord>,
    pub occupied: OccupiedSet,
}

impl Synthesis {
    /// Power ratio in dB between the base signal and the injected interrupts.
    pub fn perturbation_ratio_db(&self) -> f64 {
        perturbation_ratio_db(self.base.view(), self.signal.view())
    }

    /// Write the signal as a 32-bit float mono WAV file.
    ///
    /// The sample rate is the number of samples per second of signal, at
    /// least 1 Hz.
    pub fn write_wav<P: AsRef<Path>>(&self, path: P, duration_s: f64) -> Result<()> {
        let sample_rate = ((self.signal.len() as f64 / duration_s).round() as u32).max(1);
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut writer = WavWriter::create(path.as_ref(), spec)
            .with_context(|| format!("Failed to create WAV file at {:?}", path.as_ref()))?;
        for &sample in &self.signal {
            writer.write_sample(sample as f32)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Write the metadata as pretty-printed JSON.
    pub fn write_metadata<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.metadata)
            .context("Failed to serialize metadata to JSON")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write metadata to {:?}", path.as_ref()))?;
        Ok(())
    }
}

/// Generate a base signal and inject interrupts into it.
pub fn run<R: Rng + ?Sized>(rng: &mut R, config: &Config, mode: Mode) -> Result<Synthesis> {
    let generation = &config.generation;
    let composition = &config.composition;
    let domain = generation.domain.as_str();
    let condition = generation.condition.as_deref();

    let t = time_vector(generation.duration_s, generation.signal_length);
    let (base, base_sinusoids) = generate_base_signal(
        rng,
        &t,
        domain,
        &config.devices,
        condition,
        generation.base_sinusoids,
    )?;
    let mut signal = base.clone();
    let ctx = InterruptContext::new(domain, &config.devices, &config.interrupts, condition);

    let (interrupts, occupied) = match mode {
        Mode::Compose => add_interrupt_with_params(
            rng,
            &t,
            &mut signal,
            &ctx,
            composition.duration_ratio,
            composition.n_small,
            &composition.compose_options(),
        )?,
        Mode::Bursts => {
            let records = inject_bursts(
                rng,
                &t,
                &mut signal,
                domain,
                &config.interrupts,
                condition,
                &composition.burst_options(),
            )?;
            let occupied: OccupiedSet = records.iter().map(InterruptRecord::interval).collect();
            (records, occupied)
        }
        Mode::Periodic => periodic(rng, &t, &mut signal, &ctx, config)?,
    };

    info!(
        "{:?} run on '{}' wrote {} interrupts into {} samples",
        mode,
        domain,
        interrupts.len(),
        signal.len()
    );

    Ok(Synthesis {
        t,
        base,
        signal,
        metadata: Metadata {
            mode,
            domain: domain.to_string(),
            condition: generation.condition.clone(),
            base_sinusoids,
            interrupts,
            occupied,
        },
    })
}

/// Place a main window, size its offset with the bounded solver and gate an
/// interrupt waveform around and inside it.
fn periodic<R: Rng + ?Sized>(
    rng: &mut R,
    t: &TimeVector,
    signal: &mut Signal,
    ctx: &InterruptContext<'_>,
    config: &Config,
) -> Result<(Vec<InterruptRecord>, OccupiedSet)> {
    let composition = &config.composition;
    let mut occupied = OccupiedSet::new();
    let ratio = composition
        .duration_ratio
        .unwrap_or_else(|| uniform(rng, MAIN_DURATION_RATIO_RANGE.0, MAIN_DURATION_RATIO_RANGE.1));

    let Some(window) = composition
        .allocator()
        .place_ratio(rng, signal.len(), ratio, &occupied, false)
    else {
        info!("No room for a periodic window, signal left unchanged");
        return Ok((Vec::new(), occupied));
    };

    let (wave, params) = generate_interrupt(
        rng,
        t,
        ctx.domain,
        ctx.interrupt_ranges,
        ctx.condition,
        composition.n_sinusoids,
        1.0,
        1.0,
    )?;
    let bounds = ctx.bounds()?;
    let (start, end) = (window.start, window.end);
    let offset = resolve(
        rng,
        wave.slice(s![start..end]),
        signal.slice(s![start..end]),
        bounds.0,
        bounds.1,
        composition.drop,
        false,
        composition.blend_factor,
    )?
    .offset;

    let scaled = add_periodic_interrupts(
        rng,
        signal,
        wave.view(),
        offset,
        window.start,
        window.len(),
        &PeriodicOptions::default(),
    )?;
    occupied.push(window);

    let record = InterruptRecord::new(window, scaled, params, InterruptKind::Main);
    Ok((vec![record], occupied))
}
