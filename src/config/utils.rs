// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::debug;

use super::Config;
use crate::interrupt::{DeviceRanges, FrequencyRange};

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line.
///
/// # Example
///
/// ```bash
/// ./rust_interrupt_synth --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema_str = include_str!("../../resources/config.schema.json");

    let schema: serde_json::Value =
        serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

fn check_pair(table: &str, domain: &str, what: &str, (min, max): (f64, f64)) -> Result<()> {
    if !(min.is_finite() && max.is_finite()) || min > max {
        anyhow::bail!(
            "Invalid {} range [{}, {}] for '{}' in {} table",
            what,
            min,
            max,
            domain,
            table
        );
    }
    Ok(())
}

fn check_table(name: &str, table: &DeviceRanges) -> Result<()> {
    for (domain, range) in table.iter() {
        check_pair(name, domain, "amplitude", range.amplitude)?;
        for frequency in range.frequency.ranges() {
            check_pair(name, domain, "frequency", frequency)?;
        }
    }
    Ok(())
}

/// Validates the configuration against rules the JSON schema cannot express.
///
/// # Validation Rules
///
/// - **Ranges**: every amplitude and frequency range has `min <= max`
/// - **Blend factor**: in `[0, 1)`
/// - **Shrink factor**: in `(0, 1]`
/// - **Signal**: `signal_length > 0` and `duration_s > 0`
/// - **Domain**: present in both the device and the interrupt table, and a
///   condition key present in every conditioned frequency table it uses
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    check_table("devices", &config.devices)?;
    check_table("interrupts", &config.interrupts)?;

    let composition = &config.composition;
    if !(0.0..1.0).contains(&composition.blend_factor) {
        anyhow::bail!(
            "Blend factor must lie in [0, 1), got {}",
            composition.blend_factor
        );
    }
    if !(composition.shrink_factor > 0.0 && composition.shrink_factor <= 1.0) {
        anyhow::bail!(
            "Shrink factor must lie in (0, 1], got {}",
            composition.shrink_factor
        );
    }
    if let Some(ratio) = composition.duration_ratio {
        if !(ratio > 0.0 && ratio < 1.0) {
            anyhow::bail!("Duration ratio must lie in (0, 1), got {}", ratio);
        }
    }

    let generation = &config.generation;
    if generation.signal_length == 0 {
        anyhow::bail!("Signal length must be greater than zero");
    }
    if !(generation.duration_s > 0.0) {
        anyhow::bail!(
            "Signal duration must be greater than zero, got {}",
            generation.duration_s
        );
    }

    let domain = generation.domain.as_str();
    for (name, table) in [("devices", &config.devices), ("interrupts", &config.interrupts)] {
        let range = table
            .get(domain)
            .with_context(|| format!("Domain '{}' missing from {} table", domain, name))?;
        if let FrequencyRange::Conditioned(_) = range.frequency {
            range
                .frequency
                .resolve(domain, generation.condition.as_deref())
                .with_context(|| format!("Invalid condition for {} table", name))?;
        }
    }

    Ok(())
}
