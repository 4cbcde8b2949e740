// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the interrupt synthesizer
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings. The configuration is backed by a YAML file and
//! validated against a JSON schema for robustness.
//!
//! ## Configuration Structure
//!
//! The configuration is organized as a nested structure with sections:
//! - `generation`: Base signal length, duration, seed and target domain
//! - `composition`: Blend factor, nesting, placement and drift settings
//! - `devices`: Physical amplitude/frequency envelope of every domain
//! - `interrupts`: Envelope interrupt waveforms are synthesised from
//!
//! ## Usage
//!
//! ```no_run
//! use rust_interrupt_synth::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some(42),                          // Seed
//!     Some("Accelerometer".to_string()), // Domain
//!     Some("high".to_string()),          // Condition
//!     Some(2),                           // Complex iterations
//! );
//!
//! println!("Signal length: {}", config.generation.signal_length);
//! ```

pub mod composition;
pub mod generation;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::interrupt::{DeviceRange, DeviceRanges};

// Re-export all types for public API
pub use composition::CompositionConfig;
pub use generation::GenerationConfig;
pub use utils::{output_config_schema, validate_specific_rules};

/// Root configuration structure of the synthesizer.
///
/// # Default Values
///
/// Each section uses default values when not explicitly specified in the
/// configuration file. The default device and interrupt tables describe a
/// `Temperature` sensor, an `Accelerometer` whose frequency envelopes depend
/// on a `low`/`high` condition, and a `Photoresistor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base signal settings.
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Interrupt placement and blending settings.
    #[serde(default)]
    pub composition: CompositionConfig,

    /// Physical envelope of each domain.
    ///
    /// Interrupts are kept inside the union of this range and the
    /// interrupt range of the same domain.
    #[serde(default = "default_devices")]
    pub devices: DeviceRanges,

    /// Envelope interrupt waveforms are drawn from, per domain.
    #[serde(default = "default_interrupts")]
    pub interrupts: DeviceRanges,
}

fn default_devices() -> DeviceRanges {
    DeviceRanges::new()
        .with("Temperature", DeviceRange::fixed((0.0, 10.0), (0.5, 5.0)))
        .with(
            "Accelerometer",
            DeviceRange::conditioned((0.0, 10.0), [("low", (100.0, 200.0)), ("high", (500.0, 1000.0))]),
        )
        .with("Photoresistor", DeviceRange::fixed((5.0, 15.0), (50.0, 150.0)))
}

fn default_interrupts() -> DeviceRanges {
    DeviceRanges::new()
        .with("Temperature", DeviceRange::fixed((0.5, 2.0), (5.0, 15.0)))
        .with(
            "Accelerometer",
            DeviceRange::conditioned((0.5, 2.0), [("low", (5.0, 15.0)), ("high", (20.0, 50.0))]),
        )
        .with("Photoresistor", DeviceRange::fixed((0.5, 3.0), (10.0, 40.0)))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            composition: CompositionConfig::default(),
            devices: default_devices(),
            interrupts: default_interrupts(),
        }
    }
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Original path: {:?}, Sample path: {:?}", path, sample_path);

        // Create parent directories if they don't exist
        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with the default configuration, which is
    /// then returned. A file failing schema validation, deserialization or
    /// [`validate_specific_rules`] produces an error and a
    /// `<name>.sample.yaml` file next to it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        // First step: convert YAML to a generic Value
        let yaml_value: serde_yml::Value = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        // Convert to JSON Value for validation
        let json_value = serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })?;

        // Load and validate with the schema
        let schema_str = include_str!("../../resources/config.schema.json");
        let schema: serde_json::Value =
            serde_json::from_str(schema_str).context("Failed to parse JSON schema")?;

        let validator = jsonschema::draft202012::options()
            .should_validate_formats(true)
            .build(&schema)?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_yml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = config.validate() {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Check the rules the JSON schema cannot express.
    pub fn validate(&self) -> Result<()> {
        validate_specific_rules(self)
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only arguments that are provided override the loaded values.
    ///
    /// # Parameters
    ///
    /// * `seed` - Random seed for reproducible runs
    /// * `domain` - Domain to generate for
    /// * `condition` - Condition key for conditioned frequency tables
    /// * `complex_iter` - Number of nested sub-interrupts
    pub fn apply_args(
        &mut self,
        seed: Option<u64>,
        domain: Option<String>,
        condition: Option<String>,
        complex_iter: Option<usize>,
    ) {
        if let Some(seed) = seed {
            debug!("Overriding seed from command line: {}", seed);
            self.generation.seed = Some(seed);
        }
        if let Some(domain) = domain {
            debug!("Overriding domain from command line: {}", domain);
            self.generation.domain = domain;
        }
        if let Some(condition) = condition {
            debug!("Overriding condition from command line: {}", condition);
            self.generation.condition = Some(condition);
        }
        if let Some(iter) = complex_iter {
            debug!("Overriding complex iterations from command line: {}", iter);
            self.composition.complex_iter = iter;
        }
    }
}
