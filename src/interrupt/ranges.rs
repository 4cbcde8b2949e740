// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Device range tables
//!
//! A domain (a device or device category) carries a physical amplitude
//! envelope and a frequency envelope. The frequency envelope is either a
//! single `(min, max)` pair or a table keyed by an operating condition such
//! as a temperature band. In YAML both shapes are written naturally:
//!
//! ```yaml
//! Temperature:
//!   amplitude: [0.2, 1.0]
//!   frequency: [5.0, 15.0]
//! Accelerometer:
//!   amplitude: [-2.0, 2.0]
//!   frequency:
//!     low: [1.0, 10.0]
//!     high: [20.0, 50.0]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{InterruptError, Result};

/// Frequency envelope of a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrequencyRange {
    /// One range regardless of operating condition
    Fixed((f64, f64)),
    /// One range per condition key
    Conditioned(BTreeMap<String, (f64, f64)>),
}

impl FrequencyRange {
    /// Resolve the `(min, max)` frequency pair for a condition.
    ///
    /// A fixed range ignores the condition. A conditioned range requires the
    /// key to be present and fails with [`InterruptError::DomainLookup`]
    /// otherwise, including when no key is given.
    pub fn resolve(&self, domain: &str, condition: Option<&str>) -> Result<(f64, f64)> {
        match self {
            FrequencyRange::Fixed(range) => Ok(*range),
            FrequencyRange::Conditioned(table) => condition
                .and_then(|key| table.get(key))
                .copied()
                .ok_or_else(|| InterruptError::DomainLookup {
                    domain: domain.to_string(),
                    key: condition.map(str::to_string),
                }),
        }
    }

    /// Every `(min, max)` pair held by this envelope.
    pub fn ranges(&self) -> Vec<(f64, f64)> {
        match self {
            FrequencyRange::Fixed(range) => vec![*range],
            FrequencyRange::Conditioned(table) => table.values().copied().collect(),
        }
    }
}

/// Physical constraints of one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRange {
    /// Amplitude bounds `(min, max)`
    pub amplitude: (f64, f64),
    /// Frequency envelope in Hz
    pub frequency: FrequencyRange,
}

impl DeviceRange {
    /// Domain with a single frequency range.
    pub fn fixed(amplitude: (f64, f64), frequency: (f64, f64)) -> Self {
        Self {
            amplitude,
            frequency: FrequencyRange::Fixed(frequency),
        }
    }

    /// Domain whose frequency range depends on an operating condition.
    pub fn conditioned<K, I>(amplitude: (f64, f64), frequencies: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, (f64, f64))>,
    {
        Self {
            amplitude,
            frequency: FrequencyRange::Conditioned(
                frequencies.into_iter().map(|(k, r)| (k.into(), r)).collect(),
            ),
        }
    }
}

/// Mapping from domain name to its [`DeviceRange`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRanges(BTreeMap<String, DeviceRange>);

impl DeviceRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a domain, builder style.
    pub fn with(mut self, domain: impl Into<String>, range: DeviceRange) -> Self {
        self.insert(domain, range);
        self
    }

    pub fn insert(&mut self, domain: impl Into<String>, range: DeviceRange) {
        self.0.insert(domain.into(), range);
    }

    /// Look a domain up, failing with [`InterruptError::UnknownDomain`].
    pub fn get(&self, domain: &str) -> Result<&DeviceRange> {
        self.0
            .get(domain)
            .ok_or_else(|| InterruptError::UnknownDomain(domain.to_string()))
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.0.contains_key(domain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DeviceRange)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Amplitude bounds covering both the device's physical range and its
/// interrupt range: the smaller minimum and the larger maximum.
pub fn widened_bounds(device: &DeviceRange, interrupt: &DeviceRange) -> (f64, f64) {
    (
        device.amplitude.0.min(interrupt.amplitude.0),
        device.amplitude.1.max(interrupt.amplitude.1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accelerometer() -> DeviceRange {
        DeviceRange::conditioned((0.0, 10.0), [("low", (100.0, 200.0)), ("high", (500.0, 1000.0))])
    }

    #[test]
    fn test_fixed_range_ignores_condition() {
        let range = DeviceRange::fixed((5.0, 15.0), (50.0, 150.0));
        assert_eq!(range.frequency.resolve("B", None).unwrap(), (50.0, 150.0));
        assert_eq!(range.frequency.resolve("B", Some("low")).unwrap(), (50.0, 150.0));
    }

    #[test]
    fn test_conditioned_range_lookup() {
        let range = accelerometer();
        assert_eq!(range.frequency.resolve("A", Some("high")).unwrap(), (500.0, 1000.0));
    }

    #[test]
    fn test_conditioned_range_missing_key() {
        let range = accelerometer();
        let err = range.frequency.resolve("A", Some("medium")).unwrap_err();
        assert_eq!(
            err,
            InterruptError::DomainLookup {
                domain: "A".to_string(),
                key: Some("medium".to_string())
            }
        );
        assert!(range.frequency.resolve("A", None).is_err());
    }

    #[test]
    fn test_unknown_domain() {
        let table = DeviceRanges::new().with("A", accelerometer());
        assert!(table.get("A").is_ok());
        assert_eq!(
            table.get("Z").unwrap_err(),
            InterruptError::UnknownDomain("Z".to_string())
        );
    }

    #[test]
    fn test_widened_bounds() {
        let device = DeviceRange::fixed((0.0, 10.0), (1.0, 2.0));
        let interrupt = DeviceRange::fixed((-0.5, 2.0), (1.0, 2.0));
        assert_eq!(widened_bounds(&device, &interrupt), (-0.5, 10.0));
    }

    #[test]
    fn test_yaml_shapes() {
        let yaml = r#"
Temperature:
  amplitude: [0.2, 1.0]
  frequency: [5.0, 15.0]
Accelerometer:
  amplitude: [0.0, 10.0]
  frequency:
    low: [100.0, 200.0]
    high: [500.0, 1000.0]
"#;
        let table: DeviceRanges = serde_yml::from_str(yaml).unwrap();
        assert_eq!(
            table.get("Temperature").unwrap(),
            &DeviceRange::fixed((0.2, 1.0), (5.0, 15.0))
        );
        assert_eq!(table.get("Accelerometer").unwrap(), &accelerometer());
    }
}
