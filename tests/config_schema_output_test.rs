// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use rust_interrupt_synth::config;

#[test]
fn test_config_schema_output() -> Result<()> {
    // The schema goes to stdout; only check the call succeeds
    config::output_config_schema()?;
    Ok(())
}

#[test]
fn test_default_config_matches_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(include_str!("../resources/config.schema.json"))?;
    let validator = jsonschema::draft202012::options().build(&schema)?;

    let yaml = serde_yml::to_string(&config::Config::default())?;
    let yaml_value: serde_yml::Value = serde_yml::from_str(&yaml)?;
    let json_value = serde_json::to_value(&yaml_value)?;
    assert!(validator.is_valid(&json_value));
    Ok(())
}
