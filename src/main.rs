// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Command line entry point of the interrupt synthesizer
// Generates a base signal, injects interrupts and writes WAV + JSON outputs

use anyhow::Result;
use clap::Parser;
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

use rust_interrupt_synth::config::{output_config_schema, Config};
use rust_interrupt_synth::{run, Mode};

/// Synthesize sensor-like signals with bounded interrupt events
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (YAML), created with defaults if missing
    #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
    config: PathBuf,

    /// Output signal file (.wav, 32-bit float mono)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output metadata file (.json)
    #[arg(short, long, value_name = "FILE")]
    metadata: Option<PathBuf>,

    /// Random seed, overrides the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Domain to generate for, overrides the configuration
    #[arg(short, long)]
    domain: Option<String>,

    /// Condition key for conditioned frequency tables
    #[arg(long)]
    condition: Option<String>,

    /// Injection mode
    #[arg(long, value_enum, default_value_t = Mode::Compose)]
    mode: Mode,

    /// Number of nested sub-interrupts, overrides the configuration
    #[arg(long)]
    complex_iter: Option<usize>,

    /// Print the configuration JSON schema and exit
    #[arg(long, default_value_t = false)]
    show_config_schema: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.show_config_schema {
        return output_config_schema();
    }

    let mut config = Config::from_file(&args.config)?;
    config.apply_args(args.seed, args.domain, args.condition, args.complex_iter);
    config.validate()?;

    let mut rng = match config.generation.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let synthesis = run(&mut rng, &config, args.mode)?;
    info!(
        "Perturbation ratio: {:.2} dB over {} interrupts",
        synthesis.perturbation_ratio_db(),
        synthesis.metadata.interrupts.len()
    );

    if let Some(path) = &args.output {
        synthesis.write_wav(path, config.generation.duration_s)?;
        println!("Signal saved to: {}", path.display());
    }
    if let Some(path) = &args.metadata {
        synthesis.write_metadata(path)?;
        println!("Metadata saved to: {}", path.display());
    }

    Ok(())
}
