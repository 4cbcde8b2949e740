// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use rust_interrupt_synth::config::Config;
use rust_interrupt_synth::interrupt::{compose, inject_bursts, BurstOptions, ComposeOptions, InterruptContext};
use rust_interrupt_synth::signal::{time_vector, Signal};
use std::hint::black_box;

fn bench_compose(c: &mut Criterion) {
    let config = Config::default();
    let ctx = InterruptContext::new("Temperature", &config.devices, &config.interrupts, None);
    let mut group = c.benchmark_group("compose");

    for &len in &[10_000usize, 100_000] {
        let t = time_vector(1.0, len);
        let base = Signal::from_elem(len, 5.0);
        let options = ComposeOptions {
            complex_iter: 3,
            n_small: 2,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| {
                let mut signal = base.clone();
                let result = compose(&mut rng, &t, &mut signal, &ctx, 0.1, &options);
                black_box((signal, result))
            })
        });
    }
    group.finish();
}

fn bench_bursts(c: &mut Criterion) {
    let config = Config::default();
    let t = time_vector(1.0, 10_000);
    let base = Signal::from_elem(10_000, 5.0);
    let options = BurstOptions::default();

    c.bench_function("inject_bursts", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| {
            let mut signal = base.clone();
            let result = inject_bursts(&mut rng, &t, &mut signal, "Temperature", &config.interrupts, None, &options);
            black_box((signal, result))
        })
    });
}

criterion_group!(benches, bench_compose, bench_bursts);
criterion_main!(benches);
