// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-interrupt-synth project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use super::composer::{add_interrupt_with_params, add_small_interrupts, compose, ComposeOptions, InterruptContext};
use super::error::InterruptError;
use super::interval::{Interval, OccupiedSet};
use super::ranges::{DeviceRange, DeviceRanges};
use super::record::InterruptKind;
use crate::signal::{render_sinusoids, time_vector, Signal};
use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, SeedableRng};

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    fn devices() -> DeviceRanges {
        DeviceRanges::new()
            .with("Wide", DeviceRange::fixed((-10.0, 10.0), (1.0, 5.0)))
            .with("Temperature", DeviceRange::fixed((0.2, 1.0), (5.0, 15.0)))
            .with("Tight", DeviceRange::fixed((0.0, 1.0), (1.0, 5.0)))
            .with(
                "Accelerometer",
                DeviceRange::conditioned((-2.0, 2.0), [("low", (1.0, 10.0)), ("high", (20.0, 50.0))]),
            )
    }

    fn interrupts() -> DeviceRanges {
        DeviceRanges::new()
            .with("Wide", DeviceRange::fixed((0.1, 0.3), (5.0, 15.0)))
            .with("Temperature", DeviceRange::fixed((0.05, 0.2), (5.0, 15.0)))
            .with("Tight", DeviceRange::fixed((0.02, 0.05), (5.0, 15.0)))
            .with(
                "Accelerometer",
                DeviceRange::conditioned((0.1, 0.5), [("low", (5.0, 15.0)), ("high", (20.0, 50.0))]),
            )
    }

    #[test]
    fn test_main_only() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let mut rng = StdRng::seed_from_u64(1);
        let t = time_vector(1.0, 1000);
        let mut signal = Signal::zeros(1000);

        let (records, occupied) =
            compose(&mut rng, &t, &mut signal, &ctx, 0.1, &ComposeOptions::default()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, InterruptKind::Main);
        assert_eq!(records[0].duration_idx, 100);
        assert_eq!(occupied.as_slice(), &[records[0].interval()]);

        // Outside the main interval nothing changed
        let main = records[0].interval();
        for (i, &v) in signal.iter().enumerate() {
            if i < main.start || i >= main.end {
                assert_eq!(v, 0.0);
            }
        }
    }

    #[test]
    fn test_complex_iterations_emit_nested_records() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let mut rng = StdRng::seed_from_u64(2);
        let t = time_vector(1.0, 1000);
        let mut signal = Signal::zeros(1000);
        let options = ComposeOptions {
            complex_iter: 2,
            ..Default::default()
        };

        let (records, occupied) = compose(&mut rng, &t, &mut signal, &ctx, 0.1, &options).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(occupied.len(), 3);
        assert_eq!(records[0].kind, InterruptKind::Main);
        let main = records[0].interval();
        for nested in &records[1..] {
            assert_eq!(nested.kind, InterruptKind::MainOverlapping);
            assert!(nested.start_idx >= main.start);
            assert!(nested.interval().end <= main.end);
            // Nested interrupts reuse the main waveform
            assert_eq!(nested.sinusoids_params, records[0].sinusoids_params);
        }
    }

    #[test]
    fn test_shrinking_complex_durations() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let mut rng = StdRng::seed_from_u64(3);
        let t = time_vector(1.0, 1000);
        let mut signal = Signal::zeros(1000);
        let options = ComposeOptions {
            complex_iter: 3,
            shrink_complex: true,
            shrink_factor: 0.5,
            ..Default::default()
        };

        let (records, _) = compose(&mut rng, &t, &mut signal, &ctx, 0.1, &options).unwrap();
        let durations: Vec<usize> = records.iter().map(|r| r.duration_idx).collect();
        assert_eq!(durations, vec![100, 50, 25, 12]);
    }

    #[test]
    fn test_degenerate_complex_is_skipped() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let mut rng = StdRng::seed_from_u64(4);
        let t = time_vector(1.0, 1000);
        let mut signal = Signal::zeros(1000);
        let options = ComposeOptions {
            complex_iter: 2,
            shrink_complex: true,
            shrink_factor: 0.5,
            ..Default::default()
        };

        // Main spans 2 samples, every nested span shrinks to 1 or 0
        let (records, occupied) = compose(&mut rng, &t, &mut signal, &ctx, 0.0025, &options).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(occupied.len(), 1);
    }

    #[test]
    fn test_unplaceable_main_leaves_signal_untouched() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let mut rng = StdRng::seed_from_u64(5);
        let t = time_vector(1.0, 500);
        let mut signal = Signal::from_elem(500, 0.3);
        let before = signal.clone();

        let (records, occupied) =
            compose(&mut rng, &t, &mut signal, &ctx, 1.0, &ComposeOptions::default()).unwrap();
        assert!(records.is_empty());
        assert!(occupied.is_empty());
        assert_eq!(signal, before);
    }

    #[test]
    fn test_drop_pulls_signal_below_baseline() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Temperature", &dev, &int, None);
        let mut rng = StdRng::seed_from_u64(6);
        let t = time_vector(1.0, 1000);
        let mut signal = Signal::ones(1000);
        let options = ComposeOptions {
            drop: true,
            ..Default::default()
        };

        compose(&mut rng, &t, &mut signal, &ctx, 0.1, &options).unwrap();
        let min = signal.iter().copied().fold(f64::INFINITY, f64::min);
        assert!(min < 1.0, "minimum {} should fall below the baseline", min);
    }

    #[test]
    fn test_written_slices_respect_device_bounds() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let t = time_vector(1.0, 2000);

        for seed in 0..10 {
            for drop in [true, false] {
                let mut rng = StdRng::seed_from_u64(100 + seed);
                let mut signal = Signal::zeros(2000);
                let options = ComposeOptions {
                    drop,
                    disperse: true,
                    complex_iter: 2,
                    n_small: 2,
                    ..Default::default()
                };
                compose(&mut rng, &t, &mut signal, &ctx, 0.08, &options).unwrap();
                for &v in &signal {
                    assert!(v >= -10.0 - TOL && v <= 10.0 + TOL, "sample {} out of bounds", v);
                }
            }
        }
    }

    #[test]
    fn test_written_slices_respect_tight_device_bounds() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Tight", &dev, &int, None);
        let t = time_vector(1.0, 2000);

        for seed in 0..10 {
            for drop in [true, false] {
                for blend_factor in [0.25, 0.5] {
                    let mut rng = StdRng::seed_from_u64(200 + seed);
                    let mut signal = Signal::from_elem(2000, 0.5);
                    let options = ComposeOptions {
                        n_sinusoids: Some(2),
                        drop,
                        disperse: false,
                        complex_iter: 2,
                        n_small: 2,
                        blend_factor,
                        ..Default::default()
                    };
                    let (records, _) = compose(&mut rng, &t, &mut signal, &ctx, 0.08, &options).unwrap();
                    assert!(!records.is_empty());
                    for &v in &signal {
                        assert!(v >= -TOL && v <= 1.0 + TOL, "sample {} out of [0, 1]", v);
                    }
                }
            }
        }
    }

    #[test]
    fn test_main_slice_matches_blend_equation() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let t = time_vector(1.0, 1000);
        let base = t.mapv(|ti| 0.5 * (2.0 * std::f64::consts::PI * 3.0 * ti).sin());
        let blend_factor = 0.25;

        for drop in [true, false] {
            let mut rng = StdRng::seed_from_u64(11);
            let mut signal = base.clone();
            let options = ComposeOptions {
                disperse: false,
                drop,
                blend_factor,
                ..Default::default()
            };

            let (records, _) = compose(&mut rng, &t, &mut signal, &ctx, 0.1, &options).unwrap();
            assert_eq!(records.len(), 1);
            let main = &records[0];
            let wave = render_sinusoids(&t, &main.sinusoids_params);
            let shift = if drop { -main.offset } else { main.offset };

            for i in main.interval().start..main.interval().end {
                let expected = blend_factor * base[i] + (1.0 - blend_factor) * (wave[i] + shift);
                assert_abs_diff_eq!(signal[i], expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_invalid_shrink_factor_is_rejected() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let t = time_vector(1.0, 1000);

        for shrink_factor in [1.5, 0.0, f64::NAN] {
            let mut rng = StdRng::seed_from_u64(12);
            let mut signal = Signal::zeros(1000);
            let options = ComposeOptions {
                complex_iter: 2,
                shrink_complex: true,
                shrink_factor,
                ..Default::default()
            };

            let err = compose(&mut rng, &t, &mut signal, &ctx, 0.1, &options).unwrap_err();
            assert!(matches!(err, InterruptError::InvalidShrinkFactor(_)));
            assert!(signal.iter().all(|&v| v == 0.0));
        }

        // Unused when shrinking is off
        let options = ComposeOptions {
            complex_iter: 2,
            shrink_factor: 1.5,
            ..Default::default()
        };
        let mut signal = Signal::zeros(1000);
        let (records, _) =
            compose(&mut StdRng::seed_from_u64(12), &t, &mut signal, &ctx, 0.1, &options).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_placements_keep_buffer_apart() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let t = time_vector(1.0, 10_000);
        let options = ComposeOptions {
            n_small: 3,
            small_duration_ratio: Some(0.03),
            ..Default::default()
        };

        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut signal = Signal::zeros(10_000);
            let (_, occupied) = compose(&mut rng, &t, &mut signal, &ctx, 0.1, &options).unwrap();
            let intervals = occupied.as_slice();
            for (i, a) in intervals.iter().enumerate() {
                for b in &intervals[i + 1..] {
                    assert!(
                        a.end + 100 <= b.start || b.end + 100 <= a.start,
                        "{:?} and {:?} are closer than the buffer",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_small_interrupts_skip_when_signal_is_full() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let mut rng = StdRng::seed_from_u64(7);
        let t = time_vector(1.0, 1000);
        let mut signal = Signal::from_elem(1000, 0.5);
        let before = signal.clone();
        let mut occupied: OccupiedSet = [Interval::new(0, 999)].into_iter().collect();

        let records = add_small_interrupts(
            &mut rng,
            &t,
            &mut signal,
            &ctx,
            2,
            &mut occupied,
            0.05,
            &ComposeOptions::default(),
        )
        .unwrap();

        assert!(records.is_empty());
        assert_eq!(signal, before);
        assert_eq!(occupied.len(), 1);
    }

    #[test]
    fn test_small_interrupts_are_tagged_and_tracked() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let mut rng = StdRng::seed_from_u64(8);
        let t = time_vector(1.0, 5000);
        let mut signal = Signal::zeros(5000);
        let mut occupied = OccupiedSet::new();

        let records = add_small_interrupts(
            &mut rng,
            &t,
            &mut signal,
            &ctx,
            2,
            &mut occupied,
            0.02,
            &ComposeOptions::default(),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.kind == InterruptKind::Small && r.duration_idx == 100));
        assert_eq!(occupied.len(), 2);
    }

    #[test]
    fn test_conditioned_domain() {
        let (dev, int) = (devices(), interrupts());
        let t = time_vector(1.0, 1000);
        let mut signal = Signal::zeros(1000);

        let ok = InterruptContext::new("Accelerometer", &dev, &int, Some("high"));
        let (records, _) =
            compose(&mut StdRng::seed_from_u64(9), &t, &mut signal, &ok, 0.1, &ComposeOptions::default()).unwrap();
        assert!(records[0].sinusoids_params.iter().all(|p| (20.0..=50.0).contains(&p.freq)));

        let missing = InterruptContext::new("Accelerometer", &dev, &int, Some("hot"));
        let err = compose(&mut StdRng::seed_from_u64(9), &t, &mut signal, &missing, 0.1, &ComposeOptions::default())
            .unwrap_err();
        assert!(matches!(err, InterruptError::DomainLookup { .. }));
    }

    #[test]
    fn test_unknown_domain_and_length_mismatch() {
        let (dev, int) = (devices(), interrupts());
        let t = time_vector(1.0, 100);
        let mut rng = StdRng::seed_from_u64(10);

        let unknown = InterruptContext::new("Barometer", &dev, &int, None);
        let mut signal = Signal::zeros(100);
        assert_eq!(
            compose(&mut rng, &t, &mut signal, &unknown, 0.1, &ComposeOptions::default()).unwrap_err(),
            InterruptError::UnknownDomain("Barometer".to_string())
        );

        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let mut short = Signal::zeros(99);
        assert!(matches!(
            compose(&mut rng, &t, &mut short, &ctx, 0.1, &ComposeOptions::default()),
            Err(InterruptError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_add_interrupt_with_params_defaults() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let t = time_vector(1.0, 10_000);

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut signal = Signal::zeros(10_000);
            let (records, occupied) =
                add_interrupt_with_params(&mut rng, &t, &mut signal, &ctx, None, None, &ComposeOptions::default())
                    .unwrap();

            assert_eq!(records[0].kind, InterruptKind::Main);
            assert!((600..=1200).contains(&records[0].duration_idx));
            assert!(records.len() <= 3);
            assert_eq!(records.len(), occupied.len());
        }
    }

    #[test]
    fn test_same_seed_same_composition() {
        let (dev, int) = (devices(), interrupts());
        let ctx = InterruptContext::new("Wide", &dev, &int, None);
        let t = time_vector(1.0, 2000);
        let options = ComposeOptions {
            complex_iter: 1,
            n_small: 1,
            ..Default::default()
        };

        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut signal = Signal::zeros(2000);
            let (records, _) = compose(&mut rng, &t, &mut signal, &ctx, 0.1, &options).unwrap();
            (signal, records)
        };
        assert_eq!(run(42), run(42));
    }
}
