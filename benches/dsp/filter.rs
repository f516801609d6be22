//! Benchmarks for the resonant low-pass.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::filter::LowPassFilter;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Settled coefficients: no per-sample recompute
        let mut filter = LowPassFilter::new(1_000.0, 2.0, 48_000.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("settled", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // Gliding cutoff: coefficients recomputed every sample
        let mut filter = LowPassFilter::new(200.0, 2.0, 48_000.0);
        let mut buffer = input.clone();
        let mut high = false;
        group.bench_with_input(BenchmarkId::new("gliding", size), &size, |b, _| {
            b.iter(|| {
                high = !high;
                filter.set_cutoff(if high { 8_000.0 } else { 200.0 });
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer));
            })
        });

        // LFO offset: one coefficient build per sample
        let mut filter = LowPassFilter::new(1_000.0, 2.0, 48_000.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let offset = if i % 2 == 0 { 300.0 } else { -300.0 };
                    *sample = filter.process_modulated(*sample, offset);
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
