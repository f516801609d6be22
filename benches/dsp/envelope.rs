//! Benchmarks for the time-based ADSR contour.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::dsp::envelope::{Envelope, ReleaseMode};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let dt = 1.0 / 48_000.0f64;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Free contour: three exponentials per sample
        let env = Envelope::adsr(0.01, 0.1, 0.6, 0.2);
        group.bench_with_input(BenchmarkId::new("free", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    *sample = env.gain(black_box(0.05 + i as f64 * dt), None);
                }
            })
        });

        // Gated release: level frozen at note-off, then decays
        let env = Envelope::adsr(0.01, 0.1, 0.6, 0.2).with_mode(ReleaseMode::Gated);
        group.bench_with_input(BenchmarkId::new("gated_release", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let since_release = i as f64 * dt;
                    *sample = env.gain(black_box(0.3 + since_release), Some(since_release));
                }
            })
        });
    }

    group.finish();
}
