use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use monosynth::{EngineConfig, MonoSynth, ParamId, Voice, VoiceConfig};

use crate::BLOCK_SIZES;

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === FULL VOICE ===
        // saw → envelope → filter with LFO on the cutoff
        let mut voice = Voice::new(VoiceConfig::full(), 48_000.0);
        voice.set_cutoff(1_500.0);
        voice.set_resonance(2.0);
        voice.set_lfo_frequency(5.0);
        voice.set_lfo_amplitude(800.0);
        voice.note_on(45);

        group.bench_with_input(BenchmarkId::new("full", size), &size, |b, _| {
            b.iter(|| {
                voice.process(black_box(&mut buffer), true);
            })
        });

        // === PLAIN SINE ===
        // baseline: oscillator and headroom only
        let mut voice = Voice::new(VoiceConfig::sine(), 48_000.0);
        voice.note_on(69);

        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                voice.process(black_box(&mut buffer), true);
            })
        });
    }

    group.finish();
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        let config = EngineConfig {
            sample_rate: 48_000.0,
            ..EngineConfig::default()
        };
        let mut synth = MonoSynth::new(config).expect("valid engine config");
        synth.set_parameter(ParamId::Envelope, 1.0);
        synth.set_parameter(ParamId::LfoDepth, 400.0);

        // === ARPEGGIO ===
        // four events per block splits the render into five runs
        let quarter = (size / 4) as u32;
        let notes = [45u8, 52, 57, 60];
        group.bench_with_input(BenchmarkId::new("arpeggio", size), &size, |b, _| {
            b.iter(|| {
                for (i, &note) in notes.iter().enumerate() {
                    let _ = synth.enqueue_midi(0x90, note, 100, i as u32 * quarter);
                }
                synth.render(black_box(&mut [&mut left[..], &mut right[..]]), size);
            })
        });

        // === SUSTAINED NOTE ===
        // no events: one run per block
        synth.reset();
        let _ = synth.enqueue_midi(0x90, 45, 100, 0);
        group.bench_with_input(BenchmarkId::new("sustained", size), &size, |b, _| {
            b.iter(|| {
                synth.render(black_box(&mut [&mut left[..], &mut right[..]]), size);
            })
        });
    }

    group.finish();
}
