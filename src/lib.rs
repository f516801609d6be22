pub mod dsp; // Oscillator, filter, envelope, LFO, smoothing
pub mod engine; // Render loop and sample-accurate MIDI scheduling
pub mod io;
pub mod params; // Host parameter table
pub mod synth; // The monophonic voice and control messages

pub use engine::{ConfigError, EngineConfig, MonoSynth};
pub use params::{ParamId, Parameters};
pub use synth::voice::{Voice, VoiceConfig};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
