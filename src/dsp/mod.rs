//! Low-level DSP primitives used by the voice.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They intentionally stay focused on the
//! signal-processing math so the voice and render loop can layer on note
//! handling and scheduling.

/// Attack/decay/sustain/release envelope as a function of time.
pub mod envelope;
/// Two-pole resonant low-pass with smoothed coefficients.
pub mod filter;
/// Sine LFO for cutoff modulation.
pub mod lfo;
/// Band-limited oscillator waveforms and the shared phase accumulator.
pub mod oscillator;
/// Exponential parameter smoothing.
pub mod smoothing;

pub use envelope::{Envelope, ReleaseMode};
pub use filter::LowPassFilter;
pub use lfo::Lfo;
pub use oscillator::{Oscillator, Waveform};
pub use smoothing::SmoothedParam;
