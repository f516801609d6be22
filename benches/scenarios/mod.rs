//! Scenario benchmarks.
//!
//! These model the audio callback: a full voice chain, and the engine
//! splitting blocks around scheduled MIDI events.

mod engine;

pub use engine::{bench_engine, bench_voice};
