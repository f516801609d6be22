//! monosynth - plays a short phrase through the default output device
//!
//! Run with: cargo run
//! Set RUST_LOG=debug to see engine lifecycle messages.

mod app;

use app::{Demo, Step};
use monosynth::ParamId;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // A2 acid line: the cutoff opens as the phrase goes on
    let phrase = [
        Step::Set(ParamId::Envelope, 1.0),
        Step::Set(ParamId::Attack, 2.0),
        Step::Set(ParamId::Decay, 120.0),
        Step::Set(ParamId::Sustain, -12.0),
        Step::Set(ParamId::Release, 80.0),
        Step::Set(ParamId::Resonance, 4.0),
        Step::Set(ParamId::Cutoff, 400.0),
        Step::Set(ParamId::LfoRate, 6.0),
        Step::Set(ParamId::LfoDepth, 150.0),
        Step::Note(45, 250),
        Step::Note(45, 250),
        Step::Note(57, 250),
        Step::Note(48, 250),
        Step::Set(ParamId::Cutoff, 1_200.0),
        Step::Note(45, 250),
        Step::Note(52, 250),
        Step::Note(55, 250),
        Step::Note(57, 250),
        Step::Set(ParamId::Cutoff, 3_000.0),
        Step::Set(ParamId::LfoDepth, 900.0),
        Step::Note(45, 500),
        Step::Note(40, 750),
        Step::Rest(500),
    ];

    Demo::new().steps(phrase).run()
}
