#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        envelope::{Envelope, ReleaseMode},
        filter::LowPassFilter,
        lfo::Lfo,
        oscillator::{Oscillator, Waveform},
    },
    io::converter::midi_note_to_freq,
};

/// Fixed gain applied after the envelope to leave room for filter resonance.
pub const HEADROOM: f32 = 0.5;

/// Which stages make up the signal path.
///
/// Every instrument variant runs through the same [`Voice`]; the variants
/// only differ in which optional components are switched in.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceConfig {
    pub waveform: Waveform,
    /// Silence the voice when no note is held. Without it the oscillator drones.
    pub gated: bool,
    pub filter: bool,
    pub envelope: bool,
    pub modulator: bool,
    pub release_mode: ReleaseMode,
}

impl VoiceConfig {
    /// Free-running sine, no gate.
    pub fn sine() -> Self {
        Self {
            waveform: Waveform::Sine,
            gated: false,
            filter: false,
            envelope: false,
            modulator: false,
            release_mode: ReleaseMode::Free,
        }
    }

    pub fn gated_sine() -> Self {
        Self {
            gated: true,
            ..Self::sine()
        }
    }

    pub fn filtered_saw() -> Self {
        Self {
            waveform: Waveform::Saw,
            gated: true,
            filter: true,
            ..Self::sine()
        }
    }

    pub fn enveloped_saw() -> Self {
        Self {
            envelope: true,
            ..Self::filtered_saw()
        }
    }

    /// Saw, filter, envelope and cutoff LFO.
    pub fn full() -> Self {
        Self {
            modulator: true,
            ..Self::enveloped_saw()
        }
    }

    pub fn with_release_mode(mut self, mode: ReleaseMode) -> Self {
        self.release_mode = mode;
        self
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self::full()
    }
}

pub struct Voice {
    config: VoiceConfig,
    sample_rate: f32,
    oscillator: Oscillator,
    filter: Option<LowPassFilter>,
    modulator: Option<Lfo>,
    envelope: Envelope,
    held_note: Option<u8>,
    // Seconds relative to the start of the next `process` call. Zero at
    // attack, then pushed further into the past after every call. `None`
    // until the first attack: an enabled envelope stays silent.
    note_on_time: Option<f64>,
    note_off_time: Option<f64>,
}

impl Voice {
    pub fn new(config: VoiceConfig, sample_rate: f32) -> Self {
        let filter = config
            .filter
            .then(|| LowPassFilter::new(20_000.0, 0.5, sample_rate));
        let modulator = config.modulator.then(|| Lfo::new(sample_rate, 2.0, 0.0));

        let mut envelope = Envelope::new().with_mode(config.release_mode);
        envelope.set_bypassed(!config.envelope);

        Self {
            config,
            sample_rate,
            oscillator: Oscillator::new(config.waveform, sample_rate),
            filter,
            modulator,
            envelope,
            held_note: None,
            note_on_time: None,
            note_off_time: None,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.oscillator.set_sample_rate(sample_rate);
        if let Some(filter) = &mut self.filter {
            filter.set_sample_rate(sample_rate);
        }
        if let Some(lfo) = &mut self.modulator {
            lfo.set_sample_rate(sample_rate);
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.oscillator.set_frequency(frequency);
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        if let Some(filter) = &mut self.filter {
            filter.set_cutoff(cutoff_hz);
        }
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        if let Some(filter) = &mut self.filter {
            filter.set_resonance(resonance);
        }
    }

    pub fn set_attack_time(&mut self, seconds: f32) {
        self.envelope.set_attack_time(seconds);
    }

    pub fn set_decay_time(&mut self, seconds: f32) {
        self.envelope.set_decay_time(seconds);
    }

    pub fn set_sustain_level(&mut self, level: f32) {
        self.envelope.set_sustain_level(level);
    }

    pub fn set_release_time(&mut self, seconds: f32) {
        self.envelope.set_release_time(seconds);
    }

    pub fn set_lfo_frequency(&mut self, frequency: f32) {
        if let Some(lfo) = &mut self.modulator {
            lfo.set_frequency(frequency);
        }
    }

    pub fn set_lfo_amplitude(&mut self, amplitude: f32) {
        if let Some(lfo) = &mut self.modulator {
            lfo.set_amplitude(amplitude);
        }
    }

    /// Enable or bypass the envelope.
    ///
    /// Switching it on while a note is held restarts the attack so the
    /// contour begins from the switch rather than from the old note-on.
    pub fn set_envelope_bypassed(&mut self, bypassed: bool) {
        if !self.config.envelope {
            return;
        }

        let was_bypassed = self.envelope.is_bypassed();
        self.envelope.set_bypassed(bypassed);

        if was_bypassed && !bypassed && self.held_note.is_some() {
            self.attack();
        }
    }

    /// Restart the envelope clock.
    pub fn attack(&mut self) {
        self.note_on_time = Some(0.0);
        self.note_off_time = None;
    }

    pub fn note_on(&mut self, note: u8) {
        self.set_frequency(midi_note_to_freq(note));
        self.held_note = Some(note);
        self.attack();
    }

    /// Release `note` if it is the one currently held; otherwise ignore it.
    pub fn note_off(&mut self, note: u8) {
        if self.held_note == Some(note) {
            self.release();
        }
    }

    pub fn all_notes_off(&mut self) {
        if self.held_note.is_some() {
            self.release();
        }
    }

    fn release(&mut self) {
        self.held_note = None;
        self.note_off_time = Some(0.0);
    }

    /// Combine note state with the host's global bypass into a run gate.
    pub fn gate(&self, bypassed: bool) -> bool {
        !bypassed && (!self.config.gated || self.held_note.is_some() || self.envelope_enabled())
    }

    /// Render `out.len()` samples. A closed gate feeds silence into the
    /// filter so its tail still rings down naturally.
    pub fn process(&mut self, out: &mut [f32], gate: bool) {
        let inv_sample_rate = 1.0 / self.sample_rate as f64;

        for (i, out) in out.iter_mut().enumerate() {
            let time = i as f64 * inv_sample_rate;
            let gain = match self.note_on_time {
                Some(attacked) => self
                    .envelope
                    .gain(time - attacked, self.note_off_time.map(|t| time - t)),
                None if self.envelope.is_bypassed() => 1.0,
                None => 0.0,
            };
            let mut sample = self.oscillator.next_sample() * gain * HEADROOM;
            if !gate {
                sample = 0.0;
            }

            let cutoff_offset = match &mut self.modulator {
                Some(lfo) => lfo.next_sample(),
                None => 0.0,
            };

            *out = match &mut self.filter {
                Some(filter) => filter.process_modulated(sample, cutoff_offset),
                None => sample,
            };
        }

        let elapsed = out.len() as f64 * inv_sample_rate;
        for clock in [&mut self.note_on_time, &mut self.note_off_time]
            .into_iter()
            .flatten()
        {
            *clock -= elapsed;
        }
    }

    /// Reset phases, filter history and the envelope clock.
    ///
    /// A held note restarts its attack; otherwise the envelope returns to
    /// its never-attacked silence. Parameter targets, including in-flight
    /// filter smoothing, are kept.
    pub fn reset(&mut self) {
        self.oscillator.reset();
        if let Some(filter) = &mut self.filter {
            filter.reset();
        }
        if let Some(lfo) = &mut self.modulator {
            lfo.reset();
        }
        self.note_on_time = self.held_note.map(|_| 0.0);
        self.note_off_time = None;
    }

    pub fn envelope_enabled(&self) -> bool {
        self.config.envelope && !self.envelope.is_bypassed()
    }

    pub fn held_note(&self) -> Option<u8> {
        self.held_note
    }

    pub fn frequency(&self) -> f32 {
        self.oscillator.frequency()
    }

    pub fn config(&self) -> VoiceConfig {
        self.config
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn filter(&self) -> Option<&LowPassFilter> {
        self.filter.as_ref()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44_100.0;

    fn enveloped() -> Voice {
        let mut voice = Voice::new(VoiceConfig::enveloped_saw(), SAMPLE_RATE);
        voice.set_envelope_bypassed(false);
        voice.set_attack_time(0.01);
        voice.set_decay_time(0.02);
        voice.set_sustain_level(0.5);
        voice.set_release_time(0.03);
        voice
    }

    #[test]
    fn closed_gate_on_settled_filter_is_silent() {
        let mut voice = Voice::new(VoiceConfig::full(), SAMPLE_RATE);
        voice.set_cutoff(800.0);
        voice.set_lfo_amplitude(300.0);
        voice.note_on(60);

        let mut buffer = vec![1.0f32; 512];
        voice.process(&mut buffer, false);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn closed_gate_lets_filter_ring_down() {
        let mut voice = Voice::new(VoiceConfig::filtered_saw(), SAMPLE_RATE);
        voice.set_cutoff(500.0);
        voice.set_resonance(4.0);
        voice.note_on(45);

        let mut buffer = vec![0.0f32; 4096];
        voice.process(&mut buffer, true);
        voice.process(&mut buffer[..64], false);

        // Resonant tail continues after the gate closes.
        assert!(buffer[..64].iter().any(|&s| s.abs() > 1e-4));
    }

    #[test]
    fn attack_starts_from_silence() {
        let mut voice = enveloped();
        voice.note_on(69);

        let mut buffer = vec![0.0f32; 100];
        voice.process(&mut buffer, true);
        assert_eq!(buffer[0], 0.0);
    }

    #[test]
    fn envelope_clock_continues_across_calls() {
        let mut whole = enveloped();
        let mut split = enveloped();
        whole.note_on(57);
        split.note_on(57);

        let mut a = vec![0.0f32; 2048];
        whole.process(&mut a, true);

        let mut b = vec![0.0f32; 2048];
        let (first, second) = b.split_at_mut(700);
        split.process(first, true);
        split.process(second, true);

        for (i, (x, y)) in a.iter().zip(&b).enumerate() {
            assert!((x - y).abs() < 1e-5, "sample {i} diverged: {x} vs {y}");
        }
    }

    #[test]
    fn note_off_for_other_note_is_ignored() {
        let mut voice = enveloped();
        voice.note_on(60);
        voice.note_off(61);
        assert_eq!(voice.held_note(), Some(60));
        voice.note_off(60);
        assert_eq!(voice.held_note(), None);
    }

    #[test]
    fn enabling_envelope_while_held_retriggers_attack() {
        let config = VoiceConfig {
            filter: false,
            ..VoiceConfig::enveloped_saw()
        };
        let mut voice = Voice::new(config, SAMPLE_RATE);
        voice.set_envelope_bypassed(true);
        voice.note_on(60);

        let mut buffer = vec![0.0f32; 1000];
        voice.process(&mut buffer, true);
        assert!(buffer.iter().any(|&s| s.abs() > 0.1));

        voice.set_envelope_bypassed(false);
        voice.process(&mut buffer[..2], true);
        assert_eq!(buffer[0], 0.0, "attack did not restart");
        assert!(buffer[1].abs() < 0.01);
    }

    #[test]
    fn enabling_envelope_without_note_does_not_retrigger() {
        let config = VoiceConfig {
            filter: false,
            ..VoiceConfig::enveloped_saw()
        };
        let mut voice = Voice::new(config, SAMPLE_RATE);
        voice.set_attack_time(0.001);
        voice.note_on(60);
        let mut buffer = vec![0.0f32; 441];
        voice.process(&mut buffer, true);
        voice.note_off(60);
        voice.process(&mut buffer, true);

        voice.set_envelope_bypassed(true);
        voice.set_envelope_bypassed(false);
        voice.process(&mut buffer[..1], true);
        assert_ne!(buffer[0], 0.0);
    }

    #[test]
    fn enabled_envelope_is_silent_before_any_note() {
        let mut voice = Voice::new(VoiceConfig::full(), SAMPLE_RATE);
        assert!(voice.gate(false));

        let mut buffer = vec![1.0f32; 4410];
        voice.process(&mut buffer, true);
        assert!(buffer.iter().all(|&s| s == 0.0));

        voice.reset();
        voice.process(&mut buffer, true);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn reset_with_held_note_restarts_attack() {
        let mut voice = enveloped();
        voice.note_on(69);
        let mut buffer = vec![0.0f32; 2000];
        voice.process(&mut buffer, true);

        voice.reset();
        voice.process(&mut buffer[..1], true);
        assert_eq!(buffer[0], 0.0);
        assert_eq!(voice.held_note(), Some(69));
    }

    #[test]
    fn gate_truth_table() {
        let mut voice = Voice::new(VoiceConfig::enveloped_saw(), SAMPLE_RATE);
        voice.set_envelope_bypassed(true);
        assert!(!voice.gate(false));
        assert!(!voice.gate(true));

        voice.note_on(64);
        assert!(voice.gate(false));
        assert!(!voice.gate(true));

        voice.note_off(64);
        voice.set_envelope_bypassed(false);
        assert!(voice.gate(false));
        assert!(!voice.gate(true));
    }

    #[test]
    fn ungated_variant_drones() {
        let voice = Voice::new(VoiceConfig::sine(), SAMPLE_RATE);
        assert!(voice.gate(false));
        assert!(!voice.gate(true));
    }

    #[test]
    fn envelope_toggle_is_ignored_without_envelope_stage() {
        let mut voice = Voice::new(VoiceConfig::filtered_saw(), SAMPLE_RATE);
        voice.set_envelope_bypassed(false);
        assert!(!voice.envelope_enabled());
    }

    #[test]
    fn reset_is_reproducible() {
        let mut voice = Voice::new(VoiceConfig::full(), SAMPLE_RATE);
        voice.set_lfo_amplitude(200.0);
        voice.set_lfo_frequency(5.0);
        voice.set_cutoff(20_000.0);
        voice.note_on(50);

        let mut scratch = vec![0.0f32; 777];
        voice.process(&mut scratch, true);

        let run = |voice: &mut Voice| {
            voice.reset();
            voice.note_on(50);
            let mut out = vec![0.0f32; 512];
            voice.process(&mut out, true);
            out
        };

        let first = run(&mut voice);
        let second = run(&mut voice);
        assert_eq!(first, second);
    }

    #[test]
    fn note_on_sets_pitch() {
        let mut voice = Voice::new(VoiceConfig::gated_sine(), SAMPLE_RATE);
        voice.note_on(69);
        assert!((voice.frequency() - 440.0).abs() < 1e-3);
    }
}
