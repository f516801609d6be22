//! Per-block render loop with sample-accurate MIDI.
//!
//! The host hands [`MonoSynth`] a block of `frames` samples plus the MIDI
//! events stamped inside it. The block is cut into maximal runs that contain
//! no pending event; events due at a run's first sample are applied before
//! that run is rendered:
//!
//! ```text
//!   events:     ▼10        ▼20
//!   block:  |----------|----------|----------|
//!           0   run    10   run   20   run   30
//! ```
//!
//! so a note-on stamped at offset 10 sounds from sample 10 exactly, never
//! from the start of the next block. Channel 0 is rendered; any further
//! output channels are copies of it.

pub mod scheduler;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    io::{
        converter::{db_to_amplitude, ms_to_seconds},
        midi::MidiEvent,
    },
    params::{ParamError, ParamId, Parameters},
    synth::{
        message::{ControlMessage, MessageReceiver},
        voice::{Voice, VoiceConfig},
    },
    MAX_BLOCK_SIZE,
};

use self::scheduler::{QueueError, Scheduler, TimedMidi};

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),
    #[error("block size must be at least one frame")]
    EmptyBlock,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Largest block the host will request; sizes the MIDI queue.
    pub max_block_size: usize,
    pub voice: VoiceConfig,
    pub params: Parameters,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_size == 0 {
            return Err(ConfigError::EmptyBlock);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            max_block_size: MAX_BLOCK_SIZE,
            voice: VoiceConfig::default(),
            params: Parameters::default(),
        }
    }
}

pub struct MonoSynth {
    voice: Voice,
    scheduler: Scheduler,
    params: Parameters,
    sample_rate: f32,
    block_size: usize,
    // Control-channel MIDI that found the queue full.
    dropped_events: u64,
}

impl MonoSynth {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut synth = Self {
            voice: Voice::new(config.voice, config.sample_rate),
            scheduler: Scheduler::new(config.max_block_size),
            params: config.params,
            sample_rate: config.sample_rate,
            block_size: config.max_block_size,
            dropped_events: 0,
        };
        synth.load_parameters(config.params);

        log::debug!(
            "monosynth ready: {} Hz, block {} frames, {:?}",
            config.sample_rate,
            config.max_block_size,
            config.voice
        );
        Ok(synth)
    }

    /// Host lifecycle: the stream's sample rate changed. Resets the voice.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            log::warn!("ignoring invalid sample rate {sample_rate}");
            return;
        }

        log::info!("sample rate {} -> {} Hz", self.sample_rate, sample_rate);
        self.sample_rate = sample_rate;
        self.voice.set_sample_rate(sample_rate);
        self.voice.reset();
    }

    /// Host lifecycle: the maximum block size changed. Grows the MIDI queue.
    pub fn set_block_size(&mut self, frames: usize) {
        log::debug!("block size {} -> {} frames", self.block_size, frames);
        self.block_size = frames;
        self.scheduler.resize(frames);
    }

    /// Queue a MIDI message for the next render call.
    ///
    /// `offset` is the frame within that block where it takes effect.
    pub fn enqueue_midi(
        &mut self,
        status: u8,
        data1: u8,
        data2: u8,
        offset: u32,
    ) -> Result<(), QueueError> {
        self.scheduler
            .enqueue(TimedMidi::new(status, data1, data2, offset))
    }

    /// Set a parameter in plain units (ms, dB, Hz). Out-of-range values are clamped.
    pub fn set_parameter(&mut self, id: ParamId, value: f32) {
        let stored = self.params.set(id, value);
        log::trace!("{} = {} {}", id.spec().name, stored, id.spec().unit);
        self.apply_parameter(id);
    }

    /// Set a parameter from a normalised `[0, 1]` host value.
    pub fn set_parameter_normalized(&mut self, id: ParamId, normalized: f32) {
        let value = id.spec().from_normalized(normalized);
        self.set_parameter(id, value);
    }

    /// Set a parameter addressed by the host's raw index, from a normalised value.
    pub fn set_parameter_at(&mut self, index: u32, normalized: f32) -> Result<(), ParamError> {
        let id = ParamId::try_from(index)?;
        self.set_parameter_normalized(id, normalized);
        Ok(())
    }

    pub fn parameter(&self, id: ParamId) -> f32 {
        self.params.get(id)
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// Apply a whole parameter snapshot, e.g. one restored by the host.
    pub fn load_parameters(&mut self, params: Parameters) {
        for id in ParamId::ALL {
            self.params.set(id, params.get(id));
            self.apply_parameter(id);
        }
    }

    fn apply_parameter(&mut self, id: ParamId) {
        let p = &self.params;
        match id {
            // Read per block by the render loop.
            ParamId::Bypass => {}
            ParamId::Envelope => self.voice.set_envelope_bypassed(!p.envelope),
            ParamId::Attack => self.voice.set_attack_time(ms_to_seconds(p.attack_ms)),
            ParamId::Decay => self.voice.set_decay_time(ms_to_seconds(p.decay_ms)),
            ParamId::Sustain => self.voice.set_sustain_level(db_to_amplitude(p.sustain_db)),
            ParamId::Release => self.voice.set_release_time(ms_to_seconds(p.release_ms)),
            ParamId::Cutoff => self.voice.set_cutoff(p.cutoff_hz),
            ParamId::Resonance => self.voice.set_resonance(p.resonance),
            ParamId::LfoRate => self.voice.set_lfo_frequency(p.lfo_rate_hz),
            ParamId::LfoDepth => self.voice.set_lfo_amplitude(p.lfo_depth_hz),
        }
    }

    /// Transport reset: restart phases, filter history and envelope clock.
    pub fn reset(&mut self) {
        log::debug!("reset");
        self.voice.reset();
    }

    /// Apply every message waiting on a control channel. Call at the top of a block.
    pub fn drain_controls<R: MessageReceiver>(&mut self, rx: &mut R) {
        while let Some(message) = rx.pop() {
            match message {
                ControlMessage::SetParameter { id, value } => {
                    self.params.set(id, value);
                    self.apply_parameter(id);
                }
                // The audio thread cannot report the overflow; count it for the host.
                ControlMessage::Midi(event) => {
                    if self.scheduler.enqueue(event).is_err() {
                        self.dropped_events += 1;
                    }
                }
                ControlMessage::Reset => self.voice.reset(),
            }
        }
    }

    fn handle_midi(&mut self, event: TimedMidi) {
        match MidiEvent::from_bytes(event.status, event.data1, event.data2) {
            Some(MidiEvent::NoteOn { key, .. }) => self.voice.note_on(key),
            Some(MidiEvent::NoteOff { key, .. }) => self.voice.note_off(key),
            Some(e) if e.is_all_notes_off() => self.voice.all_notes_off(),
            _ => {}
        }
    }

    /// Render one mono block, applying queued MIDI at its exact frame.
    pub fn render_mono(&mut self, out: &mut [f32]) {
        let frames = out.len() as u32;
        let bypassed = self.params.bypass;
        let mut offset = 0;

        while offset < frames {
            while let Some(event) = self.scheduler.pop_due(offset) {
                self.handle_midi(event);
            }

            let next = self.scheduler.next_offset(frames);
            let gate = self.voice.gate(bypassed);
            self.voice
                .process(&mut out[offset as usize..next as usize], gate);
            offset = next;
        }

        self.scheduler.flush(frames);
    }

    /// Render `frames` samples into every channel. Channel 0 is rendered,
    /// the others receive a copy.
    pub fn render(&mut self, outputs: &mut [&mut [f32]], frames: usize) {
        let Some((first, rest)) = outputs.split_first_mut() else {
            return;
        };

        let frames = frames.min(first.len());
        let mono = &mut first[..frames];
        self.render_mono(mono);

        for channel in rest.iter_mut() {
            let n = frames.min(channel.len());
            channel[..n].copy_from_slice(&mono[..n]);
        }
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }

    pub fn held_note(&self) -> Option<u8> {
        self.voice.held_note()
    }

    pub fn is_bypassed(&self) -> bool {
        self.params.bypass
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    /// MIDI events from [`MonoSynth::drain_controls`] lost to a full queue.
    /// Non-zero means the queue is sized below the traffic it receives.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }
}
