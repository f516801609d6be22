//! Demo runner: owns the audio stream and feeds the engine over a control channel

use std::{thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SupportedBufferSize,
};

use monosynth::{
    synth::message::ControlHandle, EngineConfig, MonoSynth, ParamId, MAX_BLOCK_SIZE,
};

const CONTROL_CAPACITY: usize = 256;

/// One entry of the played phrase.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    /// Set a parameter in host units.
    Set(ParamId, f32),
    /// Hold a note for the given milliseconds.
    Note(u8, u64),
    /// Wait without sounding.
    Rest(u64),
}

pub struct Demo {
    config: EngineConfig,
    steps: Vec<Step>,
}

impl Demo {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            steps: Vec::new(),
        }
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn run(self) -> EyreResult<()> {
        // Set up audio
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        // Callbacks are rendered in chunks of at most MAX_BLOCK_SIZE frames.
        let block_size = match *config.buffer_size() {
            SupportedBufferSize::Range { max, .. } => (max as usize).clamp(1, MAX_BLOCK_SIZE),
            SupportedBufferSize::Unknown => MAX_BLOCK_SIZE,
        };

        log::info!("sample rate: {sample_rate} Hz, channels: {channels}, block: {block_size} frames");

        let mut synth = MonoSynth::new(EngineConfig {
            sample_rate,
            ..self.config
        })
        .wrap_err("failed to build engine")?;
        synth.set_block_size(block_size);
        // 50 ms count-in blip, scheduled ahead of the stream start.
        synth
            .enqueue_midi(0x90, 81, 100, 0)
            .and_then(|()| synth.enqueue_midi(0x80, 81, 0, (sample_rate * 0.05) as u32))
            .wrap_err("failed to queue count-in")?;

        let (mut control, mut rx) = ControlHandle::channel(CONTROL_CAPACITY);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                synth.drain_controls(&mut rx);

                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];
                    synth.render_mono(block);

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        let frame = out_off + i * channels;
                        data[frame..frame + channels].fill(s);
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )?;

        stream.play()?;

        for step in self.steps {
            match step {
                Step::Set(id, value) => {
                    log::info!("{} = {value}", id.spec().name);
                    control
                        .set_parameter(id, value)
                        .map_err(|_| eyre!("control channel full"))?;
                }
                Step::Note(note, millis) => {
                    control
                        .note_on(note, 100)
                        .map_err(|_| eyre!("control channel full"))?;
                    thread::sleep(Duration::from_millis(millis));
                    control
                        .note_off(note)
                        .map_err(|_| eyre!("control channel full"))?;
                }
                Step::Rest(millis) => thread::sleep(Duration::from_millis(millis)),
            }
        }

        Ok(())
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}
