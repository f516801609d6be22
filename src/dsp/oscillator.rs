use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Band-Limited Oscillator
=======================

A naive sawtooth is just the phase ramp rescaled to [-1, 1]:

    saw(phase) = 2 * phase - 1

The snap from +1 back to -1 at the end of every cycle is an infinitely
sharp edge. Sampling it folds every harmonic above Nyquist back into the
audible band (aliasing), which is heard as inharmonic whine on high notes.

PolyBLEP
--------

Instead of filtering after the fact, we patch the two samples around each
discontinuity with a small quadratic polynomial (a "band-limited step"
residual). With `dt` the phase increment per sample:

    start of cycle (phase < dt):       t = phase / dt
                                       blep = 2t - t² - 1

    end of cycle (phase > 1 - dt):     t = (phase - 1) / dt
                                       blep = t² + 2t + 1

    saw = 2 * phase - 1 - blep

The correction is zero everywhere else, so the cost is one comparison per
sample plus a few multiplies near the edge.

Phase
-----

Phase lives in [0, 1). After each sample it advances by
`frequency / sample_rate` and wraps by subtracting its integer part, so
even an increment larger than one cycle lands back in range.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
}

/// Normalised phase accumulator shared by the audio oscillator and the LFO.
#[derive(Debug, Clone, Copy)]
pub struct Phase {
    phase: f32,
    increment: f32,
}

impl Phase {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            increment: 0.0,
        }
    }

    pub fn set_increment(&mut self, frequency: f32, sample_rate: f32) {
        self.increment = frequency.max(0.0) / sample_rate;
    }

    #[inline]
    pub fn advance(&mut self) {
        self.phase += self.increment;
        self.phase -= self.phase.floor();
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.phase
    }

    #[inline]
    pub fn increment(&self) -> f32 {
        self.increment
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::new()
    }
}

/// Quadratic band-limited step residual around the wrap point.
#[inline]
pub fn poly_blep(phase: f32, dt: f32) -> f32 {
    if phase < dt {
        let t = phase / dt;
        t + t - t * t - 1.0
    } else if phase > 1.0 - dt {
        let t = (phase - 1.0) / dt;
        t * t + t + t + 1.0
    } else {
        0.0
    }
}

pub struct Oscillator {
    waveform: Waveform,
    phase: Phase,
    frequency: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, sample_rate: f32) -> Self {
        let mut osc = Self {
            waveform,
            phase: Phase::new(),
            frequency: 440.0,
            sample_rate,
        };
        osc.update_increment();
        osc
    }

    pub fn sine(sample_rate: f32) -> Self {
        Self::new(Waveform::Sine, sample_rate)
    }

    pub fn sawtooth(sample_rate: f32) -> Self {
        Self::new(Waveform::Saw, sample_rate)
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.update_increment();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    fn update_increment(&mut self) {
        self.phase.set_increment(self.frequency, self.sample_rate);
    }

    pub fn reset(&mut self) {
        self.phase.reset();
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let phase = self.phase.value();

        let sample = match self.waveform {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Saw => 2.0 * phase - 1.0 - poly_blep(phase, self.phase.increment()),
        };

        self.phase.advance();
        sample
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn phase(&self) -> f32 {
        self.phase.value()
    }
}
