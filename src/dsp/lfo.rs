//! Low Frequency Oscillator used as a cutoff modulator.

use std::f32::consts::TAU;

use super::oscillator::Phase;

/*
Low Frequency Oscillators
=========================

An LFO runs the same phase accumulator as the audio oscillator but at
control rate (~0.1 Hz to ~10 Hz). At those rates the sine has no energy
anywhere near Nyquist, so no band-limiting is needed.

Output is bipolar and already scaled into the unit of the parameter it
modulates:

    lfo(n) = amplitude * sin(2π * phase(n))

For cutoff modulation `amplitude` is in Hz, and the voice adds the LFO
sample to the filter's base cutoff before every filter call:

    cutoff(n) = base_cutoff + lfo(n)

With base = 1000 Hz and depth = 300 Hz the cutoff sweeps 700 Hz - 1300 Hz.
Anything that ends up outside the filter's stable range is clamped by the
filter itself.
*/

pub struct Lfo {
    phase: Phase,
    frequency: f32,
    amplitude: f32,
    sample_rate: f32,
}

impl Lfo {
    pub fn new(sample_rate: f32, frequency: f32, amplitude: f32) -> Self {
        let mut lfo = Self {
            phase: Phase::new(),
            frequency,
            amplitude,
            sample_rate,
        };
        lfo.phase.set_increment(frequency, sample_rate);
        lfo
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.phase.set_increment(self.frequency, self.sample_rate);
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.phase.set_increment(self.frequency, self.sample_rate);
    }

    pub fn reset(&mut self) {
        self.phase.reset();
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = self.amplitude * (TAU * self.phase.value()).sin();
        self.phase.advance();
        sample
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
}
