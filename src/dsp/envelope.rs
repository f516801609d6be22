#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_TIME;

/*
ADSR Envelope as a Function of Time
===================================

Rather than a per-sample state machine, this envelope is a pure function of
"seconds since the last attack". The voice keeps that clock and asks for a
gain value at each sample:

    gain = envelope.gain(since_attack, since_release)

That makes retriggering trivial (reset the clock to zero) and lets the
voice evaluate any sample of a block independently.


The Shape
---------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲
    S   │   ╱    ╲___
        │  ╱         ‾‾‾───___
    0.0 └─╱───────────────────‾‾──→ Time
         A    D     exponential tail (time constant R)

    Δt < A            rise    Δt / A                      (0 → 1)
    A <= Δt < A + D   fall    1 → S, linear
    Δt >= A + D       tail    S * exp(-(Δt - A - D) / R)


Release Modes
-------------

Free (default)
    The tail starts as soon as attack + decay has elapsed, whether or not
    the key is still down. Sustain is the starting level of an immediate
    exponential release rather than a plateau. Note-off has no effect on
    the contour; the voice gate decides when sound stops.

Gated
    Conventional sustain: while the key is held the level sits at S. At
    note-off the voice starts a second clock, and the contour becomes

        level(Δt - Δr) * exp(-Δr / R)

    i.e. it freezes wherever it was when the key went up (mid-attack,
    mid-decay or sustain) and decays exponentially from there.


Bypass
------

A bypassed envelope always returns unity gain, turning the voice into a
plain gated oscillator.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseMode {
    #[default]
    Free,
    Gated,
}

#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,
    bypassed: bool,
    mode: ReleaseMode,
}

impl Envelope {
    pub fn new() -> Self {
        Self::adsr(0.1, 0.2, 0.5, 0.3)
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack_time: attack.max(MIN_TIME),
            decay_time: decay.max(MIN_TIME),
            sustain_level: sustain.max(0.0),
            release_time: release.max(MIN_TIME),
            bypassed: false,
            mode: ReleaseMode::Free,
        }
    }

    pub fn with_mode(mut self, mode: ReleaseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_attack_time(&mut self, seconds: f32) {
        self.attack_time = seconds.max(MIN_TIME);
    }

    pub fn set_decay_time(&mut self, seconds: f32) {
        self.decay_time = seconds.max(MIN_TIME);
    }

    /// Linear sustain amplitude. Values above 1 are allowed and overshoot the peak.
    pub fn set_sustain_level(&mut self, level: f32) {
        self.sustain_level = level.max(0.0);
    }

    pub fn set_release_time(&mut self, seconds: f32) {
        self.release_time = seconds.max(MIN_TIME);
    }

    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    pub fn set_mode(&mut self, mode: ReleaseMode) {
        self.mode = mode;
    }

    /// Contour level for a key that has not been released.
    pub fn level(&self, since_attack: f64) -> f32 {
        let dt = since_attack.max(0.0);
        let attack = self.attack_time as f64;
        let decay = self.decay_time as f64;
        let sustain = self.sustain_level as f64;

        let level = if dt < attack {
            dt / attack
        } else if dt < attack + decay {
            1.0 - (1.0 - sustain) * (dt - attack) / decay
        } else {
            match self.mode {
                ReleaseMode::Free => {
                    sustain * (-(dt - attack - decay) / self.release_time as f64).exp()
                }
                ReleaseMode::Gated => sustain,
            }
        };

        level as f32
    }

    /// Gain to apply at `since_attack` seconds after the last attack.
    ///
    /// `since_release` is the time since note-off, if the key is up. It only
    /// shapes the contour in [`ReleaseMode::Gated`].
    pub fn gain(&self, since_attack: f64, since_release: Option<f64>) -> f32 {
        if self.bypassed {
            return 1.0;
        }

        match (self.mode, since_release) {
            (ReleaseMode::Gated, Some(released)) => {
                let released = released.clamp(0.0, since_attack.max(0.0));
                let held = self.level(since_attack - released) as f64;
                (held * (-released / self.release_time as f64).exp()) as f32
            }
            _ => self.level(since_attack),
        }
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    pub fn mode(&self) -> ReleaseMode {
        self.mode
    }

    pub fn attack_time(&self) -> f32 {
        self.attack_time
    }

    pub fn decay_time(&self) -> f32 {
        self.decay_time
    }

    pub fn sustain_level(&self) -> f32 {
        self.sustain_level
    }

    pub fn release_time(&self) -> f32 {
        self.release_time
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
