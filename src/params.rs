//! Host-facing parameter table.
//!
//! Every automatable control of the instrument is described here once: its
//! range, unit, default and knob taper. Values cross this boundary in plain
//! units (ms, dB, Hz); [`ParamSpec`] maps them to and from the normalised
//! `[0, 1]` range hosts automate in.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParamError {
    #[error("unknown parameter id {0}")]
    UnknownId(u32),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Bypass,
    Envelope,
    Attack,
    Decay,
    Sustain,
    Release,
    Cutoff,
    Resonance,
    LfoRate,
    LfoDepth,
}

impl ParamId {
    pub const ALL: [ParamId; 10] = [
        ParamId::Bypass,
        ParamId::Envelope,
        ParamId::Attack,
        ParamId::Decay,
        ParamId::Sustain,
        ParamId::Release,
        ParamId::Cutoff,
        ParamId::Resonance,
        ParamId::LfoRate,
        ParamId::LfoDepth,
    ];

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn spec(self) -> &'static ParamSpec {
        &SPECS[self as usize]
    }
}

impl TryFrom<u32> for ParamId {
    type Error = ParamError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(ParamError::UnknownId(index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taper {
    Toggle,
    Linear,
    /// Logarithmic knob travel: equal knob distance is an equal ratio.
    Exponential,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub unit: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub taper: Taper,
}

impl ParamSpec {
    const fn toggle(name: &'static str, default: bool) -> Self {
        Self {
            name,
            unit: "",
            min: 0.0,
            max: 1.0,
            default: if default { 1.0 } else { 0.0 },
            taper: Taper::Toggle,
        }
    }

    const fn linear(name: &'static str, unit: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            unit,
            min,
            max,
            default,
            taper: Taper::Linear,
        }
    }

    const fn exponential(
        name: &'static str,
        unit: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            unit,
            min,
            max,
            default,
            taper: Taper::Exponential,
        }
    }

    /// Clamp a plain value into range. Non-finite input falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.default;
        }
        match self.taper {
            Taper::Toggle => {
                if value >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Taper::Linear | Taper::Exponential => value.clamp(self.min, self.max),
        }
    }

    pub fn to_normalized(&self, value: f32) -> f32 {
        let value = self.clamp(value);
        match self.taper {
            Taper::Toggle => value,
            Taper::Linear => (value - self.min) / (self.max - self.min),
            Taper::Exponential => (value / self.min).ln() / (self.max / self.min).ln(),
        }
    }

    pub fn from_normalized(&self, normalized: f32) -> f32 {
        let n = if normalized.is_finite() {
            normalized.clamp(0.0, 1.0)
        } else {
            return self.default;
        };
        let value = match self.taper {
            Taper::Toggle => n,
            Taper::Linear => self.min + n * (self.max - self.min),
            Taper::Exponential => self.min * (self.max / self.min).powf(n),
        };
        self.clamp(value)
    }
}

static SPECS: [ParamSpec; 10] = [
    ParamSpec::toggle("Bypass", false),
    ParamSpec::toggle("Envelope", false),
    ParamSpec::exponential("Attack", "ms", 1.0, 5000.0, 100.0),
    ParamSpec::exponential("Decay", "ms", 1.0, 5000.0, 200.0),
    ParamSpec::linear("Sustain", "dB", -72.0, 0.0, -6.0),
    ParamSpec::exponential("Release", "ms", 1.0, 5000.0, 300.0),
    ParamSpec::exponential("Cutoff", "Hz", 20.0, 20_000.0, 20_000.0),
    ParamSpec::linear("Resonance", "", 0.5, 4.0, 0.5),
    ParamSpec::exponential("LFO Rate", "Hz", 0.1, 10.0, 2.0),
    ParamSpec::linear("LFO Depth", "Hz", 0.0, 1000.0, 0.0),
];

/// Snapshot of every parameter in plain units.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub bypass: bool,
    pub envelope: bool,
    pub attack_ms: f32,
    pub decay_ms: f32,
    pub sustain_db: f32,
    pub release_ms: f32,
    pub cutoff_hz: f32,
    pub resonance: f32,
    pub lfo_rate_hz: f32,
    pub lfo_depth_hz: f32,
}

impl Parameters {
    pub fn get(&self, id: ParamId) -> f32 {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match id {
            ParamId::Bypass => flag(self.bypass),
            ParamId::Envelope => flag(self.envelope),
            ParamId::Attack => self.attack_ms,
            ParamId::Decay => self.decay_ms,
            ParamId::Sustain => self.sustain_db,
            ParamId::Release => self.release_ms,
            ParamId::Cutoff => self.cutoff_hz,
            ParamId::Resonance => self.resonance,
            ParamId::LfoRate => self.lfo_rate_hz,
            ParamId::LfoDepth => self.lfo_depth_hz,
        }
    }

    /// Store a clamped plain value and return what was stored.
    pub fn set(&mut self, id: ParamId, value: f32) -> f32 {
        let value = id.spec().clamp(value);
        match id {
            ParamId::Bypass => self.bypass = value >= 0.5,
            ParamId::Envelope => self.envelope = value >= 0.5,
            ParamId::Attack => self.attack_ms = value,
            ParamId::Decay => self.decay_ms = value,
            ParamId::Sustain => self.sustain_db = value,
            ParamId::Release => self.release_ms = value,
            ParamId::Cutoff => self.cutoff_hz = value,
            ParamId::Resonance => self.resonance = value,
            ParamId::LfoRate => self.lfo_rate_hz = value,
            ParamId::LfoDepth => self.lfo_depth_hz = value,
        }
        value
    }
}

impl Default for Parameters {
    fn default() -> Self {
        let d = |id: ParamId| id.spec().default;
        Self {
            bypass: d(ParamId::Bypass) >= 0.5,
            envelope: d(ParamId::Envelope) >= 0.5,
            attack_ms: d(ParamId::Attack),
            decay_ms: d(ParamId::Decay),
            sustain_db: d(ParamId::Sustain),
            release_ms: d(ParamId::Release),
            cutoff_hz: d(ParamId::Cutoff),
            resonance: d(ParamId::Resonance),
            lfo_rate_hz: d(ParamId::LfoRate),
            lfo_depth_hz: d(ParamId::LfoDepth),
        }
    }
}
