use std::f32::consts::PI;

use super::smoothing::SmoothedParam;

/*
Resonant Low-Pass (Bilinear-Transform Biquad)
=============================================

Two-pole/two-zero low-pass derived from the analog prototype

    H(s) = 1 / (s² + s/Q + 1)

through the bilinear transform. With w0 = 2π * cutoff / sample_rate:

    alpha = sin(w0) / (2Q)
    a0    = 1 + alpha

    b0 = (1 - cos w0) / 2 / a0
    b1 = (1 - cos w0)     / a0
    b2 = b0
    a1 = -2 cos w0        / a0
    a2 = (1 - alpha)      / a0

Direct Form I, one sample at a time:

    y[n] = b0 x[n] + b1 x[n-1] + b2 x[n-2] - a1 y[n-1] - a2 y[n-2]

Stability
---------

w0 is clamped to [0, 0.98π] before the trig. At w0 = π the two zeros and
the pole pair collide at Nyquist and the response degenerates, so the
cutoff never quite reaches it no matter what the host (or the LFO) asks.

Smoothing
---------

Cutoff and resonance are `SmoothedParam`s. While either is still moving
toward its target, every sample advances both by one step and recomputes
the five coefficients. Once both have settled, coefficients are left alone
and the per-sample cost is the five multiply-adds above.

A cutoff offset (the LFO) bypasses smoothing and costs one recompute per
modulated sample. The modulated set is left in place; the next plain
`process` call rebuilds the base set once before filtering.

Resonance is expected to arrive pre-validated (Q >= 0.5); it is only
floored at a tiny positive value so a stray zero cannot divide by zero.
*/

/// Upper bound on the normalised angular cutoff.
pub const MAX_OMEGA: f32 = 0.98 * PI;

const MIN_RESONANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPassCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl LowPassCoefficients {
    pub fn new(cutoff_hz: f32, resonance: f32, sample_rate: f32) -> Self {
        let w0 = (2.0 * PI * cutoff_hz / sample_rate).clamp(0.0, MAX_OMEGA);
        let q = resonance.max(MIN_RESONANCE);

        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);
        let a0 = 1.0 + alpha;
        let one_minus_cos = 1.0 - cos_w0;

        let b0 = 0.5 * one_minus_cos / a0;
        Self {
            b0,
            b1: one_minus_cos / a0,
            b2: b0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }
}

/// Two-sample input/output history for Direct Form I.
#[derive(Debug, Clone, Copy, Default)]
struct History {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

pub struct LowPassFilter {
    cutoff: SmoothedParam,
    resonance: SmoothedParam,
    sample_rate: f32,
    coefficients: LowPassCoefficients,
    // Coefficients hold a modulated set that `process` must replace.
    modulated: bool,
    history: History,
}

impl LowPassFilter {
    pub fn new(cutoff_hz: f32, resonance: f32, sample_rate: f32) -> Self {
        Self {
            cutoff: SmoothedParam::new(cutoff_hz, sample_rate),
            resonance: SmoothedParam::new(resonance, sample_rate),
            sample_rate,
            coefficients: LowPassCoefficients::new(cutoff_hz, resonance, sample_rate),
            modulated: false,
            history: History::default(),
        }
    }

    /// Set the cutoff target; the filter glides there over ~100 ms.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff.set_target(cutoff_hz);
    }

    /// Set the resonance (Q) target.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance.set_target(resonance);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff.set_sample_rate(sample_rate);
        self.resonance.set_sample_rate(sample_rate);
        self.recompute();
    }

    /// Clear the signal history. Targets and in-flight smoothing are kept.
    pub fn reset(&mut self) {
        self.history = History::default();
    }

    fn recompute(&mut self) {
        self.coefficients = LowPassCoefficients::new(
            self.cutoff.current(),
            self.resonance.current(),
            self.sample_rate,
        );
        self.modulated = false;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        // Non-short-circuiting so both parameters advance together.
        if (self.cutoff.step() | self.resonance.step()) || self.modulated {
            self.recompute();
        }

        self.process_with_current(input)
    }

    /// Process with a per-call cutoff offset added to the base target.
    ///
    /// The offset bypasses smoothing (it is itself a smooth control signal)
    /// so the coefficients are recomputed once for every sample it is non-zero.
    #[inline]
    pub fn process_modulated(&mut self, input: f32, cutoff_offset: f32) -> f32 {
        if cutoff_offset == 0.0 {
            return self.process(input);
        }

        self.cutoff.step();
        self.resonance.step();
        self.coefficients = LowPassCoefficients::new(
            self.cutoff.current() + cutoff_offset,
            self.resonance.current(),
            self.sample_rate,
        );
        self.modulated = true;

        self.process_with_current(input)
    }

    #[inline]
    fn process_with_current(&mut self, input: f32) -> f32 {
        let c = &self.coefficients;
        let h = &mut self.history;
        let output = c.b0 * input + c.b1 * h.x1 + c.b2 * h.x2 - c.a1 * h.y1 - c.a2 * h.y2;

        h.x2 = h.x1;
        h.x1 = input;
        h.y2 = h.y1;
        h.y1 = output;

        output
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// True while cutoff or resonance is still gliding toward its target.
    pub fn is_smoothing(&self) -> bool {
        !(self.cutoff.is_settled() && self.resonance.is_settled())
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff.current()
    }

    pub fn cutoff_target(&self) -> f32 {
        self.cutoff.target()
    }

    pub fn resonance(&self) -> f32 {
        self.resonance.current()
    }

    pub fn resonance_target(&self) -> f32 {
        self.resonance.target()
    }

    pub fn coefficients(&self) -> LowPassCoefficients {
        self.coefficients
    }
}
