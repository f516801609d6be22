/// Time for a smoothed parameter to settle on a new target.
pub const SETTLE_TIME: f32 = 0.1;

/// Gap below which `current` snaps onto `target`.
const SNAP_EPSILON: f32 = 1e-6;

/// One-pole exponential approach toward a target value.
///
/// A control context writes `target`; the render thread calls [`step`]
/// once per sample and is the only owner of `current`. Each step moves
/// `current` a fixed fraction of the remaining distance, so it approaches
/// the target monotonically and never overshoots.
///
/// [`step`]: SmoothedParam::step
#[derive(Debug, Clone, Copy)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    factor: f32,
}

impl SmoothedParam {
    pub fn new(value: f32, sample_rate: f32) -> Self {
        Self {
            current: value,
            target: value,
            factor: smoothing_factor(sample_rate),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.factor = smoothing_factor(sample_rate);
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to `value`, skipping the ramp.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Advance one sample. Returns `true` if `current` moved.
    #[inline]
    pub fn step(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }

        let gap = self.target - self.current;
        let next = self.current + gap * self.factor;

        // Once the step vanishes below float resolution we would stall short of the target.
        if next == self.current || gap.abs() <= SNAP_EPSILON * self.target.abs().max(1.0) {
            self.current = self.target;
        } else {
            self.current = next;
        }
        true
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }
}

/// Per-sample coefficient that closes ~99% of the gap in [`SETTLE_TIME`].
///
/// Five time constants fit into the settle window.
pub fn smoothing_factor(sample_rate: f32) -> f32 {
    let tau_samples = (SETTLE_TIME / 5.0) * sample_rate.max(1.0);
    if tau_samples <= 1.0 {
        1.0
    } else {
        1.0 - (-1.0 / tau_samples).exp()
    }
}
