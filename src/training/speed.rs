use std::time::Duration;

/// The position of the speed slider, `1..=100`, higher is faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(100);

    /// Creates a new `Speed`, clamping `value` into the slider's range.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Moves the slider by `delta` notches, staying within range.
    pub fn nudge(self, delta: i16) -> Self {
        let value = (self.0 as i16 + delta).clamp(Self::MIN.0 as i16, Self::MAX.0 as i16);
        Self(value as u8)
    }

    /// The pause between two training steps: `101 - speed` milliseconds.
    pub fn interval(self) -> Duration {
        Duration::from_millis(101 - self.0 as u64)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(50)
    }
}

/// Bounds of the learning rate slider.
pub const LEARNING_RATE_MIN: f64 = 0.01;
pub const LEARNING_RATE_MAX: f64 = 2.;

/// Clamps `lr` into the learning rate slider's range.
pub fn clamp_learning_rate(lr: f64) -> f64 {
    if lr.is_nan() {
        return LEARNING_RATE_MIN;
    }

    lr.clamp(LEARNING_RATE_MIN, LEARNING_RATE_MAX)
}
