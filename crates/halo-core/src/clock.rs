use serde::{Deserialize, Serialize};

/// Monotonic animation time advanced by a fixed amount per scheduler tick.
///
/// `t` only moves forward: a non-positive or non-finite rate leaves it
/// where it is. [`AnimationClock::restart`] is the only way back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationClock {
    t: f32,
    rate: f32,
}

impl AnimationClock {
    pub fn new(rate: f32) -> Self {
        Self { t: 0.0, rate: sanitize_rate(rate) }
    }

    pub fn t(&self) -> f32 {
        self.t
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = sanitize_rate(rate);
    }

    /// Advance by one tick.
    pub fn tick(&mut self) {
        self.t += self.rate;
    }

    /// Advance by `n` ticks.
    pub fn tick_n(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn is_running(&self) -> bool {
        self.rate > 0.0
    }

    pub fn restart(&mut self) {
        self.t = 0.0;
    }
}

fn sanitize_rate(rate: f32) -> f32 {
    if rate.is_finite() && rate > 0.0 { rate } else { 0.0 }
}
