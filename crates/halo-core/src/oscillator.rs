use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Map a sine wave onto `range`.
///
/// `value = midpoint + amplitude * sin(time_scale * t + offset)` where
/// `amplitude = (hi - lo) / 2` and `midpoint = (hi + lo) / 2`. All motion in
/// the effect derives from this function. The result is clamped to the range
/// to absorb last-ulp rounding at the extremes.
pub fn sin_in_range(range: RangeInclusive<f32>, offset: f32, time_scale: f32, t: f32) -> f32 {
    let (lo, hi) = (*range.start(), *range.end());
    let amplitude = (hi - lo) / 2.0;
    let midpoint = (hi + lo) / 2.0;
    let value = midpoint + amplitude * (time_scale * t + offset).sin();
    value.clamp(lo.min(hi), lo.max(hi))
}

/// A configured sine source: one `(range, offset, timeScale)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    pub lo: f32,
    pub hi: f32,
    pub offset: f32,
    pub time_scale: f32,
}

impl Oscillator {
    pub const fn new(lo: f32, hi: f32, offset: f32, time_scale: f32) -> Self {
        Self { lo, hi, offset, time_scale }
    }

    pub fn value_at(&self, t: f32) -> f32 {
        sin_in_range(self.lo..=self.hi, self.offset, self.time_scale, t)
    }

    /// Period in clock units. Infinite for a frozen oscillator.
    pub fn period(&self) -> f32 {
        if self.time_scale == 0.0 {
            f32::INFINITY
        } else {
            std::f32::consts::TAU / self.time_scale.abs()
        }
    }
}

/// Independent oscillators for the two axes of a moving control point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisOscillator {
    pub x: Oscillator,
    pub y: Oscillator,
}

impl AxisOscillator {
    pub const fn new(x: Oscillator, y: Oscillator) -> Self {
        Self { x, y }
    }

    pub fn value_at(&self, t: f32) -> crate::Point {
        crate::Point::new(self.x.value_at(t), self.y.value_at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_value_at_zero() {
        let v = sin_in_range(-0.8..=-0.2, 0.439, 0.342, 0.0);
        let expected = -0.5 + 0.3 * 0.439f32.sin();
        assert!((v - expected).abs() < 1e-6);
        assert!((v - (-0.3725)).abs() < 1e-3);
    }

    #[test]
    fn test_midpoint_when_sine_is_zero() {
        // time_scale * t + offset == 0
        let v = sin_in_range(0.2..=0.8, -1.0, 0.5, 2.0);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bounded_across_time() {
        let osc = Oscillator::new(1.0, 1.5, 0.939, 0.084);
        for i in 0..10_000 {
            let v = osc.value_at(i as f32 * 0.37);
            assert!((1.0..=1.5).contains(&v), "value {v} out of range");
        }
    }

    #[test]
    fn test_reversed_range_does_not_panic() {
        let v = sin_in_range(1.0..=0.0, 0.0, 1.0, 1.0);
        assert!((0.0..=1.0).contains(&v));
    }

    #[test]
    fn test_periodic() {
        let osc = Oscillator::new(0.3, 0.7, 3.42, 0.984);
        let period = osc.period();
        for i in 0..50 {
            let t = i as f32 * 0.61;
            assert!((osc.value_at(t) - osc.value_at(t + period)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_frozen_period_is_infinite() {
        let osc = Oscillator::new(0.0, 1.0, 0.0, 0.0);
        assert!(osc.period().is_infinite());
    }
}
