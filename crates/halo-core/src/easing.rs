use serde::{Deserialize, Serialize};

/// Time-remapping curve applied to a normalized progress in `[0, 1]`.
///
/// The named bezier variants use the CSS timing-function control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Half-cosine ramp.
    Sine,
    /// Quarter-sine ramp, fast start.
    Welch,
    /// Jump to the target as soon as progress is positive.
    Step,
    /// Custom cubic bezier with control points `(x1, y1)` and `(x2, y2)`.
    CubicBezier(f32, f32, f32, f32),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::EaseInOut
    }
}

impl Easing {
    /// Remap `progress`. Input is clamped to `[0, 1]`; endpoints map to themselves.
    pub fn apply(&self, progress: f32) -> f32 {
        let p = if progress.is_nan() { 1.0 } else { progress.clamp(0.0, 1.0) };
        match *self {
            Easing::Linear => p,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, p),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, p),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, p),
            Easing::Sine => 0.5 - 0.5 * (p * std::f32::consts::PI).cos(),
            Easing::Welch => (p * std::f32::consts::FRAC_PI_2).sin(),
            Easing::Step => {
                if p > 0.0 { 1.0 } else { 0.0 }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, p),
        }
    }
}

/// Evaluate a unit cubic bezier timing function at `x`.
///
/// Solves `bx(s) = x` with Newton iterations, falling back to bisection when
/// the slope flattens, then returns `by(s)`.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);

    let bezier = |a: f32, b: f32, s: f32| {
        let ms = 1.0 - s;
        3.0 * ms * ms * s * a + 3.0 * ms * s * s * b + s * s * s
    };
    let slope = |a: f32, b: f32, s: f32| {
        let ms = 1.0 - s;
        3.0 * ms * ms * a + 6.0 * ms * s * (b - a) + 3.0 * s * s * (1.0 - b)
    };

    let mut s = x;
    for _ in 0..8 {
        let err = bezier(x1, x2, s) - x;
        if err.abs() < 1e-6 {
            return bezier(y1, y2, s);
        }
        let d = slope(x1, x2, s);
        if d.abs() < 1e-6 {
            break;
        }
        s = (s - err / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = x;
    for _ in 0..32 {
        let v = bezier(x1, x2, s);
        if (v - x).abs() < 1e-6 {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    bezier(y1, y2, s)
}

/// One in-flight interpolation of a continuous parameter.
///
/// A new transition replaces the record; the replacement starts from
/// whatever value the old record produced at that instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start_time: f32,
    pub duration: f32,
    pub easing: Easing,
}

impl Tween {
    /// A settled tween that always reports `value`.
    pub fn constant(value: f32) -> Self {
        Self { from: value, to: value, start_time: 0.0, duration: 0.0, easing: Easing::Linear }
    }

    pub fn new(from: f32, to: f32, start_time: f32, duration: f32, easing: Easing) -> Self {
        Self { from, to, start_time, duration, easing }
    }

    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let p = (now - self.start_time) / self.duration;
        if p.is_finite() { p.clamp(0.0, 1.0) } else { 1.0 }
    }

    pub fn value_at(&self, now: f32) -> f32 {
        let eased = self.easing.apply(self.progress(now));
        if eased >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * eased
    }

    pub fn is_complete(&self, now: f32) -> bool {
        self.progress(now) >= 1.0
    }

    /// Start a new tween towards `to` from the value this one has at `now`.
    pub fn retarget(&self, to: f32, now: f32, duration: f32, easing: Easing) -> Self {
        Self::new(self.value_at(now), to, now, duration, easing)
    }
}
