use halo_core::{Point, RippleConfig, RippleTrigger};
use std::f32::consts::TAU;

/// A single decaying radial wave.
///
/// Displacement is sinusoidal in the distance from the moving wave front,
/// windowed around the front and damped exponentially with age.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub origin: Point,
    pub start_time: f32,
    pub config: RippleConfig,
}

impl Ripple {
    pub fn new(origin: Point, start_time: f32, config: RippleConfig) -> Self {
        Self { origin, start_time, config }
    }

    pub fn age(&self, now: f32) -> f32 {
        (now - self.start_time).max(0.0)
    }

    pub fn is_expired(&self, now: f32) -> bool {
        self.age(now) >= self.config.duration
    }

    /// Overall amplitude at `now`, falling to zero at the end of the ripple.
    pub fn strength(&self, now: f32) -> f32 {
        let age = self.age(now);
        if self.config.duration <= 0.0 || age >= self.config.duration {
            return 0.0;
        }
        let fade = 1.0 - age / self.config.duration;
        self.config.amplitude * (-self.config.decay * age).exp() * fade
    }

    /// Offset to add to `p` to find the pixel it should show.
    pub fn displacement(&self, p: Point, now: f32) -> Point {
        let strength = self.strength(now);
        if strength == 0.0 {
            return Point::ZERO;
        }
        let delta = p - self.origin;
        let distance = delta.magnitude();
        if distance <= f32::EPSILON {
            return Point::ZERO;
        }
        let front = self.config.speed * self.age(now);
        let phase = (distance - front) / self.config.wavelength;
        let window = (-phase * phase).exp();
        let magnitude = strength * window * (TAU * phase).sin();
        delta * (magnitude / distance)
    }
}

/// Starts a [`Ripple`] each time the trigger counter moves.
///
/// The counter is consumed exactly once; a trigger seen again is ignored.
#[derive(Debug, Clone)]
pub struct RipplePlayer {
    config: RippleConfig,
    consumed: u64,
    active: Option<Ripple>,
}

impl RipplePlayer {
    pub fn new(config: RippleConfig) -> Self {
        Self { config, consumed: 0, active: None }
    }

    /// Last trigger counter that started a ripple.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Mark every tap up to `trigger` as played without starting a ripple.
    pub fn sync(&mut self, trigger: &RippleTrigger) {
        self.consumed = trigger.counter;
        self.active = None;
    }

    /// Consume `trigger` and return the ripple to apply at `now`, if any.
    pub fn update(&mut self, trigger: &RippleTrigger, now: f32) -> Option<Ripple> {
        if trigger.counter != self.consumed {
            self.consumed = trigger.counter;
            log::debug!(
                "ripple #{} at ({:.1}, {:.1})",
                trigger.counter,
                trigger.origin.x,
                trigger.origin.y
            );
            self.active = Some(Ripple::new(trigger.origin, now, self.config));
        }
        if self.active.is_some_and(|r| r.is_expired(now)) {
            self.active = None;
        }
        self.active
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }
}

impl Default for RipplePlayer {
    fn default() -> Self {
        Self::new(RippleConfig::default())
    }
}
