use crate::command::UiCommand;
use halo_core::{AnimationClock, EffectConfig, FrameInputs, RippleTrigger, StateMachine, UiState};

/// Single owner of every piece of mutable effect state.
///
/// Commands and ticks are applied synchronously. Renderers only ever see
/// the [`FrameInputs`] returned by [`Controller::snapshot`].
#[derive(Debug, Clone)]
pub struct Controller {
    machine: StateMachine,
    gradient_clock: AnimationClock,
    boundary_clock: AnimationClock,
    tick_seconds: f32,
    reset_clock_on_activate: bool,
    ticks: u64,
    ripple: RippleTrigger,
}

impl Controller {
    pub fn new(config: &EffectConfig) -> Self {
        let machine = StateMachine::new(config.states, config.transition);
        let params = machine.params_at(0.0);
        Self {
            machine,
            gradient_clock: AnimationClock::new(params.gradient_speed),
            boundary_clock: AnimationClock::new(params.rectangle_speed),
            tick_seconds: config.tick_seconds(),
            reset_clock_on_activate: config.reset_clock_on_activate,
            ticks: 0,
            ripple: RippleTrigger::default(),
        }
    }

    pub fn state(&self) -> UiState {
        self.machine.state()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Active time in seconds: ticks applied times the tick period.
    pub fn elapsed(&self) -> f32 {
        self.ticks as f32 * self.tick_seconds
    }

    pub fn gradient_clock(&self) -> &AnimationClock {
        &self.gradient_clock
    }

    pub fn boundary_clock(&self) -> &AnimationClock {
        &self.boundary_clock
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn handle(&mut self, command: UiCommand) {
        match command {
            UiCommand::Tap { origin } => self.ripple.fire(origin),
            other => {
                if let Some(state) = other.target_state() {
                    self.transition(state);
                }
            }
        }
    }

    fn transition(&mut self, to: UiState) {
        let now = self.elapsed();
        self.machine.transition(to, now);
        let params = self.machine.params_at(now);
        self.gradient_clock.set_rate(params.gradient_speed);
        self.boundary_clock.set_rate(params.rectangle_speed);
    }

    /// Advance both clocks by their current rates and active time by one
    /// tick period.
    pub fn tick(&mut self) {
        self.gradient_clock.tick();
        self.boundary_clock.tick();
        self.ticks += 1;
    }

    /// Called by the owning effect each time its timer starts.
    pub fn on_activate(&mut self) {
        if self.reset_clock_on_activate {
            self.gradient_clock.restart();
            self.boundary_clock.restart();
        }
    }

    pub fn snapshot(&self) -> FrameInputs {
        let elapsed = self.elapsed();
        FrameInputs {
            gradient_t: self.gradient_clock.t(),
            boundary_t: self.boundary_clock.t(),
            params: self.machine.params_at(elapsed),
            state: self.machine.state(),
            elapsed,
            ripple: self.ripple,
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(&EffectConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::{Point, StateTable};

    #[test]
    fn test_start_sets_thinking_rates() {
        let mut c = Controller::default();
        c.handle(UiCommand::Start);
        assert_eq!(c.state(), UiState::Thinking);
        assert_eq!(c.gradient_clock().rate(), 0.05);
        assert_eq!(c.boundary_clock().rate(), 0.06);
    }

    #[test]
    fn test_twenty_ticks_at_thinking_speed() {
        let mut c = Controller::default();
        c.handle(UiCommand::Start);
        for _ in 0..20 {
            c.tick();
        }
        assert!((c.snapshot().gradient_t - 1.0).abs() < 1e-5);
        assert!((c.elapsed() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_transition_eases_over_elapsed_time() {
        let mut c = Controller::default();
        c.handle(UiCommand::Start);
        let start = c.snapshot().params.container_opacity;
        for _ in 0..45 {
            c.tick();
        }
        let mid = c.snapshot().params.container_opacity;
        for _ in 0..60 {
            c.tick();
        }
        let end = c.snapshot().params;
        assert_eq!(start, 0.0);
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(end, StateTable::default().thinking);
    }

    #[test]
    fn test_tap_increments_ripple() {
        let mut c = Controller::default();
        c.handle(UiCommand::Tap { origin: Point::new(5.0, 6.0) });
        c.handle(UiCommand::Tap { origin: Point::new(7.0, 8.0) });
        let ripple = c.snapshot().ripple;
        assert_eq!(ripple.counter, 2);
        assert_eq!(ripple.origin, Point::new(7.0, 8.0));
        assert_eq!(c.state(), UiState::Idle);
    }

    #[test]
    fn test_reset_on_activate_is_opt_in() {
        let mut config = EffectConfig::default();
        let mut c = Controller::new(&config);
        c.tick();
        c.on_activate();
        assert!(c.gradient_clock().t() > 0.0);

        config.reset_clock_on_activate = true;
        let mut c = Controller::new(&config);
        c.tick();
        c.on_activate();
        assert_eq!(c.gradient_clock().t(), 0.0);
        assert_eq!(c.ticks(), 1);
    }
}
