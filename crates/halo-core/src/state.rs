use crate::easing::{Easing, Tween};
use serde::{Deserialize, Serialize};

/// UI state of the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UiState {
    #[default]
    Idle,
    Thinking,
    Answered,
}

impl UiState {
    pub const ALL: [UiState; 3] = [UiState::Idle, UiState::Thinking, UiState::Answered];

    pub fn name(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Thinking => "thinking",
            UiState::Answered => "answered",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for UiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Every animation parameter derived from a [`UiState`].
///
/// The two speeds are discrete and switch immediately on a transition; the
/// remaining four are continuous and ease towards their new targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateParams {
    /// Boundary clock advance per tick.
    pub rectangle_speed: f32,
    /// Gradient clock advance per tick.
    pub gradient_speed: f32,
    pub mask_blur_radius: f32,
    pub container_opacity: f32,
    pub rectangle_scale: f32,
    pub corner_padding: f32,
}

impl StateParams {
    pub fn is_finite(&self) -> bool {
        [
            self.rectangle_speed,
            self.gradient_speed,
            self.mask_blur_radius,
            self.container_opacity,
            self.rectangle_scale,
            self.corner_padding,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Parameter targets for each state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateTable {
    pub idle: StateParams,
    pub thinking: StateParams,
    pub answered: StateParams,
}

impl StateTable {
    pub fn get(&self, state: UiState) -> &StateParams {
        match state {
            UiState::Idle => &self.idle,
            UiState::Thinking => &self.thinking,
            UiState::Answered => &self.answered,
        }
    }
}

impl Default for StateTable {
    fn default() -> Self {
        Self {
            // Outline pushed past the surface edge, glow hidden.
            idle: StateParams {
                rectangle_speed: 0.01,
                gradient_speed: 0.01,
                mask_blur_radius: 28.0,
                container_opacity: 0.0,
                rectangle_scale: 1.15,
                corner_padding: 0.0,
            },
            thinking: StateParams {
                rectangle_speed: 0.06,
                gradient_speed: 0.05,
                mask_blur_radius: 16.0,
                container_opacity: 1.0,
                rectangle_scale: 1.0,
                corner_padding: 16.0,
            },
            answered: StateParams {
                rectangle_speed: 0.03,
                gradient_speed: 0.02,
                mask_blur_radius: 24.0,
                container_opacity: 0.6,
                rectangle_scale: 1.0,
                corner_padding: 24.0,
            },
        }
    }
}

/// How continuous parameters move between states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Seconds of active time.
    pub duration: f32,
    pub easing: Easing,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self { duration: 0.9, easing: Easing::EaseInOut }
    }
}

#[derive(Debug, Clone, Copy)]
struct ContinuousTweens {
    mask_blur_radius: Tween,
    container_opacity: Tween,
    rectangle_scale: Tween,
    corner_padding: Tween,
}

impl ContinuousTweens {
    fn settled(params: &StateParams) -> Self {
        Self {
            mask_blur_radius: Tween::constant(params.mask_blur_radius),
            container_opacity: Tween::constant(params.container_opacity),
            rectangle_scale: Tween::constant(params.rectangle_scale),
            corner_padding: Tween::constant(params.corner_padding),
        }
    }

    fn all(&self) -> [&Tween; 4] {
        [
            &self.mask_blur_radius,
            &self.container_opacity,
            &self.rectangle_scale,
            &self.corner_padding,
        ]
    }
}

/// Finite state machine that owns every derived animation parameter.
///
/// Transitions are user-driven, total and synchronous. `now` is the
/// effect's active time in seconds.
#[derive(Debug, Clone)]
pub struct StateMachine {
    table: StateTable,
    transition: TransitionConfig,
    state: UiState,
    rectangle_speed: f32,
    gradient_speed: f32,
    tweens: ContinuousTweens,
    transitions: u64,
}

impl StateMachine {
    pub fn new(table: StateTable, transition: TransitionConfig) -> Self {
        let initial = *table.get(UiState::Idle);
        Self {
            table,
            transition,
            state: UiState::Idle,
            rectangle_speed: initial.rectangle_speed,
            gradient_speed: initial.gradient_speed,
            tweens: ContinuousTweens::settled(&initial),
            transitions: 0,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn table(&self) -> &StateTable {
        &self.table
    }

    /// Number of transitions applied so far, including same-state ones.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Move to `to`. Re-entering the current state re-applies its targets.
    pub fn transition(&mut self, to: UiState, now: f32) {
        let target = *self.table.get(to);
        let TransitionConfig { duration, easing } = self.transition;

        self.rectangle_speed = target.rectangle_speed;
        self.gradient_speed = target.gradient_speed;

        let tw = &mut self.tweens;
        tw.mask_blur_radius = tw.mask_blur_radius.retarget(target.mask_blur_radius, now, duration, easing);
        tw.container_opacity = tw.container_opacity.retarget(target.container_opacity, now, duration, easing);
        tw.rectangle_scale = tw.rectangle_scale.retarget(target.rectangle_scale, now, duration, easing);
        tw.corner_padding = tw.corner_padding.retarget(target.corner_padding, now, duration, easing);

        log::debug!("state {} -> {} at {:.3}s", self.state, to, now);
        self.state = to;
        self.transitions += 1;
    }

    /// Current parameters with the continuous ones interpolated at `now`.
    pub fn params_at(&self, now: f32) -> StateParams {
        StateParams {
            rectangle_speed: self.rectangle_speed,
            gradient_speed: self.gradient_speed,
            mask_blur_radius: self.tweens.mask_blur_radius.value_at(now),
            container_opacity: self.tweens.container_opacity.value_at(now),
            rectangle_scale: self.tweens.rectangle_scale.value_at(now),
            corner_padding: self.tweens.corner_padding.value_at(now),
        }
    }

    /// True once every continuous parameter has reached its target.
    pub fn is_settled(&self, now: f32) -> bool {
        self.tweens.all().iter().all(|tw| tw.is_complete(now))
    }
}
