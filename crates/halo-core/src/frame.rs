use crate::point::Point;
use crate::state::{StateParams, StateTable, UiState};
use serde::{Deserialize, Serialize};

/// Request for a one-shot ripple.
///
/// The counter only ever increases; a player starts a new ripple whenever it
/// sees a value it has not consumed yet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RippleTrigger {
    pub origin: Point,
    pub counter: u64,
}

impl RippleTrigger {
    /// Record a tap at `origin`.
    pub fn fire(&mut self, origin: Point) {
        self.origin = origin;
        self.counter = self.counter.wrapping_add(1);
    }
}

/// Everything a renderer needs to draw one frame.
///
/// Taken under the controller lock and then read without it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInputs {
    /// Gradient clock value.
    pub gradient_t: f32,
    /// Boundary clock value.
    pub boundary_t: f32,
    pub params: StateParams,
    pub state: UiState,
    /// Seconds of active time.
    pub elapsed: f32,
    pub ripple: RippleTrigger,
}

impl Default for FrameInputs {
    fn default() -> Self {
        Self {
            gradient_t: 0.0,
            boundary_t: 0.0,
            params: StateTable::default().idle,
            state: UiState::Idle,
            elapsed: 0.0,
            ripple: RippleTrigger::default(),
        }
    }
}
