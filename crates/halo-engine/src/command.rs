use halo_core::{Point, UiState};

/// Commands from the UI surface to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiCommand {
    /// Begin listening: move to `Thinking`.
    Start,
    /// Return to `Idle`.
    Stop,
    /// Show the answer: move to `Answered`.
    Answer,
    /// Move to an explicit state.
    SetState(UiState),
    /// A press at `origin` in surface pixels. Starts a ripple.
    Tap { origin: Point },
}

impl UiCommand {
    /// The state this command moves to, if it is a transition.
    pub fn target_state(&self) -> Option<UiState> {
        match *self {
            UiCommand::Start => Some(UiState::Thinking),
            UiCommand::Stop => Some(UiState::Idle),
            UiCommand::Answer => Some(UiState::Answered),
            UiCommand::SetState(state) => Some(state),
            UiCommand::Tap { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_states() {
        assert_eq!(UiCommand::Start.target_state(), Some(UiState::Thinking));
        assert_eq!(UiCommand::Stop.target_state(), Some(UiState::Idle));
        assert_eq!(UiCommand::Answer.target_state(), Some(UiState::Answered));
        assert_eq!(UiCommand::SetState(UiState::Idle).target_state(), Some(UiState::Idle));
        assert_eq!(UiCommand::Tap { origin: Point::ZERO }.target_state(), None);
    }
}
