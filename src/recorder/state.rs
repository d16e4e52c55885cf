#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderAction {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecorderStateError {
    #[error("cannot {action:?} while {from:?}")]
    InvalidTransition {
        from: SessionState,
        action: RecorderAction,
    },
}

#[derive(Debug)]
pub struct RecorderState {
    state: SessionState,
}

impl Default for RecorderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderState {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    fn transition(
        &mut self,
        allowed: &[SessionState],
        to: SessionState,
        action: RecorderAction,
    ) -> Result<(), RecorderStateError> {
        if allowed.contains(&self.state) {
            self.state = to;
            Ok(())
        } else {
            Err(RecorderStateError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    pub fn start(&mut self) -> Result<(), RecorderStateError> {
        self.transition(
            &[SessionState::Idle],
            SessionState::Recording,
            RecorderAction::Start,
        )
    }

    pub fn stop(&mut self) -> Result<(), RecorderStateError> {
        self.transition(
            &[SessionState::Recording],
            SessionState::Idle,
            RecorderAction::Stop,
        )
    }
}
