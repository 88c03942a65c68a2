//! Holds the single live [`LoopState`] of a task.

use ladle_core::state::LoopState;

/// Exactly one state, no history. Each `set` replaces the previous value
/// wholesale.
#[derive(Debug, Clone)]
pub struct StateTracker {
    current: LoopState,
}

impl StateTracker {
    /// Start from the task description.
    pub fn new(task_description: impl Into<String>) -> Self {
        Self {
            current: LoopState::initial(task_description),
        }
    }

    pub fn get(&self) -> &LoopState {
        &self.current
    }

    pub fn set(&mut self, state: LoopState) {
        self.current = state;
    }

    /// Whether the current state is the termination signal.
    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    pub fn into_inner(self) -> LoopState {
        self.current
    }
}
