//! Loop state: the single value threaded between agent iterations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The distinguished capability output that means "no further action needed".
pub const TERMINATION_SIGNAL: &str = "Task Complete";

/// What the agent currently has in hand.
///
/// Starts as the task description and is fully replaced by each
/// capability's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum LoopState {
    /// Plain text: the task description, an identifier, a URL, an answer.
    Text(String),
    /// A structured mapping (or any other non-scalar JSON value).
    Structured(Value),
    /// The termination signal.
    Complete,
}

impl LoopState {
    /// Initial state for a task.
    pub fn initial(task_description: impl Into<String>) -> Self {
        Self::Text(task_description.into())
    }

    /// Normalise a capability's raw output into a state.
    ///
    /// Numbers become text so identifiers read the same whichever way the
    /// upstream API encodes them. A string equal to [`TERMINATION_SIGNAL`]
    /// becomes [`LoopState::Complete`].
    pub fn from_output(value: Value) -> Self {
        match value {
            Value::String(s) if s == TERMINATION_SIGNAL => Self::Complete,
            Value::String(s) => Self::Text(s),
            Value::Number(n) => Self::Text(n.to_string()),
            other => Self::Structured(other),
        }
    }

    /// Whether this state is the termination signal, compared by value.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Complete => true,
            Self::Text(s) => s == TERMINATION_SIGNAL,
            Self::Structured(v) => v.as_str() == Some(TERMINATION_SIGNAL),
        }
    }

    /// The state as a JSON value (the sentinel is rendered as its string).
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Structured(v) => v.clone(),
            Self::Complete => Value::String(TERMINATION_SIGNAL.into()),
        }
    }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Structured(v) => write!(f, "{v}"),
            Self::Complete => f.write_str(TERMINATION_SIGNAL),
        }
    }
}
