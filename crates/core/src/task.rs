//! Task tracking types: status, step records, cancellation.
//!
//! The orchestrator owns a [`Task`] for the duration of one run. Everything
//! it learns per step is published outward as a [`StepRecord`]; nothing here
//! is persisted.

use crate::capability::ActionRequest;
use crate::state::LoopState;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Unique identifier for a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a task. Everything except `Running` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Running,
    Succeeded,
    Failed,
    /// The step budget ran out before the termination signal appeared.
    StepExhausted,
    Canceled,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Whether the caller should treat this outcome as a success.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::StepExhausted => "STEP_EXHAUSTED",
            Self::Canceled => "CANCELED",
        };
        f.write_str(s)
    }
}

/// A single natural-language goal and where it stands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub status: TaskStatus,
    /// Human-readable cause when the task did not succeed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Selection→execution cycles started so far
    pub steps: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_id(TaskId::new(), description)
    }

    /// A task whose id was handed out earlier, e.g. to name its download
    /// directory before the run starts.
    pub fn with_id(id: TaskId, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            description: description.into(),
            status: TaskStatus::Running,
            error: None,
            steps: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to a terminal status, recording the cause if there is one.
    pub fn finish(&mut self, status: TaskStatus, error: Option<String>) {
        self.status = status;
        self.error = error;
        self.updated_at = Utc::now();
    }
}

/// How a step ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepResult {
    Output { value: serde_json::Value },
    Error { message: String },
}

/// Everything that happened in one iteration, for observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based iteration index
    pub step: u32,
    /// What the model asked for (absent if selection itself failed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ActionRequest>,
    pub result: StepResult,
    /// The loop state after this step
    pub state: LoopState,
    pub duration_ms: u64,
}

/// The final word on a run.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task: Task,
    pub final_state: LoopState,
    /// The last state a capability produced before the termination signal.
    /// For a conversion this is the converted amount, for a recipe search
    /// the card URL.
    pub answer: Option<LoopState>,
}

impl TaskOutcome {
    pub fn status(&self) -> TaskStatus {
        self.task.status
    }

    pub fn steps(&self) -> u32 {
        self.task.steps
    }
}

/// Queried by the orchestrator between iterations.
#[async_trait]
pub trait CancellationSource: Send + Sync {
    async fn is_cancel_requested(&self, task: &TaskId) -> bool;
}

/// Never asks to stop.
pub struct NeverCancel;

#[async_trait]
impl CancellationSource for NeverCancel {
    async fn is_cancel_requested(&self, _task: &TaskId) -> bool {
        false
    }
}

/// A shared flag that any holder can raise (e.g., a Ctrl-C handler).
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CancellationSource for CancelFlag {
    async fn is_cancel_requested(&self, _task: &TaskId) -> bool {
        self.is_set()
    }
}
