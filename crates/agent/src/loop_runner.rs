//! The agent loop: select, execute, update, repeat.

use crate::executor::CapabilityExecutor;
use crate::retry::RetryPolicy;
use crate::selector::ActionSelector;
use crate::state::StateTracker;
use chrono::Utc;
use ladle_core::agent::AgentConfig;
use ladle_core::capability::{ActionRequest, CapabilityRegistry};
use ladle_core::event::{DomainEvent, EventBus};
use ladle_core::provider::Provider;
use ladle_core::state::LoopState;
use ladle_core::task::{
    CancellationSource, NeverCancel, StepRecord, StepResult, Task, TaskOutcome, TaskStatus,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Drives one task from its description to a terminal status.
///
/// Each iteration asks the [`ActionSelector`] for an action, dispatches it
/// through the [`CapabilityExecutor`] and replaces the loop state with the
/// result. The loop ends when the state equals the termination signal, on
/// the first failure, when the step budget is spent, or when cancellation
/// is requested at an iteration boundary.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    executor: CapabilityExecutor,

    /// Maximum selection→execution cycles per task
    max_steps: u32,

    /// Pause between iterations
    cooldown: Duration,

    /// Retry around the model call
    retry: RetryPolicy,

    /// Event bus for domain events
    event_bus: Arc<EventBus>,

    cancellation: Arc<dyn CancellationSource>,
}

impl AgentLoop {
    /// Create a new agent loop with the default budget and cooldown.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        registry: Arc<CapabilityRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let defaults = AgentConfig::default();
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            executor: CapabilityExecutor::new(registry),
            max_steps: defaults.max_steps,
            cooldown: defaults.step_cooldown(),
            retry: RetryPolicy::from_config(&defaults),
            event_bus,
            cancellation: Arc::new(NeverCancel),
        }
    }

    /// Apply budget, cooldown and retry settings from config.
    pub fn with_config(self, config: &AgentConfig) -> Self {
        self.with_max_steps(config.max_steps)
            .with_cooldown(config.step_cooldown())
            .with_retry(RetryPolicy::from_config(config))
    }

    /// Set the step budget.
    pub fn with_max_steps(mut self, max: u32) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Where to look for cancellation requests between iterations.
    pub fn with_cancellation(mut self, source: Arc<dyn CancellationSource>) -> Self {
        self.cancellation = source;
        self
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Run a task to completion. Never fails: every failure ends the task
    /// as [`TaskStatus::Failed`] with a human-readable cause.
    pub async fn run(&self, description: impl Into<String>) -> TaskOutcome {
        self.run_task(Task::new(description)).await
    }

    /// Run a task created by the caller, keeping its id.
    pub async fn run_task(&self, mut task: Task) -> TaskOutcome {
        let task_id = task.id.to_string();

        info!(task_id = %task_id, max_steps = self.max_steps, "Starting task");
        self.event_bus.publish(DomainEvent::TaskStarted {
            task_id: task_id.clone(),
            description: task.description.clone(),
            max_steps: self.max_steps,
            timestamp: Utc::now(),
        });

        let mut selector = ActionSelector::new(
            self.provider.clone(),
            self.model.clone(),
            &self.executor.registry().schema(),
        )
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens)
        .with_retry(self.retry.clone())
        .with_events(self.event_bus.clone(), task_id.clone());
        let mut state = StateTracker::new(task.description.clone());
        let mut answer = None;

        let (status, error) = loop {
            if task.steps >= self.max_steps {
                let cause = format!(
                    "step budget of {} exhausted before the task completed",
                    self.max_steps
                );
                break (TaskStatus::StepExhausted, Some(cause));
            }
            if self.cancellation.is_cancel_requested(&task.id).await {
                let cause = format!("canceled after {} step(s)", task.steps);
                break (TaskStatus::Canceled, Some(cause));
            }

            task.steps += 1;
            let step = task.steps;
            debug!(task_id = %task_id, step, "Agent loop iteration");

            if let Err(cause) = self.step(&mut selector, &mut state, &task_id, step).await {
                break (TaskStatus::Failed, Some(cause));
            }
            if state.is_terminal() {
                break (TaskStatus::Succeeded, None);
            }
            answer = Some(state.get().clone());

            if step < self.max_steps && !self.cooldown.is_zero() {
                tokio::time::sleep(self.cooldown).await;
            }
        };

        task.finish(status, error);
        match task.status {
            TaskStatus::Succeeded => info!(task_id = %task_id, steps = task.steps, "Task succeeded"),
            TaskStatus::Failed => warn!(
                task_id = %task_id,
                steps = task.steps,
                error = task.error.as_deref().unwrap_or_default(),
                "Task failed"
            ),
            status => warn!(
                task_id = %task_id,
                steps = task.steps,
                %status,
                cause = task.error.as_deref().unwrap_or_default(),
                "Task stopped"
            ),
        }
        self.event_bus.publish(DomainEvent::TaskFinished {
            task_id,
            status: task.status,
            steps: task.steps,
            error: task.error.clone(),
            timestamp: Utc::now(),
        });

        TaskOutcome {
            task,
            final_state: state.into_inner(),
            answer,
        }
    }

    /// One select → resolve → execute → update cycle. On failure the loop
    /// state is left as it was and the cause is returned.
    async fn step(
        &self,
        selector: &mut ActionSelector,
        state: &mut StateTracker,
        task_id: &str,
        step: u32,
    ) -> Result<(), String> {
        let start = Instant::now();

        let request = match selector.select(state.get()).await {
            Ok(request) => request,
            Err(e) => return Err(self.fail(task_id, step, None, state.get(), start, e.to_string())),
        };

        info!(
            task_id = %task_id,
            step,
            capability = %request.name,
            "Action selected"
        );
        self.event_bus.publish(DomainEvent::ActionSelected {
            task_id: task_id.to_string(),
            step,
            capability: request.name.clone(),
            parameters: Value::Object(request.parameters.clone()),
            timestamp: Utc::now(),
        });

        let result = match self.executor.resolve(&request) {
            Ok(capability) => self.executor.execute(capability, &request).await,
            Err(e) => Err(e),
        };
        let value = match result {
            Ok(value) => value,
            Err(e) => {
                return Err(self.fail(task_id, step, Some(request), state.get(), start, e.to_string()));
            }
        };

        state.set(LoopState::from_output(value.clone()));
        let record = StepRecord {
            step,
            request: Some(request),
            result: StepResult::Output { value },
            state: state.get().clone(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        debug!(task_id = %task_id, step, duration_ms = record.duration_ms, "Step completed");
        self.event_bus.publish(DomainEvent::StepCompleted {
            task_id: task_id.to_string(),
            record,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Publish the record of a failed step and hand back its cause.
    fn fail(
        &self,
        task_id: &str,
        step: u32,
        request: Option<ActionRequest>,
        state: &LoopState,
        start: Instant,
        cause: String,
    ) -> String {
        warn!(task_id = %task_id, step, error = %cause, "Step failed");
        let record = StepRecord {
            step,
            request,
            result: StepResult::Error {
                message: cause.clone(),
            },
            state: state.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
        };
        self.event_bus.publish(DomainEvent::StepCompleted {
            task_id: task_id.to_string(),
            record,
            timestamp: Utc::now(),
        });
        self.event_bus.publish(DomainEvent::StepFailed {
            task_id: task_id.to_string(),
            step,
            error: cause.clone(),
            timestamp: Utc::now(),
        });
        cause
    }
}
