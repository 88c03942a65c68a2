//! `ladle run`: Run one task through the agent loop.

use ladle_agent::AgentLoop;
use ladle_config::AppConfig;
use ladle_core::event::{DomainEvent, EventBus};
use ladle_core::task::{CancelFlag, StepResult, Task, TaskOutcome, TaskStatus};
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct RunOptions {
    pub task: String,
    pub max_steps: Option<u32>,
    pub cooldown_ms: Option<u64>,
    pub json: bool,
}

pub async fn run(options: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(max_steps) = options.max_steps {
        config.agent.max_steps = max_steps;
    }
    if let Some(cooldown_ms) = options.cooldown_ms {
        config.agent.step_cooldown_ms = cooldown_ms;
    }
    config.validate()?;
    super::require_keys(&config)?;

    let task = Task::new(options.task);
    let wiring = super::wire(&config, &task.id)?;
    let event_bus = Arc::new(EventBus::default());

    let reporter = if options.json {
        None
    } else {
        Some(tokio::spawn(report(event_bus.subscribe())))
    };

    // Ctrl-C stops the loop at the next iteration boundary
    let cancel = CancelFlag::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n  Stopping after the current step...");
            on_signal.cancel();
        }
    });

    let agent = AgentLoop::new(
        wiring.provider,
        wiring.model,
        wiring.registry,
        event_bus.clone(),
    )
    .with_config(&config.agent)
    .with_temperature(config.default_temperature)
    .with_max_tokens(config.default_max_tokens)
    .with_cancellation(Arc::new(cancel));

    let outcome = agent.run_task(task).await;

    // Dropping the last sender ends the reporter
    drop(agent);
    drop(event_bus);
    if let Some(reporter) = reporter {
        let _ = reporter.await;
    }

    if options.json {
        let value = serde_json::json!({
            "task": outcome.task,
            "final_state": outcome.final_state,
            "answer": outcome.answer,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", summary(&outcome));
    }

    if outcome.status().is_success() {
        Ok(())
    } else {
        Err(format!("Task ended {}", outcome.status()).into())
    }
}

/// Print progress as the loop publishes it.
async fn report(mut rx: broadcast::Receiver<Arc<DomainEvent>>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Some(line) = describe(&event) {
                    println!("{line}");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Progress reporter fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// One console line per interesting event.
fn describe(event: &DomainEvent) -> Option<String> {
    match event {
        DomainEvent::TaskStarted { description, .. } => {
            Some(format!("▶️  Starting task '{description}'"))
        }
        DomainEvent::ActionSelected {
            step,
            capability,
            parameters,
            ..
        } => Some(format!(
            "  [{step}] 💡 {capability} {}",
            preview(&parameters.to_string(), 160)
        )),
        DomainEvent::StepCompleted { record, .. } => match &record.result {
            StepResult::Output { value } => Some(format!(
                "  [{}] 👁️  {}",
                record.step,
                preview(&value.to_string(), 160)
            )),
            StepResult::Error { .. } => None,
        },
        DomainEvent::StepFailed { step, error, .. } => Some(format!("  [{step}] ❗ {error}")),
        DomainEvent::ResponseGenerated { .. } | DomainEvent::TaskFinished { .. } => None,
    }
}

fn summary(outcome: &TaskOutcome) -> String {
    let status = outcome.status();
    let steps = outcome.steps();
    let cause = outcome.task.error.as_deref().unwrap_or("unknown error");
    match (status, &outcome.answer) {
        (TaskStatus::Succeeded, Some(answer)) => {
            format!("✅ {status} after {steps} step(s)\n   {answer}")
        }
        (TaskStatus::Succeeded, None) => format!("✅ {status} after {steps} step(s)"),
        (TaskStatus::Failed, _) => format!("❌ {status} after {steps} step(s): {cause}"),
        _ => format!(
            "⚠️  {status} after {steps} step(s) ({cause}), last state: {}",
            outcome.final_state
        ),
    }
}

/// Cut `text` to at most `max` characters.
fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
