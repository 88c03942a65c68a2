//! Domain event system: the outbound reporting channel.
//!
//! The orchestrator publishes an event for every selection, every step and
//! the final status. Console output, task stores and tests subscribe
//! without the loop knowing about them.

use crate::task::{StepRecord, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A task entered the loop
    TaskStarted {
        task_id: String,
        description: String,
        max_steps: u32,
        timestamp: DateTime<Utc>,
    },

    /// The model answered a selection prompt
    ResponseGenerated {
        task_id: String,
        model: String,
        tokens_used: u32,
        timestamp: DateTime<Utc>,
    },

    /// The model chose a capability
    ActionSelected {
        task_id: String,
        step: u32,
        capability: String,
        parameters: serde_json::Value,
        timestamp: DateTime<Utc>,
    },

    /// A step finished and its record is final
    StepCompleted {
        task_id: String,
        record: StepRecord,
        timestamp: DateTime<Utc>,
    },

    /// A step ended the task with an error
    StepFailed {
        task_id: String,
        step: u32,
        error: String,
        timestamp: DateTime<Utc>,
    },

    /// The task reached a terminal status
    TaskFinished {
        task_id: String,
        status: TaskStatus,
        steps: u32,
        error: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_bus_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DomainEvent::TaskFinished {
            task_id: "t1".into(),
            status: TaskStatus::Succeeded,
            steps: 4,
            error: None,
            timestamp: Utc::now(),
        });

        let event = rx.recv().await.unwrap();
        match event.as_ref() {
            DomainEvent::TaskFinished { status, steps, .. } => {
                assert_eq!(*status, TaskStatus::Succeeded);
                assert_eq!(*steps, 4);
            }
            _ => panic!("Expected TaskFinished event"),
        }
    }

    #[test]
    fn event_bus_no_subscribers_doesnt_panic() {
        let bus = EventBus::new(16);
        bus.publish(DomainEvent::TaskStarted {
            task_id: "t1".into(),
            description: "nobody listening".into(),
            max_steps: 1,
            timestamp: Utc::now(),
        });
    }
}
