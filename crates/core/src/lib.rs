//! # Ladle Core
//!
//! Domain types, traits, and error definitions for the Ladle recipe agent.
//! This crate defines the domain model that all other crates implement
//! against: the model provider, the capability dispatch table, the loop
//! state and the task lifecycle.

pub mod agent;
pub mod capability;
pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod state;
pub mod task;

// Re-export key types at crate root for ergonomics
pub use agent::AgentConfig;
pub use capability::{
    ActionRequest, Capability, CapabilityDescriptor, CapabilityKind, CapabilityRegistry,
    CapabilitySchema, RegisteredCapability,
};
pub use error::{CapabilityError, ProviderError, SelectionError};
pub use event::{DomainEvent, EventBus};
pub use message::{Conversation, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use state::{LoopState, TERMINATION_SIGNAL};
pub use task::{
    CancelFlag, CancellationSource, NeverCancel, StepRecord, StepResult, Task, TaskId,
    TaskOutcome, TaskStatus,
};
