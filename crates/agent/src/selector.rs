//! Action selection: ask the model which capability to invoke next.
//!
//! One [`ActionSelector`] lives for one task. Its transcript opens with a
//! system message (instructions, the capability schema and the reply
//! contract) and grows by one state prompt and one reply per step.

use crate::decode::decode_action;
use crate::retry::RetryPolicy;
use ladle_core::capability::{ActionRequest, CapabilitySchema};
use ladle_core::error::SelectionError;
use ladle_core::event::{DomainEvent, EventBus};
use ladle_core::message::{Conversation, Message};
use ladle_core::provider::{Provider, ProviderRequest};
use ladle_core::state::LoopState;
use std::sync::Arc;
use tracing::debug;

/// Fixed instructions at the top of every transcript.
pub const PREAMBLE: &str = "You are a helpful AI assistant that analyzes user requirements and \
suggests the actions that must be executed to meet them. You will receive the current state of \
a task and your job is to suggest which action should be taken next. Each action's result \
becomes the next state.";

const CONTRACT: &str = "Always respond with a raw JSON object of the form \
{\"action\": \"<action name>\", \"parameters\": {<parameter name>: <value>}} and nothing else. \
Use only the actions listed above, with exactly the parameters their schema declares. \
A recipe search ends when the recipe card is available: call display_recipe_details with it. \
For any other request, once the current state answers it, call the result action; \
do not repeat an action whose answer you already have.";

/// Build the system message for a capability set.
pub fn system_prompt(schema: &CapabilitySchema) -> String {
    format!(
        "{PREAMBLE}\n\nThe actions available to you are:\n{}\n\n{CONTRACT}",
        schema.to_prompt_json()
    )
}

/// The per-step user message.
pub fn state_prompt(state: &LoopState) -> String {
    format!("Given the current state: {state}, suggest the next action.")
}

pub struct ActionSelector {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    retry: RetryPolicy,
    transcript: Conversation,
    events: Option<(Arc<EventBus>, String)>,
}

impl ActionSelector {
    /// Start a transcript for the given capability set.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, schema: &CapabilitySchema) -> Self {
        let mut transcript = Conversation::new();
        transcript.push(Message::system(system_prompt(schema)));
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            retry: RetryPolicy::none(),
            transcript,
            events: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: Option<u32>) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Publish token usage for `task_id` on `bus`.
    pub fn with_events(mut self, bus: Arc<EventBus>, task_id: impl Into<String>) -> Self {
        self.events = Some((bus, task_id.into()));
        self
    }

    pub fn transcript(&self) -> &Conversation {
        &self.transcript
    }

    /// Ask for the next action given the current state.
    ///
    /// Transient provider failures are retried per the [`RetryPolicy`];
    /// a reply that does not decode is returned as an error, never retried.
    pub async fn select(&mut self, state: &LoopState) -> Result<ActionRequest, SelectionError> {
        self.transcript.push(Message::user(state_prompt(state)));

        let mut request = ProviderRequest::new(&self.model, self.transcript.messages.clone());
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;
        request.json_mode = true;

        let provider = self.provider.clone();
        let response = self
            .retry
            .run(|| {
                let provider = provider.clone();
                let request = request.clone();
                async move { provider.complete(request).await }
            })
            .await
            .map_err(|(attempts, source)| SelectionError::Provider { attempts, source })?;

        if let (Some((bus, task_id)), Some(usage)) = (&self.events, &response.usage) {
            bus.publish(DomainEvent::ResponseGenerated {
                task_id: task_id.clone(),
                model: response.model.clone(),
                tokens_used: usage.total_tokens,
                timestamp: chrono::Utc::now(),
            });
        }

        let reply = response.message.content.clone();
        self.transcript.push(response.message);
        debug!(
            model = %response.model,
            transcript_len = self.transcript.len(),
            transcript_tokens = self.transcript.estimated_tokens(),
            "Model replied"
        );

        decode_action(&reply)
    }
}
