//! Shared test doubles for the agent loop tests.

use async_trait::async_trait;
use ladle_core::capability::{Capability, CapabilityKind, CapabilityRegistry};
use ladle_core::error::{CapabilityError, ProviderError};
use ladle_core::message::Message;
use ladle_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use serde_json::{Map, Value, json};
use std::sync::{Arc, Mutex};

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next response in the queue and
/// records the request. Panics if more calls are made than responses
/// provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// One text reply per call.
    pub fn replies(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(make_text_response(t))).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let count = requests.len();
        if count >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                count,
                responses.len()
            );
        }
        requests.push(request);
        responses[count].clone()
    }
}

/// A model that always passes the current state on as a parameter.
///
/// Step `n` picks the `n`-th `(action, parameter)` pair of the plan and
/// fills the parameter with the state quoted in the latest prompt, parsed
/// as JSON when it is JSON.
pub struct ForwardingProvider {
    plan: Vec<(String, String)>,
    calls: Mutex<usize>,
}

impl ForwardingProvider {
    pub fn new(plan: &[(&str, &str)]) -> Self {
        Self {
            plan: plan
                .iter()
                .map(|(action, param)| (action.to_string(), param.to_string()))
                .collect(),
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Provider for ForwardingProvider {
    fn name(&self) -> &str {
        "forwarding_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut calls = self.calls.lock().unwrap();
        let (action, param) = &self.plan[*calls];
        *calls += 1;

        let prompt = &request.messages.last().unwrap().content;
        let quoted = prompt
            .strip_prefix("Given the current state: ")
            .and_then(|rest| rest.strip_suffix(", suggest the next action."))
            .unwrap();
        let state = serde_json::from_str(quoted).unwrap_or_else(|_| json!(quoted));

        let mut parameters = Map::new();
        parameters.insert(param.clone(), state);
        Ok(make_text_response(&action_reply(action, Value::Object(parameters))))
    }
}

/// Create a simple text response with token usage.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// A reply choosing `action` with `parameters`.
pub fn action_reply(action: &str, parameters: Value) -> String {
    json!({"action": action, "parameters": parameters}).to_string()
}

/// A capability that always answers the same way and records its calls.
pub struct ScriptedCapability {
    name: String,
    schema: Value,
    output: Result<Value, String>,
    calls: Arc<Mutex<Vec<Map<String, Value>>>>,
}

impl ScriptedCapability {
    /// Takes one required `input` parameter of any type.
    pub fn returning(name: &str, output: Value) -> Self {
        Self {
            name: name.to_string(),
            schema: json!({
                "type": "object",
                "properties": { "input": {} },
                "required": ["input"],
                "additionalProperties": false
            }),
            output: Ok(output),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            output: Err(message.to_string()),
            ..Self::returning(name, Value::Null)
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = schema;
        self
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<Map<String, Value>>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl Capability for ScriptedCapability {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Scripted test capability"
    }

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Action
    }

    fn parameters_schema(&self) -> Value {
        self.schema.clone()
    }

    async fn invoke(&self, parameters: Map<String, Value>) -> Result<Value, CapabilityError> {
        self.calls.lock().unwrap().push(parameters);
        match &self.output {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(CapabilityError::execution(&self.name, message.clone())),
        }
    }
}

pub fn registry_of(capabilities: Vec<ScriptedCapability>) -> Arc<CapabilityRegistry> {
    let mut registry = CapabilityRegistry::new();
    for capability in capabilities {
        registry.register(Box::new(capability)).unwrap();
    }
    Arc::new(registry)
}
