//! The `result` action: the model's way of saying the request is answered.

use async_trait::async_trait;
use ladle_core::capability::{Capability, CapabilityKind};
use ladle_core::error::CapabilityError;
use ladle_core::state::TERMINATION_SIGNAL;
use serde_json::{Map, Value, json};

pub struct ReportResult;

#[async_trait]
impl Capability for ReportResult {
    fn name(&self) -> &str {
        "result"
    }

    fn description(&self) -> &str {
        "Completes the task. Call this once the current state answers the user's request, for example after an ingredient conversion or a substitute lookup. Optionally pass the answer as a short summary for the user."
    }

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Observation
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "answer": {
                    "description": "The answer to the user's request"
                }
            }
        })
    }

    async fn invoke(&self, parameters: Map<String, Value>) -> Result<Value, CapabilityError> {
        if let Some(answer) = parameters.get("answer") {
            tracing::info!(%answer, "Model reported a result");
        }
        Ok(Value::String(TERMINATION_SIGNAL.into()))
    }
}
