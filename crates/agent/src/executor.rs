//! Dispatches an [`ActionRequest`] to the capability it names.

use ladle_core::capability::{ActionRequest, CapabilityRegistry, RegisteredCapability};
use ladle_core::error::CapabilityError;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Resolves, validates and invokes capabilities. Never retries.
#[derive(Clone)]
pub struct CapabilityExecutor {
    registry: Arc<CapabilityRegistry>,
}

impl CapabilityExecutor {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Look up the capability a request names.
    pub fn resolve(&self, request: &ActionRequest) -> Result<&RegisteredCapability, CapabilityError> {
        self.registry.resolve(&request.name)
    }

    /// Validate the parameters against the capability's schema and run it.
    ///
    /// Missing, unexpected or mistyped parameters fail with
    /// [`CapabilityError::InvalidParameters`] before the capability runs;
    /// failures inside the capability come back as
    /// [`CapabilityError::ExecutionFailed`] with the original cause.
    pub async fn execute(
        &self,
        capability: &RegisteredCapability,
        request: &ActionRequest,
    ) -> Result<Value, CapabilityError> {
        capability.validate(&request.parameters)?;

        let start = std::time::Instant::now();
        let result = capability.invoke(request.parameters.clone()).await;
        debug!(
            capability = %capability.name(),
            success = result.is_ok(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Capability invoked"
        );
        result
    }

    /// Resolve then execute.
    pub async fn dispatch(&self, request: &ActionRequest) -> Result<Value, CapabilityError> {
        let capability = self.resolve(request)?;
        self.execute(capability, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptedCapability, registry_of};
    use serde_json::{Map, json};

    fn request(name: &str, params: Value) -> ActionRequest {
        ActionRequest::new(name, params.as_object().cloned().unwrap_or_default())
    }

    #[tokio::test]
    async fn dispatches_valid_request() {
        let cap = ScriptedCapability::returning("search_recipe", json!(715415));
        let calls = cap.calls();
        let executor = CapabilityExecutor::new(registry_of(vec![cap]));

        let out = executor
            .dispatch(&request("search_recipe", json!({"input": "soup"})))
            .await
            .unwrap();
        assert_eq!(out, json!(715415));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_capability_is_resolution_failure() {
        let executor = CapabilityExecutor::new(registry_of(vec![ScriptedCapability::returning(
            "search_recipe",
            json!(1),
        )]));
        let err = executor
            .dispatch(&request("order_pizza", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::Unknown(name) if name == "order_pizza"));
    }

    #[tokio::test]
    async fn invalid_parameters_never_reach_the_capability() {
        let cap = ScriptedCapability::returning("search_recipe", json!(1));
        let calls = cap.calls();
        let executor = CapabilityExecutor::new(registry_of(vec![cap]));

        let err = executor
            .dispatch(&request("search_recipe", json!({"input": "soup", "limit": 3})))
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidParameters { .. }));
        assert!(err.to_string().contains("limit"), "{err}");

        let err = executor
            .dispatch(&ActionRequest::new("search_recipe", Map::new()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("input"), "{err}");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn execution_failure_keeps_cause() {
        let executor = CapabilityExecutor::new(registry_of(vec![ScriptedCapability::failing(
            "search_recipe",
            "recipe service returned 503",
        )]));
        let err = executor
            .dispatch(&request("search_recipe", json!({"input": "soup"})))
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("503"), "{err}");
    }
}
