//! Capability trait: the abstraction over what the agent can do.
//!
//! Capabilities are the named operations the model may choose between:
//! analysing a request, searching for a recipe, fetching a recipe card.
//! They are registered once at startup in a [`CapabilityRegistry`], which
//! acts as the dispatch table keyed by name.

use crate::error::CapabilityError;
use async_trait::async_trait;
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Whether a capability only reads or also changes something outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Informational, no external side effect worth mentioning.
    Observation,
    /// Has an external effect (an API call that costs quota, a download).
    Action,
}

/// The model's choice of what to do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    /// Name of the capability to invoke
    #[serde(rename = "action")]
    pub name: String,

    /// Keyword parameters
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl ActionRequest {
    pub fn new(name: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// Serializable description of a capability, embedded in prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: String,
    pub kind: CapabilityKind,
    /// JSON Schema of the parameter object
    pub parameters: Value,
}

/// The whole capability set, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySchema(pub Vec<CapabilityDescriptor>);

impl CapabilitySchema {
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|d| d.name.as_str()).collect()
    }

    /// Pretty JSON for embedding in a prompt.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "[]".into())
    }
}

/// The core Capability trait.
#[async_trait]
pub trait Capability: Send + Sync {
    /// The unique name of this capability (e.g., "search_recipe").
    fn name(&self) -> &str;

    /// What the capability does, written for the model.
    fn description(&self) -> &str;

    fn kind(&self) -> CapabilityKind;

    /// JSON Schema describing this capability's parameters.
    fn parameters_schema(&self) -> Value;

    /// Run the capability. Parameters have already been validated against
    /// [`Capability::parameters_schema`].
    async fn invoke(&self, parameters: Map<String, Value>) -> Result<Value, CapabilityError>;

    fn to_descriptor(&self) -> CapabilityDescriptor {
        CapabilityDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            kind: self.kind(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A capability together with its compiled parameter validator.
pub struct RegisteredCapability {
    capability: Box<dyn Capability>,
    descriptor: CapabilityDescriptor,
    validator: JSONSchema,
}

impl RegisteredCapability {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn kind(&self) -> CapabilityKind {
        self.descriptor.kind
    }

    pub fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    /// Check a parameter map against the declared schema.
    pub fn validate(&self, parameters: &Map<String, Value>) -> Result<(), CapabilityError> {
        let instance = Value::Object(parameters.clone());
        let result = self.validator.validate(&instance);
        if let Err(errors) = result {
            let reasons: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{path}: {e}")
                    }
                })
                .collect();
            return Err(CapabilityError::invalid_parameters(
                self.name(),
                reasons.join("; "),
            ));
        }
        Ok(())
    }

    /// Call the underlying capability without validating.
    pub async fn invoke(&self, parameters: Map<String, Value>) -> Result<Value, CapabilityError> {
        self.capability.invoke(parameters).await
    }
}

impl std::fmt::Debug for RegisteredCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCapability")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// The set of capabilities available to the agent.
///
/// Built once at startup, read-only afterwards. Keeps registration order
/// so the schema (and therefore every prompt) is reproducible.
#[derive(Default)]
pub struct CapabilityRegistry {
    entries: Vec<RegisteredCapability>,
    index: HashMap<String, usize>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability. Fails if the name is taken or the schema
    /// does not compile.
    pub fn register(&mut self, capability: Box<dyn Capability>) -> Result<(), CapabilityError> {
        let descriptor = capability.to_descriptor();
        if self.index.contains_key(&descriptor.name) {
            return Err(CapabilityError::Duplicate(descriptor.name));
        }

        let validator = JSONSchema::compile(&descriptor.parameters).map_err(|e| {
            CapabilityError::InvalidSchema {
                capability: descriptor.name.clone(),
                reason: e.to_string(),
            }
        })?;

        tracing::debug!(capability = %descriptor.name, kind = ?descriptor.kind, "Registered capability");
        self.index.insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(RegisteredCapability {
            capability,
            descriptor,
            validator,
        });
        Ok(())
    }

    /// Look a capability up by name.
    pub fn resolve(&self, name: &str) -> Result<&RegisteredCapability, CapabilityError> {
        self.get(name)
            .ok_or_else(|| CapabilityError::Unknown(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredCapability> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// The capability set, in registration order.
    pub fn schema(&self) -> CapabilitySchema {
        CapabilitySchema(self.entries.iter().map(|e| e.descriptor.clone()).collect())
    }

    /// List all registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
