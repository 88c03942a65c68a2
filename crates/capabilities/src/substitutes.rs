//! Ingredient substitutes.

use crate::analyzer::RequirementAnalyzer;
use crate::params::{breakdown, field, param_text};
use crate::prompts;
use crate::spoonacular::RecipeApi;
use async_trait::async_trait;
use ladle_core::capability::{Capability, CapabilityKind};
use ladle_core::error::CapabilityError;
use serde_json::{Map, Value, json};
use std::sync::Arc;

pub const SUBSTITUTE_KEYS: [&str; 1] = ["ingredient_name"];

pub struct GetSubstituteRequirements {
    analyzer: Arc<RequirementAnalyzer>,
}

impl GetSubstituteRequirements {
    pub fn new(analyzer: Arc<RequirementAnalyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl Capability for GetSubstituteRequirements {
    fn name(&self) -> &str {
        "get_substitute_requirements"
    }

    fn description(&self) -> &str {
        "Turns a plain-English request for ingredient substitutes into a structured breakdown with the ingredient name, which can then be used to search for substitutes."
    }

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Observation
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "requirements": {
                    "type": "string",
                    "description": "The substitution request, in plain English"
                }
            },
            "required": ["requirements"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, parameters: Map<String, Value>) -> Result<Value, CapabilityError> {
        let requirements = param_text(field(&parameters, "requirements"));
        let fields = self
            .analyzer
            .analyze(
                prompts::SUBSTITUTE_REQUIREMENTS,
                "substitution",
                &requirements,
                &SUBSTITUTE_KEYS,
            )
            .await
            .map_err(|e| CapabilityError::execution(self.name(), e))?;
        Ok(Value::Object(fields))
    }
}

pub struct GetIngredientSubstitutes {
    api: Arc<dyn RecipeApi>,
}

impl GetIngredientSubstitutes {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Capability for GetIngredientSubstitutes {
    fn name(&self) -> &str {
        "get_ingredient_substitutes"
    }

    fn description(&self) -> &str {
        "Finds substitutes for an ingredient. Needs the substitution request as a structured breakdown with ingredient_name."
    }

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Action
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "requirements_breakdown": breakdown(&SUBSTITUTE_KEYS, false)
            },
            "required": ["requirements_breakdown"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, parameters: Map<String, Value>) -> Result<Value, CapabilityError> {
        let ingredient = param_text(&field(&parameters, "requirements_breakdown")["ingredient_name"]);
        let reply = self
            .api
            .substitutes(&ingredient)
            .await
            .map_err(|e| CapabilityError::execution(self.name(), e))?;

        let answer = if reply.is_success() {
            format!("Substitutes for {ingredient}: {}", reply.substitutes.join(", "))
        } else {
            format!("Spoonacular did not return any substitutes for {ingredient}")
        };
        Ok(Value::String(answer))
    }
}
