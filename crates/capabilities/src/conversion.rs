//! Ingredient unit conversion.

use crate::analyzer::RequirementAnalyzer;
use crate::params::{breakdown, field, param_text};
use crate::prompts;
use crate::spoonacular::{ConversionQuery, RecipeApi};
use async_trait::async_trait;
use ladle_core::capability::{Capability, CapabilityKind};
use ladle_core::error::CapabilityError;
use serde_json::{Map, Value, json};
use std::sync::Arc;

pub const CONVERSION_KEYS: [&str; 4] =
    ["ingredient_name", "source_amount", "source_unit", "target_unit"];

pub struct GetConversionRequirements {
    analyzer: Arc<RequirementAnalyzer>,
}

impl GetConversionRequirements {
    pub fn new(analyzer: Arc<RequirementAnalyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl Capability for GetConversionRequirements {
    fn name(&self) -> &str {
        "get_conversion_requirements"
    }

    fn description(&self) -> &str {
        "Turns a plain-English request to convert an ingredient amount from one unit to another into a structured breakdown with the ingredient name, source amount, source unit and target unit. The breakdown can then be used to perform the conversion."
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
                    "description": "The conversion request, in plain English"
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
                prompts::CONVERSION_REQUIREMENTS,
                "conversion",
                &requirements,
                &CONVERSION_KEYS,
            )
            .await
            .map_err(|e| CapabilityError::execution(self.name(), e))?;
        Ok(Value::Object(fields))
    }
}

pub struct ConvertIngredientAmounts {
    api: Arc<dyn RecipeApi>,
}

impl ConvertIngredientAmounts {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Capability for ConvertIngredientAmounts {
    fn name(&self) -> &str {
        "convert_ingredient_amounts"
    }

    fn description(&self) -> &str {
        "Converts an ingredient amount from one unit to another. Needs the conversion request as a structured breakdown with ingredient_name, source_amount, source_unit and target_unit."
    }

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Action
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "requirements_breakdown": breakdown(&CONVERSION_KEYS, false)
            },
            "required": ["requirements_breakdown"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, parameters: Map<String, Value>) -> Result<Value, CapabilityError> {
        let fields = field(&parameters, "requirements_breakdown");
        let query = ConversionQuery {
            ingredient_name: param_text(&fields["ingredient_name"]),
            source_amount: param_text(&fields["source_amount"]),
            source_unit: param_text(&fields["source_unit"]),
            target_unit: param_text(&fields["target_unit"]),
        };

        let answer = self
            .api
            .convert(&query)
            .await
            .map_err(|e| CapabilityError::execution(self.name(), e))?;
        Ok(Value::String(answer))
    }
}
