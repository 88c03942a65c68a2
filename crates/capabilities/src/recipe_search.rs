//! Recipe search: requirement breakdown and the complexSearch call.

use crate::analyzer::RequirementAnalyzer;
use crate::params::{breakdown, field, param_text};
use crate::prompts;
use crate::spoonacular::{RecipeApi, SearchQuery};
use async_trait::async_trait;
use ladle_core::capability::{Capability, CapabilityKind};
use ladle_core::error::CapabilityError;
use serde_json::{Map, Value, json};
use std::sync::Arc;

/// The keys of a recipe requirement breakdown, in prompt order.
pub const RECIPE_KEYS: [&str; 5] = [
    "food",
    "diet",
    "intolerances",
    "include_ingredients",
    "exclude_ingredients",
];

/// Breakdown key → Spoonacular query parameter.
const SEARCH_PARAMS: [(&str, &str); 5] = [
    ("food", "query"),
    ("diet", "diet"),
    ("intolerances", "intolerances"),
    ("include_ingredients", "includeIngredients"),
    ("exclude_ingredients", "excludeIngredients"),
];

pub struct GetRecipeRequirements {
    analyzer: Arc<RequirementAnalyzer>,
}

impl GetRecipeRequirements {
    pub fn new(analyzer: Arc<RequirementAnalyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl Capability for GetRecipeRequirements {
    fn name(&self) -> &str {
        "get_recipe_requirements"
    }

    fn description(&self) -> &str {
        "This is the first step in finding a recipe. Takes a text describing what type of recipe the user wants and returns a structured breakdown of the requirements: food, diet, intolerances, include_ingredients and exclude_ingredients. The breakdown can then be used to search for suitable recipes."
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
                    "description": "What the user asked for, in plain English"
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
            .analyze(prompts::RECIPE_REQUIREMENTS, "recipe", &requirements, &RECIPE_KEYS)
            .await
            .map_err(|e| CapabilityError::execution(self.name(), e))?;
        Ok(Value::Object(fields))
    }
}

pub struct SearchRecipe {
    api: Arc<dyn RecipeApi>,
}

impl SearchRecipe {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self { api }
    }
}

/// Build the search query from a breakdown. Blank values are omitted and
/// lists are comma-joined.
pub fn search_query(requirements: &Map<String, Value>) -> SearchQuery {
    SEARCH_PARAMS
        .iter()
        .fold(SearchQuery::new(), |query, (key, param)| {
            match requirements.get(*key) {
                Some(value) => query.param(param, param_text(value)),
                None => query,
            }
        })
}

#[async_trait]
impl Capability for SearchRecipe {
    fn name(&self) -> &str {
        "search_recipe"
    }

    fn description(&self) -> &str {
        "Searches for a recipe that meets the user's requirements, given as a structured breakdown with the keys food, diet, intolerances, include_ingredients and exclude_ingredients. Queries the Spoonacular recipe search and returns the ID of a matching recipe."
    }

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Action
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "requirements_breakdown": breakdown(&RECIPE_KEYS, true)
            },
            "required": ["requirements_breakdown"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, parameters: Map<String, Value>) -> Result<Value, CapabilityError> {
        let requirements = field(&parameters, "requirements_breakdown")
            .as_object()
            .cloned()
            .unwrap_or_default();
        let query = search_query(&requirements);
        tracing::debug!(params = ?query.params(), "Searching recipes");

        let id = self
            .api
            .search(&query)
            .await
            .map_err(|e| CapabilityError::execution(self.name(), e))?;
        Ok(json!(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockRecipeApi, ScriptedProvider};

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn query_maps_keys_and_joins_lists() {
        let query = search_query(&params(json!({
            "food": "soup",
            "diet": "vegetarian",
            "intolerances": "",
            "include_ingredients": ["tomato", "basil"],
            "exclude_ingredients": "eggs"
        })));
        assert_eq!(query.get("query"), Some("soup"));
        assert_eq!(query.get("diet"), Some("vegetarian"));
        assert_eq!(query.get("intolerances"), None);
        assert_eq!(query.get("includeIngredients"), Some("tomato,basil"));
        assert_eq!(query.get("excludeIngredients"), Some("eggs"));
    }

    #[test]
    fn null_and_empty_list_are_blank() {
        let query = search_query(&params(json!({
            "food": null,
            "diet": [],
            "intolerances": "gluten",
            "include_ingredients": "",
            "exclude_ingredients": ""
        })));
        assert_eq!(query.params().len(), 1);
        assert_eq!(query.get("intolerances"), Some("gluten"));
    }

    #[tokio::test]
    async fn search_returns_recipe_id() {
        let api = Arc::new(MockRecipeApi::default());
        let cap = SearchRecipe::new(api.clone());
        let out = cap
            .invoke(params(json!({
                "requirements_breakdown": {
                    "food": "soup", "diet": "vegetarian", "intolerances": "",
                    "include_ingredients": "tomato", "exclude_ingredients": "eggs"
                }
            })))
            .await
            .unwrap();
        assert_eq!(out, json!(715415));
        assert_eq!(api.searches()[0].get("query"), Some("soup"));
    }

    #[tokio::test]
    async fn no_results_is_execution_failure() {
        let api = Arc::new(MockRecipeApi {
            recipe_id: None,
            ..MockRecipeApi::default()
        });
        let cap = SearchRecipe::new(api);
        let err = cap
            .invoke(params(json!({"requirements_breakdown": {
                "food": "x", "diet": "", "intolerances": "",
                "include_ingredients": "", "exclude_ingredients": ""
            }})))
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("no recipes"), "{err}");
    }

    #[tokio::test]
    async fn requirements_come_from_analyzer() {
        let provider = Arc::new(ScriptedProvider::replies(&[r#"{
            "food": "soup", "diet": "vegetarian", "intolerances": "",
            "include_ingredients": "tomato", "exclude_ingredients": "eggs"
        }"#]));
        let analyzer = Arc::new(RequirementAnalyzer::new(provider, "gpt-4-turbo"));
        let cap = GetRecipeRequirements::new(analyzer);
        let out = cap
            .invoke(params(json!({"requirements": "vegetarian soup with tomato, no eggs"})))
            .await
            .unwrap();
        assert_eq!(out["food"], "soup");
        assert_eq!(out.as_object().unwrap().len(), 5);
    }
}
