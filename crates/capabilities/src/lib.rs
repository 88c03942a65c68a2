//! Recipe capabilities for Ladle.
//!
//! Capabilities give the agent the ability to work with recipes:
//! break a request down into search criteria, find a recipe, fetch and
//! save its card, convert ingredient amounts, look up substitutes, and
//! report that the request is answered.
//! The HTTP side goes through [`RecipeApi`]; the requirement breakdowns
//! go through a [`RequirementAnalyzer`] on the configured model.

pub mod analyzer;
pub mod conversion;
pub mod finish;
pub mod params;
pub mod prompts;
pub mod recipe_card;
pub mod recipe_search;
pub mod spoonacular;
pub mod substitutes;

#[cfg(test)]
pub(crate) mod test_helpers;

use ladle_core::capability::CapabilityRegistry;
use ladle_core::error::CapabilityError;
use ladle_core::task::TaskId;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use analyzer::{AnalyzerError, RequirementAnalyzer};
pub use spoonacular::{
    ConversionQuery, RecipeApi, RecipeApiError, SearchQuery, SpoonacularClient, SubstituteReply,
};

/// Everything the capabilities need, built once at startup.
#[derive(Clone)]
pub struct RecipeContext {
    pub api: Arc<dyn RecipeApi>,
    pub analyzer: Arc<RequirementAnalyzer>,
    /// Where card images are saved; see [`task_images_dir`]
    pub images_dir: PathBuf,
}

/// `<data_dir>/images/<task id>`, so runs never overwrite each other's cards.
pub fn task_images_dir(data_dir: &Path, task: &TaskId) -> PathBuf {
    data_dir.join("images").join(&task.0)
}

/// Create the registry with every recipe capability, in the order the
/// model sees them.
pub fn default_registry(ctx: &RecipeContext) -> Result<CapabilityRegistry, CapabilityError> {
    let mut registry = CapabilityRegistry::new();

    registry.register(Box::new(recipe_search::GetRecipeRequirements::new(
        ctx.analyzer.clone(),
    )))?;
    registry.register(Box::new(recipe_search::SearchRecipe::new(ctx.api.clone())))?;
    registry.register(Box::new(recipe_card::GetRecipeDetails::new(ctx.api.clone())))?;
    registry.register(Box::new(recipe_card::DisplayRecipeDetails::new(
        ctx.api.clone(),
        &ctx.images_dir,
    )))?;

    registry.register(Box::new(conversion::GetConversionRequirements::new(
        ctx.analyzer.clone(),
    )))?;
    registry.register(Box::new(conversion::ConvertIngredientAmounts::new(
        ctx.api.clone(),
    )))?;

    registry.register(Box::new(substitutes::GetSubstituteRequirements::new(
        ctx.analyzer.clone(),
    )))?;
    registry.register(Box::new(substitutes::GetIngredientSubstitutes::new(
        ctx.api.clone(),
    )))?;

    registry.register(Box::new(finish::ReportResult))?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockRecipeApi, ScriptedProvider};
    use ladle_core::CapabilityKind;
    use serde_json::json;

    fn context() -> RecipeContext {
        RecipeContext {
            api: Arc::new(MockRecipeApi::default()),
            analyzer: Arc::new(RequirementAnalyzer::new(
                Arc::new(ScriptedProvider::replies(&[])),
                "m",
            )),
            images_dir: std::env::temp_dir(),
        }
    }

    #[test]
    fn registry_has_all_capabilities_in_order() {
        let registry = default_registry(&context()).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "get_recipe_requirements",
                "search_recipe",
                "get_recipe_details",
                "display_recipe_details",
                "get_conversion_requirements",
                "convert_ingredient_amounts",
                "get_substitute_requirements",
                "get_ingredient_substitutes",
                "result",
            ]
        );
    }

    #[test]
    fn kinds_follow_side_effects() {
        let registry = default_registry(&context()).unwrap();
        let kind = |name: &str| registry.get(name).unwrap().kind();
        assert_eq!(kind("get_recipe_requirements"), CapabilityKind::Observation);
        assert_eq!(kind("search_recipe"), CapabilityKind::Action);
        assert_eq!(kind("display_recipe_details"), CapabilityKind::Observation);
        assert_eq!(kind("get_ingredient_substitutes"), CapabilityKind::Action);
        assert_eq!(kind("result"), CapabilityKind::Observation);
    }

    #[test]
    fn images_are_kept_per_task() {
        let id = TaskId("3f2a".into());
        let dir = task_images_dir(Path::new("/var/ladle"), &id);
        assert_eq!(dir, Path::new("/var/ladle/images/3f2a"));
    }

    #[test]
    fn search_breakdown_missing_field_is_named() {
        let registry = default_registry(&context()).unwrap();
        let search = registry.resolve("search_recipe").unwrap();
        let params = json!({"requirements_breakdown": {
            "food": "soup",
            "intolerances": "",
            "include_ingredients": "tomato",
            "exclude_ingredients": "eggs"
        }});
        let err = search
            .validate(params.as_object().unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("diet"), "{err}");
    }

    #[test]
    fn recipe_id_accepts_string_or_integer() {
        let registry = default_registry(&context()).unwrap();
        let details = registry.resolve("get_recipe_details").unwrap();
        for id in [json!("715415"), json!(715415)] {
            let mut params = serde_json::Map::new();
            params.insert("recipe_id".into(), id);
            assert!(details.validate(&params).is_ok());
        }
        let mut bad = serde_json::Map::new();
        bad.insert("recipe_id".into(), json!(["715415"]));
        assert!(details.validate(&bad).is_err());
    }
}
