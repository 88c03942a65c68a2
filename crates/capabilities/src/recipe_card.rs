//! Recipe cards: fetch the card URL and save the image locally.
//!
//! Saving the card is the last step of a recipe search, so
//! [`DisplayRecipeDetails`] answers with the termination signal.

use crate::params::{field, param_text};
use crate::spoonacular::RecipeApi;
use async_trait::async_trait;
use ladle_core::capability::{Capability, CapabilityKind};
use ladle_core::error::CapabilityError;
use ladle_core::state::TERMINATION_SIGNAL;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct GetRecipeDetails {
    api: Arc<dyn RecipeApi>,
}

impl GetRecipeDetails {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Capability for GetRecipeDetails {
    fn name(&self) -> &str {
        "get_recipe_details"
    }

    fn description(&self) -> &str {
        "Fetches the details of the recipe with the given ID. The details are an image hosted at a recipe_card_url, which can later be shown to the user."
    }

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Action
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipe_id": {
                    "type": ["string", "integer"],
                    "description": "Spoonacular recipe ID"
                }
            },
            "required": ["recipe_id"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, parameters: Map<String, Value>) -> Result<Value, CapabilityError> {
        let recipe_id = param_text(field(&parameters, "recipe_id"));
        if recipe_id.is_empty() || !recipe_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(CapabilityError::invalid_parameters(
                self.name(),
                format!("recipe_id must be a numeric Spoonacular id, got {recipe_id:?}"),
            ));
        }

        let url = self
            .api
            .recipe_card(&recipe_id)
            .await
            .map_err(|e| CapabilityError::execution(self.name(), e))?;
        Ok(Value::String(url))
    }
}

pub struct DisplayRecipeDetails {
    api: Arc<dyn RecipeApi>,
    images_dir: PathBuf,
}

impl DisplayRecipeDetails {
    pub fn new(api: Arc<dyn RecipeApi>, images_dir: &Path) -> Self {
        Self {
            api,
            images_dir: images_dir.to_path_buf(),
        }
    }
}

/// File name for a card URL: its last path segment, minus any query.
fn card_file_name(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let name = path.rsplit('/').next().unwrap_or_default();
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "recipe-card.png".into()
    } else {
        cleaned
    }
}

#[async_trait]
impl Capability for DisplayRecipeDetails {
    fn name(&self) -> &str {
        "display_recipe_details"
    }

    fn description(&self) -> &str {
        "Displays the details of a recipe using the recipe card available at the given recipe_card_url. This completes the recipe search."
    }

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Observation
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipe_card_url": {
                    "type": "string",
                    "description": "URL of the recipe card image"
                }
            },
            "required": ["recipe_card_url"],
            "additionalProperties": false
        })
    }

    async fn invoke(&self, parameters: Map<String, Value>) -> Result<Value, CapabilityError> {
        let url = param_text(field(&parameters, "recipe_card_url"));
        let bytes = self
            .api
            .download(&url)
            .await
            .map_err(|e| CapabilityError::execution(self.name(), e))?;

        tokio::fs::create_dir_all(&self.images_dir)
            .await
            .map_err(|e| CapabilityError::execution(self.name(), e))?;
        let path = self.images_dir.join(card_file_name(&url));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| CapabilityError::execution(self.name(), e))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Recipe card saved");
        Ok(Value::String(TERMINATION_SIGNAL.into()))
    }
}
