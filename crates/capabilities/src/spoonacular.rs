//! Spoonacular HTTP client.
//!
//! Capabilities talk to the recipe service through the [`RecipeApi`]
//! trait so tests can swap in an in-memory double. [`SpoonacularClient`]
//! is the real implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Errors from the recipe service.
#[derive(Debug, thiserror::Error)]
pub enum RecipeApiError {
    #[error("request to {endpoint} failed: {reason}")]
    Http { endpoint: String, reason: String },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("could not decode {endpoint} response: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("{endpoint} response has no `{field}`")]
    MissingField { endpoint: String, field: String },

    #[error("no recipes matched the search")]
    NoResults,
}

/// Query-string parameters for `/recipes/complexSearch`, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    params: Vec<(String, String)>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter; blank values are dropped.
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.params.push((key.to_string(), value));
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// A unit conversion request for `/recipes/convert`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionQuery {
    pub ingredient_name: String,
    pub source_amount: String,
    pub source_unit: String,
    pub target_unit: String,
}

/// Reply from `/food/ingredients/substitutes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubstituteReply {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub substitutes: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SubstituteReply {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// The recipe service as the capabilities see it.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Id of the first recipe matching the query.
    async fn search(&self, query: &SearchQuery) -> Result<u64, RecipeApiError>;

    /// URL of the rendered recipe card image.
    async fn recipe_card(&self, recipe_id: &str) -> Result<String, RecipeApiError>;

    /// Human-readable conversion answer, e.g. "2.5 cups flour translates to 312.5 grams."
    async fn convert(&self, query: &ConversionQuery) -> Result<String, RecipeApiError>;

    async fn substitutes(&self, ingredient: &str) -> Result<SubstituteReply, RecipeApiError>;

    /// Raw bytes behind a URL (card images).
    async fn download(&self, url: &str) -> Result<Vec<u8>, RecipeApiError>;
}

/// Spoonacular over HTTPS, authenticated with an `apiKey` query parameter.
pub struct SpoonacularClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl SpoonacularClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    pub fn from_config(config: &ladle_config::RecipesConfig) -> Self {
        Self::new(
            &config.base_url,
            config.api_key.clone().unwrap_or_default(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// GET `path` with the API key plus `params`, decoded as JSON.
    async fn get_json(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<serde_json::Value, RecipeApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(endpoint = %path, params = params.len(), "Calling Spoonacular");

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| RecipeApiError::Http {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(RecipeApiError::Status {
                endpoint: path.to_string(),
                status,
            });
        }

        response.json().await.map_err(|e| RecipeApiError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }
}

fn missing(endpoint: &str, field: &str) -> RecipeApiError {
    RecipeApiError::MissingField {
        endpoint: endpoint.to_string(),
        field: field.to_string(),
    }
}

/// Pull the first recipe id out of a complexSearch body.
pub(crate) fn first_result_id(body: &serde_json::Value) -> Result<u64, RecipeApiError> {
    const ENDPOINT: &str = "/recipes/complexSearch";
    let results = body["results"]
        .as_array()
        .ok_or_else(|| missing(ENDPOINT, "results"))?;
    let first = results.first().ok_or(RecipeApiError::NoResults)?;
    first["id"].as_u64().ok_or_else(|| missing(ENDPOINT, "id"))
}

#[async_trait]
impl RecipeApi for SpoonacularClient {
    async fn search(&self, query: &SearchQuery) -> Result<u64, RecipeApiError> {
        let mut params = vec![("number".to_string(), "1".to_string())];
        params.extend_from_slice(query.params());
        let body = self.get_json("/recipes/complexSearch", &params).await?;
        first_result_id(&body)
    }

    async fn recipe_card(&self, recipe_id: &str) -> Result<String, RecipeApiError> {
        let path = format!("/recipes/{recipe_id}/card");
        let body = self.get_json(&path, &[]).await?;
        body["url"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| missing(&path, "url"))
    }

    async fn convert(&self, query: &ConversionQuery) -> Result<String, RecipeApiError> {
        const ENDPOINT: &str = "/recipes/convert";
        let params = [
            ("ingredientName", &query.ingredient_name),
            ("sourceAmount", &query.source_amount),
            ("sourceUnit", &query.source_unit),
            ("targetUnit", &query.target_unit),
        ]
        .map(|(k, v)| (k.to_string(), v.clone()));
        let body = self.get_json(ENDPOINT, &params).await?;
        body["answer"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| missing(ENDPOINT, "answer"))
    }

    async fn substitutes(&self, ingredient: &str) -> Result<SubstituteReply, RecipeApiError> {
        const ENDPOINT: &str = "/food/ingredients/substitutes";
        let params = [("ingredientName".to_string(), ingredient.to_string())];
        let body = self.get_json(ENDPOINT, &params).await?;
        serde_json::from_value(body).map_err(|e| RecipeApiError::Decode {
            endpoint: ENDPOINT.to_string(),
            reason: e.to_string(),
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, RecipeApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RecipeApiError::Http {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(RecipeApiError::Status {
                endpoint: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes().await.map_err(|e| RecipeApiError::Http {
            endpoint: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_search_params_dropped() {
        let query = SearchQuery::new()
            .param("query", "soup")
            .param("diet", "")
            .param("intolerances", "   ")
            .param("includeIngredients", "tomato");
        assert_eq!(query.params().len(), 2);
        assert_eq!(query.get("query"), Some("soup"));
        assert_eq!(query.get("diet"), None);
    }

    #[test]
    fn first_result_id_reads_first_entry() {
        let body = json!({"results": [{"id": 715415, "title": "Red Lentil Soup"}, {"id": 1}]});
        assert_eq!(first_result_id(&body).unwrap(), 715415);
    }

    #[test]
    fn empty_results_is_no_results() {
        let body = json!({"results": [], "totalResults": 0});
        assert!(matches!(
            first_result_id(&body),
            Err(RecipeApiError::NoResults)
        ));
    }

    #[test]
    fn missing_results_key_is_named() {
        let err = first_result_id(&json!({"status": "failure"})).unwrap_err();
        assert!(err.to_string().contains("results"), "{err}");
    }

    #[test]
    fn substitute_reply_status() {
        let ok: SubstituteReply = serde_json::from_value(json!({
            "status": "success",
            "ingredient": "butter",
            "substitutes": ["1 cup = 7/8 cup shortening and 1/2 tsp salt"],
            "message": "Found 1 substitute for the ingredient."
        }))
        .unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.substitutes.len(), 1);

        let none: SubstituteReply =
            serde_json::from_value(json!({"status": "failure", "message": "Could not find any substitutes for that ingredient."}))
                .unwrap();
        assert!(!none.is_success());
        assert!(none.substitutes.is_empty());
    }

    #[test]
    fn client_trims_base_url() {
        let client = SpoonacularClient::new("https://api.spoonacular.com/", "k", Duration::from_secs(5));
        assert_eq!(client.base_url, "https://api.spoonacular.com");
    }
}
