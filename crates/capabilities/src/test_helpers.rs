//! Shared test doubles for capability tests.

use crate::spoonacular::{ConversionQuery, RecipeApi, RecipeApiError, SearchQuery, SubstituteReply};
use ladle_core::error::ProviderError;
use ladle_core::message::Message;
use ladle_core::provider::{Provider, ProviderRequest, ProviderResponse};
use std::sync::Mutex;

/// Returns canned replies in order and keeps every request it was sent.
pub struct ScriptedProvider {
    replies: Mutex<Vec<String>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn replies(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(|s| s.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .expect("ScriptedProvider: no more replies");
        Ok(ProviderResponse {
            message: Message::assistant(reply),
            usage: None,
            model: "scripted-model".into(),
        })
    }
}

/// In-memory recipe service.
pub struct MockRecipeApi {
    pub recipe_id: Option<u64>,
    pub card_url: String,
    pub conversion: String,
    pub substitutes: SubstituteReply,
    pub image: Vec<u8>,
    /// When set, every call fails with this HTTP status.
    pub fail_status: Option<u16>,
    pub(crate) searches: Mutex<Vec<SearchQuery>>,
    pub(crate) conversions: Mutex<Vec<ConversionQuery>>,
    pub(crate) cards: Mutex<Vec<String>>,
}

impl Default for MockRecipeApi {
    fn default() -> Self {
        Self {
            recipe_id: Some(715415),
            card_url: "https://spoonacular.com/recipeCardImages/recipeCard-1716.png".into(),
            conversion: "2.5 cups flour translates to 312.5 grams.".into(),
            substitutes: SubstituteReply {
                status: "success".into(),
                substitutes: vec!["1 cup = 7/8 cup shortening".into(), "1 cup = 1 cup margarine".into()],
                message: None,
            },
            image: vec![0x89, b'P', b'N', b'G'],
            fail_status: None,
            searches: Mutex::new(Vec::new()),
            conversions: Mutex::new(Vec::new()),
            cards: Mutex::new(Vec::new()),
        }
    }
}

impl MockRecipeApi {
    pub fn searches(&self) -> Vec<SearchQuery> {
        self.searches.lock().unwrap().clone()
    }

    pub fn conversions(&self) -> Vec<ConversionQuery> {
        self.conversions.lock().unwrap().clone()
    }

    pub fn cards(&self) -> Vec<String> {
        self.cards.lock().unwrap().clone()
    }

    fn check(&self, endpoint: &str) -> Result<(), RecipeApiError> {
        match self.fail_status {
            Some(status) => Err(RecipeApiError::Status {
                endpoint: endpoint.into(),
                status,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl RecipeApi for MockRecipeApi {
    async fn search(&self, query: &SearchQuery) -> Result<u64, RecipeApiError> {
        self.check("/recipes/complexSearch")?;
        self.searches.lock().unwrap().push(query.clone());
        self.recipe_id.ok_or(RecipeApiError::NoResults)
    }

    async fn recipe_card(&self, recipe_id: &str) -> Result<String, RecipeApiError> {
        self.check("/recipes/{id}/card")?;
        self.cards.lock().unwrap().push(recipe_id.to_string());
        Ok(self.card_url.clone())
    }

    async fn convert(&self, query: &ConversionQuery) -> Result<String, RecipeApiError> {
        self.check("/recipes/convert")?;
        self.conversions.lock().unwrap().push(query.clone());
        Ok(self.conversion.clone())
    }

    async fn substitutes(&self, _ingredient: &str) -> Result<SubstituteReply, RecipeApiError> {
        self.check("/food/ingredients/substitutes")?;
        Ok(self.substitutes.clone())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, RecipeApiError> {
        self.check(url)?;
        Ok(self.image.clone())
    }
}
