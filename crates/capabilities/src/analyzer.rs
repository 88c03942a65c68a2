//! LLM requirement analyzer.
//!
//! Turns a plain-English request into a flat JSON object with a fixed set
//! of keys. Each call is a fresh one-message conversation; nothing is
//! shared with the action selector's transcript.

use ladle_core::error::ProviderError;
use ladle_core::message::Message;
use ladle_core::provider::{Provider, ProviderRequest};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("analyzer model call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("analyzer reply is not a JSON object: {0}")]
    Decode(String),

    #[error("analyzer reply has no `{0}` key")]
    MissingKey(String),
}

/// Asks the model to break a request down into named fields.
pub struct RequirementAnalyzer {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
}

impl RequirementAnalyzer {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Send `prompt` plus the request, then project exactly `keys` out of
    /// the reply.
    pub async fn analyze(
        &self,
        prompt: &str,
        subject: &str,
        requirements: &str,
        keys: &[&str],
    ) -> Result<Map<String, Value>, AnalyzerError> {
        let text = format!("{prompt}\n\nHere is the {subject} requirement in plain English: {requirements}");
        let mut request = ProviderRequest::new(&self.model, vec![Message::user(text)]);
        request.temperature = self.temperature;
        request.json_mode = true;

        let response = self.provider.complete(request).await?;
        debug!(model = %response.model, subject, "Analyzer replied");

        let reply: Value = serde_json::from_str(response.message.content.trim())
            .map_err(|e| AnalyzerError::Decode(e.to_string()))?;
        let Value::Object(mut fields) = reply else {
            return Err(AnalyzerError::Decode(format!("expected an object, got {reply}")));
        };

        let mut projected = Map::new();
        for key in keys {
            let value = fields
                .remove(*key)
                .ok_or_else(|| AnalyzerError::MissingKey((*key).to_string()))?;
            projected.insert((*key).to_string(), value);
        }
        Ok(projected)
    }
}
