//! Preference chain: one logical provider backed by several real ones.
//!
//! A request goes to each provider in turn until one answers. Every entry
//! may pin its own model name, since a model id on OpenAI means nothing to
//! OpenRouter or Groq. Each attempt is bounded by the chain's timeout.
//!
//! When every provider fails, the chain reports a transient failure if it
//! saw one, so a caller's retry policy gets to run the chain again.

use async_trait::async_trait;
use ladle_core::error::ProviderError;
use ladle_core::provider::{Provider, ProviderRequest, ProviderResponse};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(120);

struct Preference {
    provider: Arc<dyn Provider>,
    model: Option<String>,
}

pub struct PreferenceChain {
    entries: Vec<Preference>,
    attempt_timeout: Duration,
}

impl Default for PreferenceChain {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceChain {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Append a provider that receives the caller's model unchanged.
    pub fn then(mut self, provider: Arc<dyn Provider>) -> Self {
        self.entries.push(Preference {
            provider,
            model: None,
        });
        self
    }

    /// Append a provider that is always asked for `model`.
    pub fn then_with_model(mut self, provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        self.entries.push(Preference {
            provider,
            model: Some(model.into()),
        });
        self
    }

    /// Upper bound on a single provider's attempt.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Provider names in the order they are tried.
    pub fn order(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.provider.name()).collect()
    }

    async fn attempt(
        &self,
        entry: &Preference,
        mut request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Some(model) = &entry.model {
            request.model = model.clone();
        }
        match tokio::time::timeout(self.attempt_timeout, entry.provider.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(format!(
                "{} gave no answer within {}s",
                entry.provider.name(),
                self.attempt_timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl Provider for PreferenceChain {
    fn name(&self) -> &str {
        "preference"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut transient: Option<ProviderError> = None;
        let mut last: Option<ProviderError> = None;

        for (rank, entry) in self.entries.iter().enumerate() {
            let provider = entry.provider.name();
            debug!(provider, rank, "Asking preferred provider");

            match self.attempt(entry, request.clone()).await {
                Ok(response) => {
                    if rank > 0 {
                        warn!(provider, rank, "Answered by a fallback provider");
                    }
                    return Ok(response);
                }
                Err(e) => {
                    warn!(provider, rank, transient = e.is_transient(), error = %e, "Provider failed");
                    if e.is_transient() {
                        transient = Some(e);
                    } else {
                        last = Some(e);
                    }
                }
            }
        }

        Err(transient.or(last).unwrap_or_else(|| {
            ProviderError::NotConfigured("preference chain has no providers".into())
        }))
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let mut models = Vec::new();
        for entry in &self.entries {
            match &entry.model {
                Some(model) => models.push(model.clone()),
                None => {
                    if let Ok(listed) = entry.provider.list_models().await {
                        models.extend(listed);
                    }
                }
            }
        }
        models.sort();
        models.dedup();
        Ok(models)
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        for entry in &self.entries {
            if matches!(entry.provider.health_check().await, Ok(true)) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
