//! Provider router: selects the LLM provider based on config.
//!
//! Every configured provider is registered by name. The router then hands
//! out the single provider the agent talks to: the default one, or a
//! [`PreferenceChain`] over the default followed by `fallback_providers`.

use crate::preference::PreferenceChain;
use crate::openai_compat::OpenAiCompatProvider;
use ladle_config::AppConfig;
use ladle_core::error::ProviderError;
use ladle_core::provider::Provider;
use std::collections::HashMap;
use std::sync::Arc;

/// Routes LLM requests to the correct provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
    preference: Vec<String>,
    models: HashMap<String, String>,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
            preference: Vec::new(),
            models: HashMap::new(),
        }
    }

    /// Providers to try, in order, after the default one fails.
    pub fn with_fallbacks(mut self, names: Vec<String>) -> Self {
        self.preference = names;
        self
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Pin the model a fallback provider is asked for.
    pub fn pin_model(&mut self, name: impl Into<String>, model: impl Into<String>) {
        self.models.insert(name.into(), model.into());
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// The provider the agent should use.
    ///
    /// Without fallbacks this is the default provider itself. With
    /// fallbacks it is a chain in preference order; names that were never
    /// registered are skipped with a warning.
    pub fn preferred(&self) -> Result<Arc<dyn Provider>, ProviderError> {
        let primary = self.default().ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "default provider '{}' is not registered",
                self.default_provider
            ))
        })?;

        if self.preference.is_empty() {
            return Ok(primary);
        }

        let mut chain = PreferenceChain::new().then(primary);
        for name in &self.preference {
            if name == &self.default_provider {
                continue;
            }
            chain = match (self.get(name), self.models.get(name)) {
                (Some(provider), Some(model)) => chain.then_with_model(provider, model),
                (Some(provider), None) => chain.then(provider),
                (None, _) => {
                    tracing::warn!(provider = %name, "Fallback provider not configured, skipping");
                    chain
                }
            };
        }
        Ok(Arc::new(chain))
    }

    /// List all registered provider names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Build providers from configuration.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider)
        .with_fallbacks(config.fallback_providers.clone());

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();

        let base_url = provider_config
            .api_url
            .clone()
            .unwrap_or_else(|| default_base_url(name));

        router.register(
            name.clone(),
            Arc::new(OpenAiCompatProvider::new(name, &base_url, &api_key)),
        );
    }

    // Default and fallback providers exist even if not explicitly configured
    let implicit = std::iter::once(&config.default_provider).chain(&config.fallback_providers);
    for name in implicit {
        if router.get(name).is_none() {
            let api_key = config.api_key.clone().unwrap_or_default();
            let base_url = default_base_url(name);
            router.register(
                name.clone(),
                Arc::new(OpenAiCompatProvider::new(name, &base_url, &api_key)),
            );
        }
    }

    for name in &config.fallback_providers {
        router.pin_model(name.clone(), model_for(config, name));
    }

    router
}

/// The model to request from a provider: its configured override, or the
/// global default.
pub fn model_for(config: &AppConfig, provider: &str) -> String {
    config
        .providers
        .get(provider)
        .and_then(|p| p.default_model.clone())
        .unwrap_or_else(|| config.default_model.clone())
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
