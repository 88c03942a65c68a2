pub mod capabilities;
pub mod doctor;
pub mod onboard;
pub mod run;
pub mod status;

use ladle_capabilities::{
    RecipeContext, RequirementAnalyzer, SpoonacularClient, default_registry, task_images_dir,
};
use ladle_config::AppConfig;
use ladle_core::capability::CapabilityRegistry;
use ladle_core::provider::Provider;
use ladle_core::task::TaskId;
use ladle_providers::router::{build_from_config, model_for};
use std::sync::Arc;

/// The collaborators a run needs, built from config.
pub struct Wiring {
    pub provider: Arc<dyn Provider>,
    pub model: String,
    pub registry: Arc<CapabilityRegistry>,
}

/// Build the provider chain, the recipe client and the capability registry.
/// Card images for `task` are saved under their own directory.
pub fn wire(config: &AppConfig, task: &TaskId) -> Result<Wiring, Box<dyn std::error::Error>> {
    let router = build_from_config(config);
    let provider = router.preferred()?;
    let model = model_for(config, &config.default_provider);

    let ctx = RecipeContext {
        api: Arc::new(SpoonacularClient::from_config(&config.recipes)),
        analyzer: Arc::new(RequirementAnalyzer::new(provider.clone(), &model)),
        images_dir: task_images_dir(&config.recipes.data_dir(), task),
    };
    let registry = default_registry(&ctx)?;

    Ok(Wiring {
        provider,
        model,
        registry: Arc::new(registry),
    })
}

/// Explain how to supply the keys a run needs. Returns an error naming
/// the first missing one.
pub fn require_keys(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_dir().join("config.toml");

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No model API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    OPENAI_API_KEY=sk-...            (for OpenAI direct)");
        eprintln!("    OPENROUTER_API_KEY=sk-or-v1-...  (with LADLE_PROVIDER=openrouter)");
        eprintln!("    LADLE_API_KEY=...                (generic)");
        eprintln!();
        eprintln!("  Or add api_key to {}", config_path.display());
        eprintln!();
        return Err("No model API key found. See above for setup instructions.".into());
    }

    if !config.has_recipes_key() {
        eprintln!();
        eprintln!("  ERROR: No Spoonacular API key configured!");
        eprintln!();
        eprintln!("  Set SPOONACULAR_API_KEY, or add it under [recipes] in");
        eprintln!("    {}", config_path.display());
        eprintln!();
        eprintln!("  Get a key at: https://spoonacular.com/food-api/console");
        eprintln!();
        return Err("No Spoonacular API key found. See above for setup instructions.".into());
    }

    Ok(())
}
