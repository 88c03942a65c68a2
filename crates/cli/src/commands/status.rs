//! `ladle status`: Show configuration status.

use ladle_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let set = |present: bool| if present { "set" } else { "not set" };

    println!("🥄 Ladle Status");
    println!("===============");
    println!("  Config dir:     {}", AppConfig::config_dir().display());
    println!("  Provider:       {}", config.default_provider);
    if !config.fallback_providers.is_empty() {
        println!("  Fallbacks:      {}", config.fallback_providers.join(", "));
    }
    println!("  Model:          {}", config.default_model);
    println!("  Temperature:    {}", config.default_temperature);
    println!("  Max steps:      {}", config.agent.max_steps);
    println!("  Step cooldown:  {} ms", config.agent.step_cooldown_ms);
    println!("  Model attempts: {}", config.agent.selection_attempts);
    println!("  Recipe API:     {}", config.recipes.base_url);
    println!("  Data dir:       {}", config.recipes.data_dir().display());
    println!("  Model key:      {}", set(config.has_api_key()));
    println!("  Recipe key:     {}", set(config.has_recipes_key()));

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file. Run `ladle onboard` first");
    }

    Ok(())
}
