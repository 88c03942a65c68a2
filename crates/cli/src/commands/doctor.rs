//! `ladle doctor`: Diagnose setup problems.

use ladle_config::AppConfig;
use ladle_core::task::TaskId;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Ladle Doctor: Setup Diagnostics");
    println!("===================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults; run `ladle onboard` to create one");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    if config.has_api_key() {
        println!("  ✅ Model API key configured");
    } else {
        println!("  ❌ No model API key; set OPENAI_API_KEY or api_key in config.toml");
        issues += 1;
    }

    if config.has_recipes_key() {
        println!("  ✅ Spoonacular API key configured");
    } else {
        println!("  ❌ No Spoonacular API key; set SPOONACULAR_API_KEY or [recipes] api_key");
        issues += 1;
    }

    let data_dir = config.recipes.data_dir();
    if data_dir.exists() {
        println!("  ✅ Data directory exists: {}", data_dir.display());
    } else {
        println!("  ⚠️  No data directory yet ({}); it is created on first download", data_dir.display());
    }

    // Needs a key to ask anything
    if config.has_api_key() {
        match super::wire(&config, &TaskId::new()) {
            Ok(wiring) => match wiring.provider.health_check().await {
                Ok(true) => {
                    println!("  ✅ Provider '{}' reachable", wiring.provider.name());
                    match wiring.provider.list_models().await {
                        Ok(models) => {
                            let line = model_check(&wiring.model, &models);
                            if line.starts_with("  ❌") {
                                issues += 1;
                            }
                            println!("{line}");
                        }
                        Err(e) => println!("  ⚠️  Could not list models: {e}"),
                    }
                }
                Ok(false) => {
                    println!("  ❌ Provider '{}' rejected the request", wiring.provider.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider unreachable: {e}");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ Could not set up the agent: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// Whether the provider offers the configured model. Some backends do not
/// publish a model list; an empty list is only a warning.
fn model_check(model: &str, offered: &[String]) -> String {
    if offered.is_empty() {
        format!("  ⚠️  Provider did not list its models; cannot confirm '{model}'")
    } else if offered.iter().any(|m| m == model) {
        format!("  ✅ Model '{model}' is offered")
    } else {
        format!(
            "  ❌ Model '{model}' is not offered ({} models listed); set default_model",
            offered.len()
        )
    }
}
