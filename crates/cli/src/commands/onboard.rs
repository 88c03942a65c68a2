//! `ladle onboard`: First-time setup.

use ladle_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🥄 Ladle: First-Time Setup");
    println!("==========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    let images_dir = AppConfig::default().recipes.data_dir().join("images");
    if !images_dir.exists() {
        std::fs::create_dir_all(&images_dir)?;
        println!("✅ Created recipe card directory: {}", images_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Add your model API key (api_key) and Spoonacular key ([recipes] api_key)");
        println!("      to {}, or export OPENAI_API_KEY and SPOONACULAR_API_KEY", config_path.display());
        println!("   2. Run: ladle run \"find a vegetarian soup recipe with tomato, no eggs\"\n");
    }

    println!("🎉 Setup complete!\n");
    Ok(())
}
