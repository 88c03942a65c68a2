//! `ladle capabilities`: List the capabilities offered to the model.

use ladle_config::AppConfig;
use ladle_core::task::TaskId;
use ladle_core::capability::CapabilitySchema;

pub async fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let wiring = super::wire(&config, &TaskId::new())?;
    let schema = wiring.registry.schema();

    if json {
        println!("{}", schema.to_prompt_json());
    } else {
        print!("{}", table(&schema));
    }
    Ok(())
}

fn table(schema: &CapabilitySchema) -> String {
    let mut out = String::from("🧰 Capabilities\n===============\n");
    for descriptor in &schema.0 {
        let kind = serde_json::to_value(descriptor.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        out.push_str(&format!("\n  {} ({kind})\n", descriptor.name));

        let params = descriptor.parameters["properties"]
            .as_object()
            .map(|p| p.keys().cloned().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        out.push_str(&format!("    parameters: {params}\n"));
        out.push_str(&format!("    {}\n", descriptor.description));
    }
    out
}
