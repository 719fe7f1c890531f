//! `amalgam config` — Configuration management commands.

use std::path::Path;

pub fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match super::load_config(config_path) {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if config.libraries.is_empty() {
                warnings.push("No [[library]] tables defined".to_string());
            }

            for lib in &config.libraries {
                if lib.sources.is_empty() {
                    warnings.push(format!(
                        "Library '{}' has no sources; its implementation section will be empty",
                        lib.name
                    ));
                }
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Output dir:  {}", config.output_dir.display());
            println!("   License:     {}", config.license.display());
            println!("   Write mode:  {}", config.write_mode);
            println!("   Libraries:   {}", config.libraries.len());
            for plan in config.plans() {
                println!(
                    "     - {} → {} (#ifdef {})",
                    plan.name,
                    plan.output_path().display(),
                    plan.name.guard_macro()
                );
            }
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub fn show(config_path: Option<&Path>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&config.plans())?);
    } else {
        println!("{}", toml::to_string_pretty(&config)?);
    }
    Ok(())
}

pub fn path(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", super::config_path(config_path).display());
    Ok(())
}
