//! `amalgam init` — Write a starter amalgam.toml.

use amalgam_config::AmalgamConfig;
use std::path::Path;

pub fn run(config_path: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = super::config_path(config_path);

    if path.exists() && !force {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Edit it manually or re-run with --force.\n");
        return Ok(());
    }

    write_starter(&path)?;
    println!("✅ Created {}", path.display());
    println!("\n📝 Next steps:");
    println!("   1. List your header and implementation files under [[library]]");
    println!("   2. Put a LICENSE file next to amalgam.toml");
    println!("   3. Run: amalgam build\n");

    Ok(())
}

/// Write the starter configuration, creating parent directories.
pub fn write_starter(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, AmalgamConfig::default_toml())
}
