//! Show or initialize the configuration file.

use std::path::Path;

use anyhow::bail;
use cursorhome_common::config::AppConfig;

pub fn run(config: &AppConfig, config_path: &Path, init: bool, force: bool) -> anyhow::Result<()> {
    if init {
        write_default(config_path, force)?;
        println!("Wrote default configuration to {}", config_path.display());
        return Ok(());
    }

    println!("# {}", config_path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    AppConfig::default().save_to(path)?;
    Ok(())
}
