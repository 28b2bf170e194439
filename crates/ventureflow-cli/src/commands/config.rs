use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use ventureflow_core::config::{Config, ConfigPaths};

pub fn init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match config_path {
        Some(path) => path,
        None => ConfigPaths::resolve()?.config_path,
    };
    if path.exists() && !force {
        bail!("config already exists at {} (use --force)", path.display());
    }
    Config::default_config().save(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn print_effective(config_path: Option<PathBuf>) -> Result<()> {
    let path = match config_path {
        Some(path) => path,
        None => ConfigPaths::resolve()?.config_path,
    };
    let config = if path.exists() {
        Config::load(&path).with_context(|| format!("load config {}", path.display()))?
    } else {
        Config::default_config()
    };
    println!("{}", config.to_toml_string()?);
    Ok(())
}
