use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use ventureflow_core::config::{Config, ConfigPaths};
use ventureflow_core::events::EventBus;
use ventureflow_core::store::KvStore;

pub mod config;
pub mod data;
pub mod history;
pub mod launch;
pub mod project;
pub mod status;
pub mod task;

/// Loads the effective config: an explicit --config path must exist,
/// the default location falls back to built-in defaults when absent.
pub fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => {
            Config::load(&path).with_context(|| format!("load config {}", path.display()))
        }
        None => {
            let paths = ConfigPaths::resolve()?;
            if paths.config_path.exists() {
                Config::load(&paths.config_path)
            } else {
                Ok(Config::default_config())
            }
        }
    }
}

pub fn open_store() -> Result<Arc<KvStore>> {
    let paths = ConfigPaths::resolve()?;
    Ok(Arc::new(KvStore::open(&paths.store_path)?))
}

pub fn open_workspace() -> Result<task_store::Workspace> {
    let store = open_store()?;
    Ok(task_store::Workspace::new(store, Arc::new(EventBus::new())))
}
