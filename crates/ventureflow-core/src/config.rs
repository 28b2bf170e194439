use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::types::TaskPriority;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gate: GateConfig,
    pub session: SessionConfig,
    pub defaults: DefaultsConfig,
    pub reminders: ReminderConfig,
}

/// Launch-time gate probe settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Remote endpoint probed once per launch. Empty means unconfigured,
    /// which resolves to the native surface without any network attempt.
    pub endpoint: String,
    pub probe_timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// The original target URL for the web surface. The persisted
    /// last-navigated URL takes precedence on later launches.
    pub target_url: String,
    pub watchdog_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub priority: TaskPriority,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub deadline_reminders_enabled: bool,
    pub frequency: ReminderFrequency,
    pub reminder_hour: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    Daily,
    Weekly,
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
    pub store_path: PathBuf,
}

pub const MOBILE_SAFARI_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

impl Config {
    pub fn default_config() -> Self {
        Self {
            gate: GateConfig {
                endpoint: String::new(),
                probe_timeout_secs: 10,
                user_agent: MOBILE_SAFARI_USER_AGENT.to_string(),
                accept_language: "ru-RU,ru;q=0.9,en;q=0.8".to_string(),
            },
            session: SessionConfig {
                target_url: String::new(),
                watchdog_secs: 5,
            },
            defaults: DefaultsConfig {
                priority: TaskPriority::Medium,
                category: "Personal".to_string(),
            },
            reminders: ReminderConfig {
                deadline_reminders_enabled: true,
                frequency: ReminderFrequency::Daily,
                reminder_hour: 9,
            },
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parse config TOML")?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let output = toml::to_string_pretty(self).context("render config TOML")?;
        Ok(output)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        let contents = self.to_toml_string()?;
        fs::write(path, contents).with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }
}

impl ConfigPaths {
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("io", "ventureflow", "ventureflow")
            .ok_or_else(|| anyhow::anyhow!("unable to determine project directories"))?;
        let config_dir = project_dirs.config_dir();
        let data_dir = project_dirs.data_dir();
        Ok(Self {
            config_path: config_dir.join("config.toml"),
            data_dir: data_dir.to_path_buf(),
            store_path: data_dir.join("defaults.json"),
        })
    }
}
