use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::ResetTicket;
use crate::session::FileTokenStore;

/// Per-user CLI state that outlives one command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Path the guard turned away, for the post-login return
    pub return_to: Option<String>,
    /// Set by `auth verify-otp`, consumed by `auth reset-password`
    pub reset_ticket: Option<ResetTicket>,
    pub last_login: Option<DateTime<Utc>>,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("FU_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("fu-admin")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Token store at `<config dir>/session.json`
pub fn session_store() -> anyhow::Result<FileTokenStore> {
    Ok(FileTokenStore::in_dir(&get_config_dir()?))
}

pub fn load_environment_config() -> anyhow::Result<EnvironmentConfig> {
    let env_file = get_config_dir()?.join("env.json");

    if !env_file.exists() {
        return Ok(EnvironmentConfig::default());
    }

    let content = fs::read_to_string(env_file)?;
    let config: EnvironmentConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_environment_config(config: &EnvironmentConfig) -> anyhow::Result<()> {
    let env_file = get_config_dir()?.join("env.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(env_file, content)?;
    Ok(())
}

/// Loads, mutates and saves the environment config in one step
pub fn update_environment_config(change: impl FnOnce(&mut EnvironmentConfig)) -> anyhow::Result<EnvironmentConfig> {
    let mut config = load_environment_config()?;
    change(&mut config);
    save_environment_config(&config)?;
    Ok(config)
}
