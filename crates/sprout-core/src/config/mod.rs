mod channels;
mod defaults;

#[cfg(test)]
mod tests;

pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SproutError;
use defaults::*;

/// Environment variable that overrides `channel.telegram.bot_token`.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Top-level Sprout configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sprout: SproutConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SproutConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file path. Empty = stdout only.
    #[serde(default)]
    pub log_file: String,
}

impl Default for SproutConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

/// Channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub telegram: Option<TelegramConfig>,
}

/// Database and connection-pool config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Maximum open connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept open while idle.
    #[serde(default)]
    pub min_connections: u32,
    #[serde(default = "default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            max_connections: default_max_connections(),
            min_connections: 0,
            max_lifetime_secs: default_max_lifetime_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

/// Notification scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Local hour (0-23) before which no notifications are sent.
    #[serde(default = "default_send_hour")]
    pub send_hour: u32,
    /// Page size of the due-scenario query.
    #[serde(default = "default_notify_limit")]
    pub notify_limit: i64,
    /// Offset of the first page.
    #[serde(default)]
    pub notify_offset: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: default_poll_interval(),
            send_hour: default_send_hour(),
            notify_limit: default_notify_limit(),
            notify_offset: 0,
        }
    }
}

impl Config {
    /// Reject values the scheduler and store cannot work with.
    pub fn validate(&self) -> Result<(), SproutError> {
        if self.scheduler.send_hour > 23 {
            return Err(SproutError::Config(format!(
                "scheduler.send_hour must be 0-23, got {}",
                self.scheduler.send_hour
            )));
        }
        if self.scheduler.notify_limit <= 0 {
            return Err(SproutError::Config(
                "scheduler.notify_limit must be positive".into(),
            ));
        }
        if self.scheduler.notify_offset < 0 {
            return Err(SproutError::Config(
                "scheduler.notify_offset must not be negative".into(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(SproutError::Config(
                "database.max_connections must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(BOT_TOKEN_ENV).filter(|t| !t.is_empty()) {
            let tg = self.channel.telegram.get_or_insert_with(|| TelegramConfig {
                enabled: true,
                ..Default::default()
            });
            tg.bot_token = token;
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Environment overrides
/// are applied and the result is validated.
pub fn load(path: &str) -> Result<Config, SproutError> {
    let path = Path::new(path);
    let mut config = if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    } else {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SproutError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| SproutError::Config(format!("failed to parse config: {}", e)))?
    };

    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
