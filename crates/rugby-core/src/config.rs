//! Configuration file loading for the bot and the admin panel.
//!
//! Both binaries read the same TOML file. Every field has a default so a
//! missing file or section still yields a usable configuration; secrets
//! can come from the environment instead of the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides `bot.token`.
pub const TOKEN_ENV: &str = "RUGBY_BOT_TOKEN";
/// Environment variable that overrides `admin.password_sha256`.
pub const PASSWORD_ENV: &str = "RUGBY_ADMIN_PASSWORD_SHA256";

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A setting required by the running binary is absent.
    #[error("Missing setting: {0}")]
    Missing(&'static str),
}

/// Chat bot settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BotSettings {
    /// Bot API token. Usually supplied through [`TOKEN_ENV`].
    #[serde(default)]
    pub token: Option<String>,
    /// Broadcast channel for published results: numeric id or `@username`.
    #[serde(default)]
    pub channel: Option<String>,
    /// Users who are registered as approved admins on `/start`.
    #[serde(default)]
    pub admin_ids: Vec<i64>,
    /// Long-poll timeout for fetching updates.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
    /// Base URL of the bot API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            token: None,
            channel: None,
            admin_ids: Vec::new(),
            poll_timeout_secs: default_poll_timeout(),
            api_url: default_api_url(),
        }
    }
}

/// Admin panel settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminSettings {
    /// Socket address the panel listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_username")]
    pub username: String,
    /// Lowercase hex SHA-256 of the admin password.
    #[serde(default)]
    pub password_sha256: Option<String>,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: i64,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_session_ttl() -> i64 {
    8 * 60
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            username: default_username(),
            password_sha256: None,
            session_ttl_minutes: default_session_ttl(),
        }
    }
}

/// Main configuration structure.
///
/// Uses `rugby.toml` in the current directory unless a path is given.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RugbyConfig {
    /// Directory holding the JSON collections.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// How long file reads are served from memory.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Number of results shown by the list command.
    #[serde(default = "default_results_page")]
    pub results_page: usize,
    #[serde(default)]
    pub bot: BotSettings,
    #[serde(default)]
    pub admin: AdminSettings,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_cache_ttl() -> u64 {
    5
}

fn default_results_page() -> usize {
    10
}

impl Default for RugbyConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cache_ttl_secs: default_cache_ttl(),
            results_page: default_results_page(),
            bot: BotSettings::default(),
            admin: AdminSettings::default(),
        }
    }
}

impl RugbyConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("rugby.toml")
    }

    /// Loads configuration from `path`, then applies environment overrides.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if it contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overrides secrets from the environment; `lookup` maps a variable
    /// name to its value.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.bot.token = Some(token);
        }
        if let Some(hash) = lookup(PASSWORD_ENV).filter(|v| !v.is_empty()) {
            self.admin.password_sha256 = Some(hash.to_lowercase());
        }
    }

    /// The bot token, required by the bot binary.
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.bot.token.as_deref().ok_or(ConfigError::Missing("bot.token"))
    }

    /// How long file reads are cached.
    pub fn cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
data_dir = "/var/lib/rugby"
cache_ttl_secs = 10
results_page = 5

[bot]
token = "123:abc"
channel = "@club_results"
admin_ids = [1, 2]
poll_timeout_secs = 50

[admin]
bind = "0.0.0.0:9000"
username = "club"
password_sha256 = "deadbeef"
session_ttl_minutes = 60
"#;

        let config: RugbyConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/rugby"));
        assert_eq!(config.cache_ttl_secs, 10);
        assert_eq!(config.results_page, 5);
        assert_eq!(config.bot.token.as_deref(), Some("123:abc"));
        assert_eq!(config.bot.channel.as_deref(), Some("@club_results"));
        assert_eq!(config.bot.admin_ids, vec![1, 2]);
        assert_eq!(config.bot.poll_timeout_secs, 50);
        assert_eq!(config.admin.bind, "0.0.0.0:9000");
        assert_eq!(config.admin.username, "club");
        assert_eq!(config.admin.password_sha256.as_deref(), Some("deadbeef"));
        assert_eq!(config.admin.session_ttl_minutes, 60);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: RugbyConfig = toml::from_str("").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.cache_ttl_secs, 5);
        assert_eq!(config.results_page, 10);
        assert!(config.bot.token.is_none());
        assert_eq!(config.bot.poll_timeout_secs, 30);
        assert_eq!(config.bot.api_url, "https://api.telegram.org");
        assert_eq!(config.admin.bind, "127.0.0.1:8080");
        assert_eq!(config.admin.username, "admin");
    }

    #[test]
    fn test_env_overrides_secrets() {
        let mut config = RugbyConfig::default();
        config.apply_env(|key| match key {
            TOKEN_ENV => Some("env-token".to_string()),
            PASSWORD_ENV => Some("ABCDEF".to_string()),
            _ => None,
        });
        assert_eq!(config.token().unwrap(), "env-token");
        assert_eq!(config.admin.password_sha256.as_deref(), Some("abcdef"));
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let mut config: RugbyConfig = toml::from_str("[bot]\ntoken = \"file\"").unwrap();
        config.apply_env(|_| Some(String::new()));
        assert_eq!(config.token().unwrap(), "file");
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let config = RugbyConfig::default();
        assert!(matches!(config.token(), Err(ConfigError::Missing("bot.token"))));
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RugbyConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.results_page, 10);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_dir = [").unwrap();
        assert!(matches!(
            RugbyConfig::load(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }
}
