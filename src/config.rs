use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_OUTPUT_WIDTH, JOB_STATUS_INITIAL_DELAY_MS,
    JOB_STATUS_MAX_ATTEMPTS, JOB_STATUS_MAX_DELAY_MS, POLL_DELAY_MS,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub poll: PollConfig,
    /// Application credentials for token generation
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub alerts: AlertConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout (None = no timeout)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

/// How the pipeline waits between submission and the result poll
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PollStrategy {
    /// Sleep for `delay_ms`, then poll once
    #[default]
    Fixed,
    /// Check the job status with backoff until it completes, then poll once
    UntilReady,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default)]
    pub strategy: PollStrategy,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            strategy: PollStrategy::default(),
            delay_ms: default_delay_ms(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl PollConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symbl application id; the secret comes from the environment or keyring
    #[serde(default)]
    pub app_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pane markup converted to wrapped terminal text
    #[default]
    Text,
    /// Raw pane markup
    Html,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_output_width")]
    pub width: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            width: default_output_width(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Also show alerts as desktop notifications
    #[serde(default)]
    pub desktop: bool,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_delay_ms() -> u64 {
    POLL_DELAY_MS
}

fn default_initial_delay_ms() -> u64 {
    JOB_STATUS_INITIAL_DELAY_MS
}

fn default_max_delay_ms() -> u64 {
    JOB_STATUS_MAX_DELAY_MS
}

fn default_max_attempts() -> u32 {
    JOB_STATUS_MAX_ATTEMPTS
}

fn default_output_width() -> usize {
    DEFAULT_OUTPUT_WIDTH
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("mailsense");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it does not exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let dir = Self::config_dir()?;

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "https://api.symbl.ai");
        assert_eq!(config.api.request_timeout_secs, None);
        assert_eq!(config.poll.strategy, PollStrategy::Fixed);
        assert_eq!(config.poll.delay(), Duration::from_millis(3000));
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(!config.alerts.desktop);
        assert!(config.auth.app_id.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [api]
            base_url = "http://localhost:8080"
            request_timeout_secs = 20

            [poll]
            strategy = "until-ready"
            delay_ms = 1500
            max_attempts = 4

            [auth]
            app_id = "my-app"

            [output]
            format = "html"
            width = 72

            [alerts]
            desktop = true
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.request_timeout_secs, Some(20));
        assert_eq!(config.poll.strategy, PollStrategy::UntilReady);
        assert_eq!(config.poll.delay_ms, 1500);
        assert_eq!(config.poll.max_attempts, 4);
        assert_eq!(config.poll.initial_delay_ms, JOB_STATUS_INITIAL_DELAY_MS);
        assert_eq!(config.auth.app_id.as_deref(), Some("my-app"));
        assert_eq!(config.output.format, OutputFormat::Html);
        assert_eq!(config.output.width, 72);
        assert!(config.alerts.desktop);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let result: Result<Config, _> = toml::from_str("[poll]\nstrategy = \"webhook\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut config = Config::default();
        config.poll.strategy = PollStrategy::UntilReady;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.poll.strategy, PollStrategy::UntilReady);
    }
}
