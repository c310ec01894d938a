use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_NOTIFICATION_DURATION_MS: u64 = 3000;
pub const ENV_PREFIX: &str = "CLINIC";

/// Console settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base address of the clinic API gateway
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// How long a notification stays on screen
    pub notification_duration_ms: u64,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            notification_duration_ms: DEFAULT_NOTIFICATION_DURATION_MS,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ConsoleConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_duration_ms)
    }

    /// Check the settings and normalise the base URL (no trailing slash).
    pub fn validated(mut self) -> Result<Self> {
        let url = self.api_base_url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api_base_url must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        let host = url.split("://").nth(1).unwrap_or_default();
        if host.is_empty() {
            return Err(ConfigError::ValidationError(
                "api_base_url has no host".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.notification_duration_ms == 0 {
            return Err(ConfigError::ValidationError(
                "notification_duration_ms must be positive".to_string(),
            ));
        }
        self.api_base_url = url;
        Ok(self)
    }
}

/// Layered configuration loader
#[derive(Debug, Clone)]
pub struct ConfigEngine {
    file: Option<PathBuf>,
    search_default_file: bool,
    env_prefix: Option<String>,
}

impl Default for ConfigEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigEngine {
    pub fn new() -> Self {
        Self {
            file: None,
            search_default_file: true,
            env_prefix: Some(ENV_PREFIX.to_string()),
        }
    }

    /// Read this file instead of the default location. It must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn without_default_file(mut self) -> Self {
        self.search_default_file = false;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    pub fn load(&self) -> Result<ConsoleConfig> {
        let mut builder = Config::builder();

        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(ConfigError::SourceNotFound(path.display().to_string()));
            }
            debug!(path = %path.display(), "Loading console configuration file");
            builder = builder.add_source(File::from(path.as_path()).required(true));
        } else if self.search_default_file {
            if let Some(stem) = default_config_stem() {
                debug!(path = %stem.display(), "Looking for default console configuration");
                builder = builder
                    .add_source(File::with_name(&stem.to_string_lossy()).required(false));
            }
        }

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(Environment::with_prefix(prefix).try_parsing(true));
        }

        let config: ConsoleConfig = builder.build()?.try_deserialize()?;
        config.validated()
    }
}

/// Load with the default layering and an optional explicit file.
pub fn load(path: Option<&Path>) -> Result<ConsoleConfig> {
    match path {
        Some(path) => ConfigEngine::new().with_file(path).load(),
        None => ConfigEngine::new().load(),
    }
}

/// `<config dir>/clinic-console`, without extension so every supported
/// format is probed.
fn default_config_stem() -> Option<PathBuf> {
    ProjectDirs::from("dev", "rustcare", "clinic-console")
        .map(|dirs| dirs.config_dir().join("clinic-console"))
}
