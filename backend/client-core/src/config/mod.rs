pub mod settings;

pub use settings::{
    ClientSettings, DEFAULT_API_URL, DEFAULT_IDENTITY_URL, DEFAULT_USER_AGENT, DeviceType,
    DispatchConfig, LoggingConfig, RetryConfig,
};

use crate::error::config::ConfigError;

use sm_common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{LevelFilter, info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_DIR_NAME: &str = "secrets-client";
const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Self-hosted base URL. When set, overrides the API and identity URLs.
    #[serde(default)]
    pub server_base: Option<String>,

    #[serde(default)]
    pub settings: ClientSettings,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server_base: None,
            settings: ClientSettings::default(),
            dispatch: DispatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Platform config directory for this client (e.g. `~/.config/secrets-client`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
        })
}

impl ClientConfig {
    /// Settings actually handed to the backend, with `server_base` applied.
    pub fn effective_settings(&self) -> ClientSettings {
        match &self.server_base {
            Some(base) => ClientSettings {
                user_agent: self.settings.user_agent.clone(),
                device_type: self.settings.device_type,
                ..ClientSettings::from_server_base(base)
            },
            None => self.settings.clone(),
        }
    }

    /// Load config from {config_dir}/config.toml.
    ///
    /// Returns defaults when the file is missing, an error when it exists but is
    /// unreadable, unparsable, or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ClientConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/config.toml using temp file + rename.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
                location: ErrorLocation::from(Location::caller()),
                reason: e.to_string(),
            })?;

        std::fs::write(&temp_path, contents).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::validation(format!(
                "Invalid version: {} (expected 1-{})",
                self.version, CONFIG_VERSION
            )));
        }

        if let Some(ref base) = self.server_base {
            validate_url("server_base", base)?;
        }

        let settings = self.effective_settings();
        validate_url("api_url", &settings.api_url)?;
        validate_url("identity_url", &settings.identity_url)?;

        if settings.user_agent.trim().is_empty() {
            return Err(ConfigError::validation("user_agent cannot be empty"));
        }

        if self.dispatch.invoke_timeout_ms == Some(0) {
            return Err(ConfigError::validation("invoke_timeout_ms must be greater than 0"));
        }

        if let Some(ref retry) = self.dispatch.retry {
            if self.dispatch.invoke_timeout_ms.is_none() {
                return Err(ConfigError::validation(
                    "retry requires invoke_timeout_ms: only timeouts are retried",
                ));
            }

            if retry.initial_interval_ms == 0 || retry.max_elapsed_ms < retry.initial_interval_ms {
                return Err(ConfigError::validation(format!(
                    "Invalid retry window: initial {}ms, max elapsed {}ms",
                    retry.initial_interval_ms, retry.max_elapsed_ms
                )));
            }
        }

        if self.logging.level.parse::<LevelFilter>().is_err() {
            return Err(ConfigError::validation(format!(
                "Invalid logging level '{}': expected off, error, warn, info, debug or trace",
                self.logging.level
            )));
        }

        Ok(())
    }
}

fn validate_url(field: &str, raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::validation(format!("Invalid {field} '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::validation(format!(
            "Invalid {field} scheme '{other}': expected http or https"
        ))),
    }
}
