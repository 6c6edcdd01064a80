use const_format::concatcp;
use serde::{Deserialize, Serialize};

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER_HOST: &str = "bitwarden.com";
pub const DEFAULT_API_URL: &str = concatcp!("https://api.", DEFAULT_SERVER_HOST);
pub const DEFAULT_IDENTITY_URL: &str = concatcp!("https://identity.", DEFAULT_SERVER_HOST);
pub const DEFAULT_USER_AGENT: &str = "Secrets Manager Rust Client";

const API_PATH: &str = "/api";
const IDENTITY_PATH: &str = "/identity";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[default]
    Sdk,
    Cli,
    Server,
}

/// Backend connection settings.
///
/// Opaque to the client core: serialized into the settings envelope and handed
/// to the backend's `init` unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientSettings {
    #[serde(default = "default_identity_url")]
    pub identity_url: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub device_type: DeviceType,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            identity_url: default_identity_url(),
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            device_type: DeviceType::default(),
        }
    }
}

impl ClientSettings {
    /// Settings for a self-hosted server exposing `/api` and `/identity` under one base URL.
    pub fn from_server_base(server_base: &str) -> Self {
        let base = server_base.trim_end_matches('/');
        Self {
            identity_url: format!("{base}{IDENTITY_PATH}"),
            api_url: format!("{base}{API_PATH}"),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    #[serde(default = "default_initial_interval_ms")]
    pub initial_interval_ms: u64,
    #[serde(default = "default_max_elapsed_ms")]
    pub max_elapsed_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: default_initial_interval_ms(),
            max_elapsed_ms: default_max_elapsed_ms(),
        }
    }
}

impl RetryConfig {
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn max_elapsed(&self) -> Duration {
        Duration::from_millis(self.max_elapsed_ms)
    }
}

/// Dispatcher behavior. The default is one invoke per call with no timeout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DispatchConfig {
    #[serde(default)]
    pub invoke_timeout_ms: Option<u64>,
    /// Retries read-only commands after a timeout. Requires `invoke_timeout_ms`.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl DispatchConfig {
    pub fn invoke_timeout(&self) -> Option<Duration> {
        self.invoke_timeout_ms.map(Duration::from_millis)
    }
}

/// Host-side logging installed by [`crate::logger::initialize`].
///
/// `level` applies to the client's own crates; other crates log at `warn` and above.
/// With both outputs off nothing is installed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_enabled")]
    pub stdout: bool,
    #[serde(default = "default_enabled")]
    pub file: bool,
    /// Directory for `secrets-client.log`. Defaults to the platform config directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            stdout: default_enabled(),
            file: default_enabled(),
            log_dir: None,
        }
    }
}

fn default_identity_url() -> String {
    DEFAULT_IDENTITY_URL.to_string()
}
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_initial_interval_ms() -> u64 {
    100
}
fn default_max_elapsed_ms() -> u64 {
    2_000
}
fn default_log_level() -> String {
    String::from("info")
}
fn default_enabled() -> bool {
    true
}
