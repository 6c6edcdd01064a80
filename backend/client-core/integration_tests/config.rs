use crate::helpers::{TEST_ACCESS_TOKEN, client, memory_backend};

use sm_client_core::ACCESS_TOKEN_ENV_VAR;
use sm_client_core::SecretsManagerClient;
use sm_client_core::config::{ClientConfig, DispatchConfig, LoggingConfig, RetryConfig};
use sm_client_core::error::{AuthError, ClientError};
use sm_client_core::session::SessionState;

use std::fs::{read_to_string, write};
use std::sync::Arc;

use serial_test::serial;
use tempfile::TempDir;

/// Sets an env var for the lifetime of the guard.
struct EnvGuard {
    var: &'static str,
}

impl EnvGuard {
    fn set(var: &'static str, value: &str) -> Self {
        // SAFETY: every test touching the environment runs under #[serial].
        unsafe { std::env::set_var(var, value) };
        Self { var }
    }

    fn unset(var: &'static str) -> Self {
        // SAFETY: see `set`.
        unsafe { std::env::remove_var(var) };
        Self { var }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: see `set`.
        unsafe { std::env::remove_var(self.var) };
    }
}

/// **VALUE**: Verifies a saved config file drives the settings handed to the backend.
///
/// **WHY THIS MATTERS**: Self-hosted deployments configure a server base once on disk.
/// If the loaded config were ignored the client would talk to the public cloud.
///
/// **BUG THIS CATCHES**: Would catch server_base not being expanded into the API and
/// identity URLs on the load path.
#[tokio::test]
async fn given_saved_self_hosted_config_when_client_built_then_backend_gets_expanded_urls() {
    // GIVEN: A config with a server base and a dispatch timeout saved to disk
    let temp = TempDir::new().unwrap();
    let config = ClientConfig {
        server_base: Some("https://vault.example.com/".to_string()),
        dispatch: DispatchConfig {
            invoke_timeout_ms: Some(5_000),
            retry: Some(RetryConfig::default()),
        },
        ..ClientConfig::default()
    };
    config.save(temp.path()).unwrap();

    // WHEN: Loading it and building a client
    let loaded = ClientConfig::load(temp.path()).unwrap();
    let backend = memory_backend();
    let mut client = SecretsManagerClient::new(Arc::clone(&backend), &loaded).unwrap();

    // THEN: The backend received the expanded settings, and the client works
    let settings = backend.settings_received().unwrap();
    assert_eq!(settings.api_url, "https://vault.example.com/api");
    assert_eq!(settings.identity_url, "https://vault.example.com/identity");
    client.login(TEST_ACCESS_TOKEN).await.unwrap();
    assert_eq!(client.session_state(), SessionState::Authenticated);
}

/// **VALUE**: Verifies the host entry point installs the configured file logger before the
/// client is built.
///
/// **WHY THIS MATTERS**: Hosts that never call the logger themselves rely on the
/// `[logging]` table alone. Construction is the first thing worth a log line.
///
/// **BUG THIS CATCHES**: Would catch the `[logging]` table being parsed but never applied,
/// or logging being installed only after the backend handle was acquired.
#[tokio::test]
async fn given_logging_table_when_client_built_from_config_dir_then_log_file_written() {
    // GIVEN: A saved config that logs to a file in its own directory
    let temp = TempDir::new().unwrap();
    let config = ClientConfig {
        logging: LoggingConfig {
            level: "debug".to_string(),
            stdout: false,
            file: true,
            log_dir: Some(temp.path().join("logs")),
        },
        ..ClientConfig::default()
    };
    config.save(temp.path()).unwrap();

    // WHEN: Building the client from the directory
    let backend = memory_backend();
    let client = SecretsManagerClient::from_config_dir(Arc::clone(&backend), temp.path()).unwrap();
    log::logger().flush();

    // THEN: The construction record is in the configured file
    let contents = read_to_string(temp.path().join("logs").join("secrets-client.log")).unwrap();
    assert!(contents.contains("Secrets client ready"), "log file: {contents}");
    assert_eq!(backend.init_count(), 1);
    assert!(!client.is_closed());
}

#[test]
fn given_unknown_logging_level_on_disk_when_client_built_from_config_dir_then_config_error() {
    let temp = TempDir::new().unwrap();
    write(temp.path().join("config.toml"), "[logging]\nlevel = \"loud\"\n").unwrap();
    let backend = memory_backend();

    let error = SecretsManagerClient::from_config_dir(Arc::clone(&backend), temp.path())
        .unwrap_err();

    assert_eq!(error.error_category(), "config");
    assert_eq!(backend.init_count(), 0);
}

/// **VALUE**: Verifies login_from_env reads the access token variable.
///
/// **BUG THIS CATCHES**: Would catch the wrong variable name or the token being parsed
/// from something other than the variable.
#[tokio::test]
#[serial]
async fn given_token_in_env_when_login_from_env_then_authenticated() {
    let _guard = EnvGuard::set(ACCESS_TOKEN_ENV_VAR, TEST_ACCESS_TOKEN);
    let backend = memory_backend();
    let mut client = client(Arc::clone(&backend));

    client.login_from_env().await.unwrap();

    assert_eq!(client.session_state(), SessionState::Authenticated);
}

/// **VALUE**: Verifies a missing variable fails before anything is dispatched.
///
/// **BUG THIS CATCHES**: Would catch an empty token being sent to the backend.
#[tokio::test]
#[serial]
async fn given_no_token_in_env_when_login_from_env_then_env_load_error() {
    let _guard = EnvGuard::unset(ACCESS_TOKEN_ENV_VAR);
    let backend = memory_backend();
    let mut client = client(Arc::clone(&backend));

    let err = client.login_from_env().await.unwrap_err();

    assert!(matches!(err, ClientError::Auth(AuthError::EnvLoad { .. })));
    assert_eq!(backend.invocation_count(), 0);
    assert_eq!(client.session_state(), SessionState::Unauthenticated);
}
