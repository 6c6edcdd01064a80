//! Loads the access token from the process environment or a `.env` file.

use super::AccessToken;
use crate::error::AuthError;

use std::env;
use std::path::PathBuf;

use log::{debug, info, warn};

/// Read `var` as an access token.
///
/// A `.env` file is loaded first if one is found (current directory, then the
/// executable's directory); variables already set in the environment win.
#[track_caller]
pub fn access_token_from_env(var: &str) -> Result<AccessToken, AuthError> {
    if try_load_dotenv().is_none() {
        debug!("No .env file found - will check existing environment variables");
    }

    match env::var(var) {
        Ok(value) => {
            let token = AccessToken::parse(&value)?;
            info!(
                "Found access token for service account {} (from {}, {} chars)",
                token.service_account_id(),
                var,
                token.redacted().len()
            );
            Ok(token)
        }
        Err(env::VarError::NotPresent) => Err(AuthError::env_load(format!("{var} is not set"))),
        Err(env::VarError::NotUnicode(_)) => {
            warn!("Env var {var} contains invalid unicode");
            Err(AuthError::env_load(format!("{var} contains invalid unicode")))
        }
    }
}

/// Attempts to load .env from known locations. Returns the file used.
fn try_load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {:?}", path);
        return Some(path);
    }

    let exe_path = env::current_exe().ok()?;
    let env_path = exe_path.parent()?.join(".env");
    if !env_path.exists() {
        return None;
    }

    match dotenvy::from_path(&env_path) {
        Ok(()) => {
            info!("Loaded .env from: {:?}", env_path);
            Some(env_path)
        }
        Err(e) => {
            warn!("Failed to parse .env at {:?}: {}", env_path, e);
            None
        }
    }
}
