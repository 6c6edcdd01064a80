//! Access token format validation.
//!
//! Validates tokens BEFORE the login command is dispatched so an obviously
//! broken credential never reaches the backend.

use crate::error::{AuthError, TokenFormatFailure};

use sm_common::RedactedAccessToken;

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// `<version>.<service account id>.<client secret>:<encryption key>`
const ACCESS_TOKEN_PATTERN: &str =
    r"^(?P<version>[^.:]+)\.(?P<id>[^.:]+)\.(?P<secret>[^.:]+):(?P<key>[^:\s]+)$";

const SUPPORTED_VERSION: &str = "0";

static ACCESS_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn access_token_regex() -> &'static Regex {
    ACCESS_TOKEN_REGEX
        .get_or_init(|| Regex::new(ACCESS_TOKEN_PATTERN).expect("valid regex pattern"))
}

/// A machine-account access token whose format has been checked.
#[derive(Clone)]
pub struct AccessToken {
    service_account_id: Uuid,
    token: RedactedAccessToken,
}

impl AccessToken {
    #[track_caller]
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AuthError::invalid_access_token(TokenFormatFailure::Empty));
        }

        let captures = access_token_regex()
            .captures(raw)
            .ok_or_else(|| AuthError::invalid_access_token(TokenFormatFailure::InvalidStructure))?;

        let (Some(version), Some(id)) = (captures.name("version"), captures.name("id")) else {
            return Err(AuthError::invalid_access_token(
                TokenFormatFailure::InvalidStructure,
            ));
        };

        let version = version.as_str();
        if version != SUPPORTED_VERSION {
            return Err(AuthError::invalid_access_token(
                TokenFormatFailure::UnsupportedVersion {
                    actual: version.to_string(),
                },
            ));
        }

        let service_account_id = Uuid::parse_str(id.as_str()).map_err(|_| {
            AuthError::invalid_access_token(TokenFormatFailure::InvalidServiceAccountId)
        })?;

        Ok(Self {
            service_account_id,
            token: RedactedAccessToken::new(raw),
        })
    }

    /// Safe to log.
    pub fn service_account_id(&self) -> Uuid {
        self.service_account_id
    }

    pub fn redacted(&self) -> &RedactedAccessToken {
        &self.token
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("service_account_id", &self.service_account_id)
            .field("token", &self.token)
            .finish()
    }
}
