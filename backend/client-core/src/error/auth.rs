//! Error types for session and access-token handling.
//!
//! - Every variant carries an ErrorLocation
//! - None of them ever include the token value

use crate::session::SessionState;

use sm_common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AuthError {
    #[error("Not Authenticated: '{operation}' requires an authenticated session (state: {state}) {location}")]
    NotAuthenticated {
        operation: &'static str,
        state: SessionState,
        location: ErrorLocation,
    },

    #[error("Already Authenticated: login refused on an authenticated session {location}")]
    AlreadyAuthenticated { location: ErrorLocation },

    #[error("Session Terminated: login refused, session is {state} {location}")]
    SessionTerminated {
        state: SessionState,
        location: ErrorLocation,
    },

    #[error("Invalid Access Token: {reason} {location}")]
    InvalidAccessToken {
        reason: TokenFormatFailure,
        location: ErrorLocation,
    },

    #[error("Login Rejected: backend did not authenticate the session {location}")]
    LoginRejected { location: ErrorLocation },

    #[error("Environment load failed: {message} {location}")]
    EnvLoad {
        message: String,
        location: ErrorLocation,
    },
}

/// Specific reasons an access token was rejected before reaching the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenFormatFailure {
    Empty,
    UnsupportedVersion { actual: String },
    InvalidStructure,
    InvalidServiceAccountId,
}

impl std::fmt::Display for TokenFormatFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "token is empty"),
            Self::UnsupportedVersion { actual } => {
                write!(f, "unsupported token version '{}'", actual)
            }
            Self::InvalidStructure => {
                write!(f, "expected '<version>.<id>.<secret>:<key>'")
            }
            Self::InvalidServiceAccountId => write!(f, "service account id is not a UUID"),
        }
    }
}

impl AuthError {
    #[track_caller]
    pub fn not_authenticated(operation: &'static str, state: SessionState) -> Self {
        AuthError::NotAuthenticated {
            operation,
            state,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn already_authenticated() -> Self {
        AuthError::AlreadyAuthenticated {
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn session_terminated(state: SessionState) -> Self {
        AuthError::SessionTerminated {
            state,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn invalid_access_token(reason: TokenFormatFailure) -> Self {
        AuthError::InvalidAccessToken {
            reason,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn login_rejected() -> Self {
        AuthError::LoginRejected {
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn env_load(message: impl Into<String>) -> Self {
        AuthError::EnvLoad {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}
