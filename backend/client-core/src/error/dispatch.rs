//! Failures of a single dispatched command.
//!
//! - `Malformed`: the backend answered with something the codec cannot accept
//! - `Backend`: the backend answered with a well-formed application error
//! - `Timeout`: no answer within the configured invoke timeout

use sm_common::{BackendErrorCode, ErrorLocation};

use std::time::Duration;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum DispatchError {
    #[error("Malformed Response Error: '{operation}': {message} {location}")]
    Malformed {
        operation: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Backend Error: '{operation}': {code} - {message} {location}")]
    Backend {
        operation: &'static str,
        code: BackendErrorCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Timeout Error: '{operation}' did not answer within {timeout:?} {location}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
        location: ErrorLocation,
    },
}

impl DispatchError {
    #[track_caller]
    pub fn malformed(operation: &'static str, message: impl Into<String>) -> Self {
        DispatchError::Malformed {
            operation,
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn backend(
        operation: &'static str,
        code: BackendErrorCode,
        message: impl Into<String>,
    ) -> Self {
        DispatchError::Backend {
            operation,
            code,
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn timeout(operation: &'static str, timeout: Duration) -> Self {
        DispatchError::Timeout {
            operation,
            timeout,
            location: ErrorLocation::caller(),
        }
    }

    pub fn code(&self) -> Option<BackendErrorCode> {
        match self {
            DispatchError::Backend { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Only timeouts may be retried, and only when retries are configured.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DispatchError::Timeout { .. })
    }
}
