//! Application-level error codes reported by the secrets backend.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error category attached to a failed response envelope.
///
/// Carried as a structured field rather than parsed out of the message text.
/// Codes this client does not know decode to [`BackendErrorCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorCode {
    NotFound,
    PermissionDenied,
    Unauthorized,
    InvalidRequest,
    Conflict,
    Internal,
    Unknown,
}

impl BackendErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::Unauthorized => "unauthorized",
            Self::InvalidRequest => "invalid_request",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
            Self::Unknown => "unknown",
        }
    }

    pub fn parse(code: &str) -> Self {
        match code {
            "not_found" => Self::NotFound,
            "permission_denied" => Self::PermissionDenied,
            "unauthorized" => Self::Unauthorized,
            "invalid_request" => Self::InvalidRequest,
            "conflict" => Self::Conflict,
            "internal" => Self::Internal,
            _ => Self::Unknown,
        }
    }

    /// The session credential is no longer accepted (expired or revoked).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Caller-side problems; repeating the same request will not help.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::PermissionDenied
                | Self::Unauthorized
                | Self::InvalidRequest
                | Self::Conflict
        )
    }
}

impl fmt::Display for BackendErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BackendErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BackendErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}
