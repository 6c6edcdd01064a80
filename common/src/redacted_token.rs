//! Access token holder with redacted Debug output.

use crate::{ErrorLocation, RedactError};

use std::fmt;

use serde::ser::Error;
use zeroize::Zeroize;

const REDACTED_DEBUG: &str = "RedactedAccessToken([REDACTED])";
const REDACTED_DISPLAY: &str = "[REDACTED ACCESS TOKEN]";

/// An access token that never exposes its value in logs or debug output.
///
/// The buffer is zeroized on drop.
#[derive(Clone)]
pub struct RedactedAccessToken {
    inner: String,
}

impl RedactedAccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: token.into(),
        }
    }

    /// Raw token value.
    ///
    /// Only the command codec should call this, when building the login envelope.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Token length (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RedactedAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED_DEBUG)
    }
}

impl fmt::Display for RedactedAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED_DISPLAY)
    }
}

impl Drop for RedactedAccessToken {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Serializing has to go through as_str() so every leak point is greppable.
impl serde::Serialize for RedactedAccessToken {
    #[track_caller]
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: String::from(
                "RedactedAccessToken cannot be serialized - use as_str() explicitly",
            ),
            location: ErrorLocation::caller(),
        }))
    }
}
