use sm_common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("Encode Error: {message} {location}")]
    Encode {
        message: String,
        location: ErrorLocation,
    },

    #[error("Decode Error: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },

    /// Well-formed JSON that breaks the envelope rules (success/data/error agreement).
    #[error("Envelope Error: {message} {location}")]
    Envelope {
        message: String,
        location: ErrorLocation,
    },
}

impl CodecError {
    #[track_caller]
    pub fn encode(message: impl Into<String>) -> Self {
        CodecError::Encode {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        CodecError::Decode {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn envelope(message: impl Into<String>) -> Self {
        CodecError::Envelope {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}
