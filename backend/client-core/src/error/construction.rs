use sm_common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ConstructionError {
    #[error("Backend Init Error: {message} {location}")]
    BackendInit {
        message: String,
        location: ErrorLocation,
    },

    #[error("Settings Error: {message} {location}")]
    Settings {
        message: String,
        location: ErrorLocation,
    },
}

impl ConstructionError {
    #[track_caller]
    pub fn backend_init(message: impl Into<String>) -> Self {
        ConstructionError::BackendInit {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn settings(message: impl Into<String>) -> Self {
        ConstructionError::Settings {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}
