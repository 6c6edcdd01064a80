use sm_common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LoggerError {
    #[error("Logger Level Error: '{level}' is not a log level {location}")]
    InvalidLevel {
        level: String,
        location: ErrorLocation,
    },

    #[error("Logger Output Error: {path}: {message} {location}")]
    Output {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },

    #[error("Logger Error: {message} {location}")]
    Initialize {
        message: String,
        location: ErrorLocation,
    },
}

impl LoggerError {
    #[track_caller]
    pub fn invalid_level(level: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            level: level.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn output(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        LoggerError::Output {
            path: path.into(),
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn initialize(message: impl Into<String>) -> Self {
        LoggerError::Initialize {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}
