use sm_common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ClosedError {
    #[error("Closed Error: client is closed, refusing '{operation}' {location}")]
    Closed {
        operation: &'static str,
        location: ErrorLocation,
    },
}

impl ClosedError {
    #[track_caller]
    pub fn closed(operation: &'static str) -> Self {
        ClosedError::Closed {
            operation,
            location: ErrorLocation::caller(),
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            ClosedError::Closed { operation, .. } => operation,
        }
    }
}
