pub mod auth;
pub mod closed;
pub mod codec;
pub mod config;
pub mod construction;
pub mod dispatch;
pub mod logger;

pub use auth::{AuthError, TokenFormatFailure};
pub use closed::ClosedError;
pub use codec::CodecError;
pub use config::ConfigError;
pub use construction::ConstructionError;
pub use dispatch::DispatchError;
pub use logger::LoggerError;

use sm_common::BackendErrorCode;
use sm_models::ModelError;

use thiserror::Error;

/// Every failure a public client operation can report.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Closed(#[from] ClosedError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Validation(#[from] ModelError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logger(#[from] LoggerError),
}

impl ClientError {
    pub fn is_closed(&self) -> bool {
        matches!(self, ClientError::Closed(_))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }

    /// Backend-reported code, when the backend rejected the command.
    pub fn backend_code(&self) -> Option<BackendErrorCode> {
        match self {
            ClientError::Dispatch(error) => error.code(),
            _ => None,
        }
    }

    /// Short category name, stable enough for log filtering.
    pub fn error_category(&self) -> &'static str {
        match self {
            ClientError::Construction(_) => "construction",
            ClientError::Closed(_) => "closed",
            ClientError::Auth(_) => "auth",
            ClientError::Dispatch(DispatchError::Malformed { .. }) => "malformed",
            ClientError::Dispatch(DispatchError::Backend { .. }) => "backend",
            ClientError::Dispatch(DispatchError::Timeout { .. }) => "timeout",
            ClientError::Codec(_) => "codec",
            ClientError::Validation(_) => "validation",
            ClientError::Config(_) => "config",
            ClientError::Logger(_) => "logger",
        }
    }
}
