//! Cross-cutting types shared by every crate in the secrets client workspace.
//!
//! ## Architecture
//!
//! - **sm-common** (this crate): error locations, redaction, backend error codes
//! - **sm-models**: pure data records exchanged with the backend
//! - **sm-client-core**: session, dispatch and resource clients
//!
//! Nothing in here knows about commands or the backend contract.

pub mod backend_error_code;
pub mod error;
pub mod redacted_token;

pub use backend_error_code::BackendErrorCode;
pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use redacted_token::RedactedAccessToken;

#[cfg(test)]
mod tests;
