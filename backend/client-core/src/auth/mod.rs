//! Access-token credentials.
//!
//! # Security
//! - Tokens are wrapped in RedactedAccessToken (never exposed in Debug)
//! - Zeroized on drop
//! - Never logged; only the service account id and the length are

pub mod access_token;
pub mod env;

pub use access_token::AccessToken;
pub use env::access_token_from_env;
