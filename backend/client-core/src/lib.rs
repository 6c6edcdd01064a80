//! Client core for a credential-scoped secrets service.
//!
//! Every resource operation is encoded as a JSON command, handed to a pluggable
//! [`backend::Backend`], and the JSON answer decoded into typed models. The
//! [`client::SecretsManagerClient`] facade owns the backend handle and the
//! session state for its whole life.
//!
//! A host process typically starts with
//! [`SecretsManagerClient::from_config_dir`], which loads `config.toml`,
//! installs the [`logger`] described by its `[logging]` table and acquires the
//! backend handle. Hosts that already run a `log` logger build the client with
//! [`SecretsManagerClient::new`] instead.

pub mod auth;
pub mod backend;
pub mod client;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logger;
pub mod resources;
pub mod session;

#[cfg(test)]
mod tests;

pub use client::SecretsManagerClient;
pub use error::ClientError;

pub const ACCESS_TOKEN_ENV_VAR: &str = "SM_ACCESS_TOKEN";
