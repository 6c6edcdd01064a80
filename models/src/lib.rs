//! Data records exchanged between the secrets client core and its backend.
//!
//! Everything here is a transient value: built from a decoded response or from
//! validated caller input, never cached and never mutated in place.

pub mod delete;
pub mod error;
pub mod generator;
pub mod ids;
pub mod login;
pub mod project;
pub mod secret;
pub mod timestamp;
pub mod validation;

pub use delete::{BatchDeleteResult, DeleteOutcome};
pub use error::model_error::ModelError;
pub use generator::{GeneratedPassword, PasswordPolicy, PasswordPolicyBuilder};
pub use ids::{OrganizationId, ProjectId, SecretId};
pub use login::LoginOutcome;
pub use project::{Project, ProjectDraft};
pub use secret::builder::{SecretDraft, SecretDraftBuilder};
pub use secret::{Secret, SecretIdentifier, SecretsSync};

pub use sm_common::ErrorLocation;

#[cfg(test)]
mod tests;
