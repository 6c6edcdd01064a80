pub mod builder;

use crate::{OrganizationId, ProjectId, SecretId};

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// A secret with its decrypted value, as returned by get/create/update.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Secret {
    pub id: SecretId,
    pub organization_id: OrganizationId,
    /// Projects this secret is associated with. Association, not ownership.
    #[serde(default)]
    pub project_ids: Vec<ProjectId>,
    pub key: String,
    pub value: String,
    pub note: String,
    #[serde(with = "crate::timestamp::rfc3339")]
    pub creation_date: SystemTime,
    #[serde(with = "crate::timestamp::rfc3339")]
    pub revision_date: SystemTime,
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("id", &self.id)
            .field("organization_id", &self.organization_id)
            .field("project_ids", &self.project_ids)
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .field("note", &self.note)
            .field("creation_date", &self.creation_date)
            .field("revision_date", &self.revision_date)
            .finish()
    }
}

/// List entry for a secret. Listing never returns values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretIdentifier {
    pub id: SecretId,
    pub organization_id: OrganizationId,
    pub key: String,
}

/// Result of a sync request.
///
/// `secrets` is only populated when `has_changes` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsSync {
    pub has_changes: bool,
    #[serde(default)]
    pub secrets: Option<Vec<Secret>>,
}
