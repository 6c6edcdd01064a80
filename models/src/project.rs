use crate::validation::{self, NAME_MAX_CHARS};
use crate::{ModelError, OrganizationId, ProjectId};

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// A project as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub id: ProjectId,
    pub organization_id: OrganizationId,
    pub name: String,
    #[serde(with = "crate::timestamp::rfc3339")]
    pub creation_date: SystemTime,
    #[serde(with = "crate::timestamp::rfc3339")]
    pub revision_date: SystemTime,
}

/// Validated input for creating or replacing a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    organization_id: OrganizationId,
    name: String,
}

impl ProjectDraft {
    #[track_caller]
    pub fn new(organization_id: OrganizationId, name: &str) -> Result<Self, ModelError> {
        Ok(Self {
            organization_id: validation::organization(organization_id)?,
            name: validation::required_text("name", name, NAME_MAX_CHARS)?,
        })
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
