use crate::validation::{self, KEY_MAX_CHARS, NOTE_MAX_CHARS};
use crate::{ModelError, OrganizationId, ProjectId};

/// Validated input for creating or replacing a secret.
///
/// Construct through [`SecretDraftBuilder`].
#[derive(Clone, PartialEq, Eq)]
pub struct SecretDraft {
    organization_id: OrganizationId,
    key: String,
    value: String,
    note: String,
    project_ids: Vec<ProjectId>,
}

impl SecretDraft {
    pub fn builder() -> SecretDraftBuilder {
        SecretDraftBuilder::default()
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn project_ids(&self) -> &[ProjectId] {
        &self.project_ids
    }
}

impl std::fmt::Debug for SecretDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretDraft")
            .field("organization_id", &self.organization_id)
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .field("note", &self.note)
            .field("project_ids", &self.project_ids)
            .finish()
    }
}

/// Builder for creating validated [`SecretDraft`] instances.
///
/// Key, value and organization are required. A missing note is sent as the empty
/// string; missing project ids mean "no project association".
#[derive(Default)]
pub struct SecretDraftBuilder {
    organization_id: Option<OrganizationId>,
    key: Option<String>,
    value: Option<String>,
    note: Option<String>,
    project_ids: Vec<ProjectId>,
}

impl SecretDraftBuilder {
    pub fn with_organization_id(mut self, organization_id: OrganizationId) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_project_ids(mut self, project_ids: impl IntoIterator<Item = ProjectId>) -> Self {
        self.project_ids = project_ids.into_iter().collect();
        self
    }

    /// Build the draft with validation.
    #[track_caller]
    pub fn build(self) -> Result<SecretDraft, ModelError> {
        let organization_id = self.organization_id.ok_or_else(|| {
            ModelError::validation("organization_id", "organization_id is required")
        })?;
        let organization_id = validation::organization(organization_id)?;

        let key = self
            .key
            .ok_or_else(|| ModelError::validation("key", "key is required"))?;
        let key = validation::required_text("key", &key, KEY_MAX_CHARS)?;

        let value = self
            .value
            .ok_or_else(|| ModelError::validation("value", "value is required"))?;
        let value = validation::secret_value(&value)?;

        let note = self.note.as_deref().unwrap_or_default();
        let note = validation::optional_text("note", note, NOTE_MAX_CHARS)?;

        if self.project_ids.iter().any(ProjectId::is_nil) {
            return Err(ModelError::validation(
                "project_ids",
                "project_ids must not contain the nil UUID",
            ));
        }

        let mut project_ids = self.project_ids;
        let mut seen = Vec::with_capacity(project_ids.len());
        project_ids.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        });

        Ok(SecretDraft {
            organization_id,
            key,
            value,
            note,
            project_ids,
        })
    }
}
