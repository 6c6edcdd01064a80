//! Request side of the envelope: one externally tagged variant per operation.

use crate::auth::AccessToken;

use sm_common::RedactedAccessToken;
use sm_models::validation;
use sm_models::{
    ModelError, OrganizationId, PasswordPolicy, ProjectDraft, ProjectId, SecretDraft, SecretId,
};

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    AccessTokenLogin(AccessTokenLoginRequest),
    ProjectGet(ProjectGetRequest),
    ProjectCreate(ProjectCreateRequest),
    ProjectUpdate(ProjectUpdateRequest),
    ProjectDelete(ProjectsDeleteRequest),
    ProjectList(ProjectsListRequest),
    SecretGet(SecretGetRequest),
    SecretGetByIds(SecretsGetRequest),
    SecretCreate(SecretCreateRequest),
    SecretUpdate(SecretUpdateRequest),
    SecretDelete(SecretsDeleteRequest),
    SecretList(SecretIdentifiersRequest),
    SecretSync(SecretsSyncRequest),
    PasswordGenerate(PasswordGenerateRequest),
}

/// Operation name without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    AccessTokenLogin,
    ProjectGet,
    ProjectCreate,
    ProjectUpdate,
    ProjectDelete,
    ProjectList,
    SecretGet,
    SecretGetByIds,
    SecretCreate,
    SecretUpdate,
    SecretDelete,
    SecretList,
    SecretSync,
    PasswordGenerate,
}

impl CommandKind {
    /// Envelope tag for this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessTokenLogin => "access_token_login",
            Self::ProjectGet => "project_get",
            Self::ProjectCreate => "project_create",
            Self::ProjectUpdate => "project_update",
            Self::ProjectDelete => "project_delete",
            Self::ProjectList => "project_list",
            Self::SecretGet => "secret_get",
            Self::SecretGetByIds => "secret_get_by_ids",
            Self::SecretCreate => "secret_create",
            Self::SecretUpdate => "secret_update",
            Self::SecretDelete => "secret_delete",
            Self::SecretList => "secret_list",
            Self::SecretSync => "secret_sync",
            Self::PasswordGenerate => "password_generate",
        }
    }

    /// Login and password generation are accepted before authentication.
    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::AccessTokenLogin | Self::PasswordGenerate)
    }

    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::ProjectGet
                | Self::ProjectList
                | Self::SecretGet
                | Self::SecretGetByIds
                | Self::SecretList
                | Self::SecretSync
                | Self::PasswordGenerate
        )
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::AccessTokenLogin(_) => CommandKind::AccessTokenLogin,
            Self::ProjectGet(_) => CommandKind::ProjectGet,
            Self::ProjectCreate(_) => CommandKind::ProjectCreate,
            Self::ProjectUpdate(_) => CommandKind::ProjectUpdate,
            Self::ProjectDelete(_) => CommandKind::ProjectDelete,
            Self::ProjectList(_) => CommandKind::ProjectList,
            Self::SecretGet(_) => CommandKind::SecretGet,
            Self::SecretGetByIds(_) => CommandKind::SecretGetByIds,
            Self::SecretCreate(_) => CommandKind::SecretCreate,
            Self::SecretUpdate(_) => CommandKind::SecretUpdate,
            Self::SecretDelete(_) => CommandKind::SecretDelete,
            Self::SecretList(_) => CommandKind::SecretList,
            Self::SecretSync(_) => CommandKind::SecretSync,
            Self::PasswordGenerate(_) => CommandKind::PasswordGenerate,
        }
    }
}

// ============================================================================
// Login
// ============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessTokenLoginRequest {
    #[serde(
        serialize_with = "serialize_token",
        deserialize_with = "deserialize_token"
    )]
    access_token: RedactedAccessToken,
}

impl AccessTokenLoginRequest {
    pub fn new(token: &AccessToken) -> Self {
        Self {
            access_token: token.redacted().clone(),
        }
    }

    pub fn access_token(&self) -> &RedactedAccessToken {
        &self.access_token
    }
}

impl fmt::Debug for AccessTokenLoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenLoginRequest")
            .field("access_token", &self.access_token)
            .finish()
    }
}

impl PartialEq for AccessTokenLoginRequest {
    fn eq(&self, other: &Self) -> bool {
        self.access_token.as_str() == other.access_token.as_str()
    }
}

fn serialize_token<S>(token: &RedactedAccessToken, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(token.as_str())
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<RedactedAccessToken, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(RedactedAccessToken::new)
}

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectGetRequest {
    id: ProjectId,
}

impl ProjectGetRequest {
    pub fn new(id: ProjectId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectCreateRequest {
    organization_id: OrganizationId,
    name: String,
}

impl ProjectCreateRequest {
    pub fn new(draft: ProjectDraft) -> Self {
        Self {
            organization_id: draft.organization_id(),
            name: draft.name().to_string(),
        }
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectUpdateRequest {
    id: ProjectId,
    organization_id: OrganizationId,
    name: String,
}

impl ProjectUpdateRequest {
    pub fn new(id: ProjectId, draft: ProjectDraft) -> Self {
        Self {
            id,
            organization_id: draft.organization_id(),
            name: draft.name().to_string(),
        }
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectsDeleteRequest {
    ids: Vec<ProjectId>,
}

impl ProjectsDeleteRequest {
    #[track_caller]
    pub fn new(ids: Vec<ProjectId>) -> Result<Self, ModelError> {
        validation::non_empty_batch("ids", &ids)?;
        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[ProjectId] {
        &self.ids
    }
}

/// Listing is always scoped to one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectsListRequest {
    organization_id: OrganizationId,
}

impl ProjectsListRequest {
    #[track_caller]
    pub fn new(organization_id: OrganizationId) -> Result<Self, ModelError> {
        Ok(Self {
            organization_id: validation::organization(organization_id)?,
        })
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }
}

// ============================================================================
// Secrets
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretGetRequest {
    id: SecretId,
}

impl SecretGetRequest {
    pub fn new(id: SecretId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> SecretId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsGetRequest {
    ids: Vec<SecretId>,
}

impl SecretsGetRequest {
    #[track_caller]
    pub fn new(ids: Vec<SecretId>) -> Result<Self, ModelError> {
        validation::non_empty_batch("ids", &ids)?;
        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[SecretId] {
        &self.ids
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretCreateRequest {
    organization_id: OrganizationId,
    key: String,
    value: String,
    note: String,
    #[serde(default)]
    project_ids: Vec<ProjectId>,
}

impl SecretCreateRequest {
    pub fn new(draft: SecretDraft) -> Self {
        Self {
            organization_id: draft.organization_id(),
            key: draft.key().to_string(),
            value: draft.value().to_string(),
            note: draft.note().to_string(),
            project_ids: draft.project_ids().to_vec(),
        }
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

impl fmt::Debug for SecretCreateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCreateRequest")
            .field("organization_id", &self.organization_id)
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .field("note", &self.note)
            .field("project_ids", &self.project_ids)
            .finish()
    }
}

/// Full replacement of a secret. Omitted project ids clear the association.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretUpdateRequest {
    id: SecretId,
    organization_id: OrganizationId,
    key: String,
    value: String,
    note: String,
    #[serde(default)]
    project_ids: Vec<ProjectId>,
}

impl SecretUpdateRequest {
    pub fn new(id: SecretId, draft: SecretDraft) -> Self {
        Self {
            id,
            organization_id: draft.organization_id(),
            key: draft.key().to_string(),
            value: draft.value().to_string(),
            note: draft.note().to_string(),
            project_ids: draft.project_ids().to_vec(),
        }
    }

    pub fn id(&self) -> SecretId {
        self.id
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

impl fmt::Debug for SecretUpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretUpdateRequest")
            .field("id", &self.id)
            .field("organization_id", &self.organization_id)
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .field("note", &self.note)
            .field("project_ids", &self.project_ids)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsDeleteRequest {
    ids: Vec<SecretId>,
}

impl SecretsDeleteRequest {
    #[track_caller]
    pub fn new(ids: Vec<SecretId>) -> Result<Self, ModelError> {
        validation::non_empty_batch("ids", &ids)?;
        Ok(Self { ids })
    }

    pub fn ids(&self) -> &[SecretId] {
        &self.ids
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretIdentifiersRequest {
    organization_id: OrganizationId,
}

impl SecretIdentifiersRequest {
    #[track_caller]
    pub fn new(organization_id: OrganizationId) -> Result<Self, ModelError> {
        Ok(Self {
            organization_id: validation::organization(organization_id)?,
        })
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }
}

/// Secrets changed since `last_synced_date`; all secrets when it is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsSyncRequest {
    organization_id: OrganizationId,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "sm_models::timestamp::rfc3339_option"
    )]
    last_synced_date: Option<SystemTime>,
}

impl SecretsSyncRequest {
    #[track_caller]
    pub fn new(
        organization_id: OrganizationId,
        last_synced_date: Option<SystemTime>,
    ) -> Result<Self, ModelError> {
        let last_synced_date = last_synced_date
            .map(|time| validation::timestamp("last_synced_date", time))
            .transpose()?;

        Ok(Self {
            organization_id: validation::organization(organization_id)?,
            last_synced_date,
        })
    }

    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    pub fn last_synced_date(&self) -> Option<SystemTime> {
        self.last_synced_date
    }
}

// ============================================================================
// Generators
// ============================================================================

/// Wire form of a [`PasswordPolicy`]. Absent minimums are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PasswordGenerateRequest {
    length: u8,
    avoid_ambiguous: bool,
    lowercase: bool,
    uppercase: bool,
    numbers: bool,
    special: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_lowercase: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_uppercase: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_number: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_special: Option<u8>,
}

impl PasswordGenerateRequest {
    pub fn new(policy: &PasswordPolicy) -> Self {
        Self {
            length: policy.length(),
            avoid_ambiguous: policy.avoid_ambiguous(),
            lowercase: policy.lowercase(),
            uppercase: policy.uppercase(),
            numbers: policy.numbers(),
            special: policy.special(),
            min_lowercase: policy.min_lowercase(),
            min_uppercase: policy.min_uppercase(),
            min_number: policy.min_number(),
            min_special: policy.min_special(),
        }
    }

    /// Rebuild the policy, validating it again. Used by backends.
    #[track_caller]
    pub fn policy(&self) -> Result<PasswordPolicy, ModelError> {
        let mut builder = PasswordPolicy::builder()
            .with_length(self.length)
            .with_avoid_ambiguous(self.avoid_ambiguous)
            .with_lowercase(self.lowercase)
            .with_uppercase(self.uppercase)
            .with_numbers(self.numbers)
            .with_special(self.special);

        if let Some(minimum) = self.min_lowercase {
            builder = builder.with_min_lowercase(minimum);
        }
        if let Some(minimum) = self.min_uppercase {
            builder = builder.with_min_uppercase(minimum);
        }
        if let Some(minimum) = self.min_number {
            builder = builder.with_min_number(minimum);
        }
        if let Some(minimum) = self.min_special {
            builder = builder.with_min_special(minimum);
        }

        builder.build()
    }
}
