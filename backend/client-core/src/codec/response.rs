//! Response side of the envelope.
//!
//! `{ "success": bool, "data"?: T, "error_message"?: string, "error_code"?: string }`
//!
//! - A success carries `data` and nothing else
//! - A failure carries `error_message`, optionally `error_code`, and no `data`
//! - The shape of `data` is fixed by the command that was issued; a generated
//!   password is a bare JSON string

use super::command::CommandKind;
use crate::error::CodecError;

use sm_common::BackendErrorCode;
use sm_models::{
    BatchDeleteResult, GeneratedPassword, LoginOutcome, Project, ProjectId, Secret, SecretId,
    SecretIdentifier, SecretsSync,
};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResponseEnvelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_code: Option<BackendErrorCode>,
}

/// List payloads travel wrapped as `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListData<T> {
    data: Vec<T>,
}

/// Typed success payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    Login(LoginOutcome),
    Project(Project),
    Projects(Vec<Project>),
    ProjectsDeleted(BatchDeleteResult<ProjectId>),
    Secret(Secret),
    Secrets(Vec<Secret>),
    SecretIdentifiers(Vec<SecretIdentifier>),
    SecretsDeleted(BatchDeleteResult<SecretId>),
    SecretsSync(SecretsSync),
    GeneratedPassword(GeneratedPassword),
}

impl ResponsePayload {
    /// Whether this payload is the answer `kind` expects.
    pub fn kind_matches(&self, kind: CommandKind) -> bool {
        matches!(
            (self, kind),
            (Self::Login(_), CommandKind::AccessTokenLogin)
                | (
                    Self::Project(_),
                    CommandKind::ProjectGet
                        | CommandKind::ProjectCreate
                        | CommandKind::ProjectUpdate
                )
                | (Self::Projects(_), CommandKind::ProjectList)
                | (Self::ProjectsDeleted(_), CommandKind::ProjectDelete)
                | (
                    Self::Secret(_),
                    CommandKind::SecretGet | CommandKind::SecretCreate | CommandKind::SecretUpdate
                )
                | (Self::Secrets(_), CommandKind::SecretGetByIds)
                | (Self::SecretIdentifiers(_), CommandKind::SecretList)
                | (Self::SecretsDeleted(_), CommandKind::SecretDelete)
                | (Self::SecretsSync(_), CommandKind::SecretSync)
                | (Self::GeneratedPassword(_), CommandKind::PasswordGenerate)
        )
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Login(_) => "Login",
            Self::Project(_) => "Project",
            Self::Projects(_) => "Projects",
            Self::ProjectsDeleted(_) => "ProjectsDeleted",
            Self::Secret(_) => "Secret",
            Self::Secrets(_) => "Secrets",
            Self::SecretIdentifiers(_) => "SecretIdentifiers",
            Self::SecretsDeleted(_) => "SecretsDeleted",
            Self::SecretsSync(_) => "SecretsSync",
            Self::GeneratedPassword(_) => "GeneratedPassword",
        }
    }

    pub fn into_login(self) -> Option<LoginOutcome> {
        match self {
            Self::Login(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn into_project(self) -> Option<Project> {
        match self {
            Self::Project(project) => Some(project),
            _ => None,
        }
    }

    pub fn into_projects(self) -> Option<Vec<Project>> {
        match self {
            Self::Projects(projects) => Some(projects),
            _ => None,
        }
    }

    pub fn into_projects_deleted(self) -> Option<BatchDeleteResult<ProjectId>> {
        match self {
            Self::ProjectsDeleted(result) => Some(result),
            _ => None,
        }
    }

    pub fn into_secret(self) -> Option<Secret> {
        match self {
            Self::Secret(secret) => Some(secret),
            _ => None,
        }
    }

    pub fn into_secrets(self) -> Option<Vec<Secret>> {
        match self {
            Self::Secrets(secrets) => Some(secrets),
            _ => None,
        }
    }

    pub fn into_secret_identifiers(self) -> Option<Vec<SecretIdentifier>> {
        match self {
            Self::SecretIdentifiers(identifiers) => Some(identifiers),
            _ => None,
        }
    }

    pub fn into_secrets_deleted(self) -> Option<BatchDeleteResult<SecretId>> {
        match self {
            Self::SecretsDeleted(result) => Some(result),
            _ => None,
        }
    }

    pub fn into_secrets_sync(self) -> Option<SecretsSync> {
        match self {
            Self::SecretsSync(sync) => Some(sync),
            _ => None,
        }
    }

    pub fn into_generated_password(self) -> Option<GeneratedPassword> {
        match self {
            Self::GeneratedPassword(password) => Some(password),
            _ => None,
        }
    }

    fn to_data(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Login(outcome) => serde_json::to_value(outcome),
            Self::Project(project) => serde_json::to_value(project),
            Self::Projects(projects) => list_to_data(projects),
            Self::ProjectsDeleted(result) => serde_json::to_value(result),
            Self::Secret(secret) => serde_json::to_value(secret),
            Self::Secrets(secrets) => list_to_data(secrets),
            Self::SecretIdentifiers(identifiers) => list_to_data(identifiers),
            Self::SecretsDeleted(result) => serde_json::to_value(result),
            Self::SecretsSync(sync) => serde_json::to_value(sync),
            Self::GeneratedPassword(password) => serde_json::to_value(password),
        }
    }
}

/// Decoded envelope: either a typed payload or the backend's own failure report.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    Success(ResponsePayload),
    Failure {
        code: BackendErrorCode,
        message: String,
    },
}

/// Encode a success envelope. Used by backends.
pub fn encode_response(payload: &ResponsePayload) -> Result<String, CodecError> {
    let data = payload
        .to_data()
        .map_err(|e| CodecError::encode(format!("{} payload: {e}", payload.variant_name())))?;

    let envelope = ResponseEnvelope {
        success: true,
        data: Some(data),
        error_message: None,
        error_code: None,
    };

    serde_json::to_string(&envelope).map_err(|e| CodecError::encode(e.to_string()))
}

/// Encode a failure envelope. Used by backends.
pub fn encode_error(code: BackendErrorCode, message: &str) -> Result<String, CodecError> {
    let envelope = ResponseEnvelope {
        success: false,
        data: None,
        error_message: Some(message.to_string()),
        error_code: Some(code),
    };

    serde_json::to_string(&envelope).map_err(|e| CodecError::encode(e.to_string()))
}

/// Decode the backend's answer to a command of kind `kind`.
///
/// A failure envelope without `error_code` decodes with [`BackendErrorCode::Unknown`].
pub fn decode_response(kind: CommandKind, raw: &str) -> Result<ResponseOutcome, CodecError> {
    let envelope: ResponseEnvelope = serde_json::from_str(raw)
        .map_err(|e| CodecError::decode(format!("response envelope: {e}")))?;

    match envelope {
        ResponseEnvelope {
            success: true,
            data: Some(data),
            error_message: None,
            error_code: None,
        } => decode_payload(kind, data).map(ResponseOutcome::Success),
        ResponseEnvelope {
            success: false,
            data: None,
            error_message: Some(message),
            error_code,
        } => Ok(ResponseOutcome::Failure {
            code: error_code.unwrap_or(BackendErrorCode::Unknown),
            message,
        }),
        ResponseEnvelope { success: true, .. } => Err(CodecError::envelope(
            "success envelope must carry data and no error fields",
        )),
        ResponseEnvelope { success: false, .. } => Err(CodecError::envelope(
            "failure envelope must carry error_message and no data",
        )),
    }
}

fn decode_payload(kind: CommandKind, data: Value) -> Result<ResponsePayload, CodecError> {
    let payload = match kind {
        CommandKind::AccessTokenLogin => ResponsePayload::Login(from_data(kind, data)?),
        CommandKind::ProjectGet | CommandKind::ProjectCreate | CommandKind::ProjectUpdate => {
            ResponsePayload::Project(from_data(kind, data)?)
        }
        CommandKind::ProjectList => ResponsePayload::Projects(list_from_data(kind, data)?),
        CommandKind::ProjectDelete => ResponsePayload::ProjectsDeleted(from_data(kind, data)?),
        CommandKind::SecretGet | CommandKind::SecretCreate | CommandKind::SecretUpdate => {
            ResponsePayload::Secret(from_data(kind, data)?)
        }
        CommandKind::SecretGetByIds => ResponsePayload::Secrets(list_from_data(kind, data)?),
        CommandKind::SecretList => {
            ResponsePayload::SecretIdentifiers(list_from_data(kind, data)?)
        }
        CommandKind::SecretDelete => ResponsePayload::SecretsDeleted(from_data(kind, data)?),
        CommandKind::SecretSync => ResponsePayload::SecretsSync(from_data(kind, data)?),
        CommandKind::PasswordGenerate => {
            ResponsePayload::GeneratedPassword(from_data(kind, data)?)
        }
    };

    Ok(payload)
}

fn from_data<T: DeserializeOwned>(kind: CommandKind, data: Value) -> Result<T, CodecError> {
    serde_json::from_value(data).map_err(|e| CodecError::decode(format!("{kind} data: {e}")))
}

fn list_from_data<T: DeserializeOwned>(
    kind: CommandKind,
    data: Value,
) -> Result<Vec<T>, CodecError> {
    from_data::<ListData<T>>(kind, data).map(|list| list.data)
}

fn list_to_data<T: Serialize>(items: &[T]) -> Result<Value, serde_json::Error> {
    Ok(json!({ "data": serde_json::to_value(items)? }))
}
