//! In-process backend holding projects and secrets in memory.
//!
//! Speaks the same envelopes as a real backend, so it exercises the full
//! encode → invoke → decode path. Access tokens are registered up front with the
//! organizations they may touch. Password generation answers without a session.

use super::{Backend, password};
use crate::codec::command::{
    ProjectCreateRequest, ProjectUpdateRequest, SecretCreateRequest, SecretUpdateRequest,
    SecretsSyncRequest,
};
use crate::codec::{
    Command, ResponsePayload, decode_command, decode_settings, encode_error, encode_response,
};
use crate::config::ClientSettings;

use sm_common::BackendErrorCode;
use sm_models::{
    BatchDeleteResult, DeleteOutcome, GeneratedPassword, LoginOutcome, OrganizationId, Project,
    ProjectId, Secret, SecretId, SecretIdentifier, SecretsSync,
};

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use log::{debug, warn};

const NOT_FOUND_MESSAGE: &str = "Resource not found.";
const UNAUTHENTICATED_MESSAGE: &str = "Session is not authenticated.";
const REVOKED_MESSAGE: &str = "Access token has been revoked.";
const INVALID_TOKEN_MESSAGE: &str = "Invalid access token.";
const ENCODE_FAILURE_ENVELOPE: &str =
    r#"{"success":false,"error_message":"internal error","error_code":"internal"}"#;
const FORBIDDEN_MESSAGE: &str = "You do not have permission to access this organization.";

/// Opaque handle returned by [`MemoryBackend::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryHandle(u64);

#[derive(Debug)]
struct Grant {
    organizations: Vec<OrganizationId>,
    revoked: bool,
}

#[derive(Debug, Default)]
struct State {
    grants: HashMap<String, Grant>,
    sessions: HashMap<MemoryHandle, Option<String>>,
    next_handle: u64,
    projects: Vec<Project>,
    secrets: Vec<Secret>,
    organization_revisions: HashMap<OrganizationId, SystemTime>,
    last_timestamp: Option<SystemTime>,
    last_settings: Option<ClientSettings>,
}

impl State {
    /// Strictly increasing, so every write gets a distinct revision date.
    fn next_timestamp(&mut self) -> SystemTime {
        let now = SystemTime::now();
        let stamp = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::from_micros(1),
            _ => now,
        };
        self.last_timestamp = Some(stamp);
        stamp
    }

    fn touch_organization(&mut self, organization_id: OrganizationId) -> SystemTime {
        let stamp = self.next_timestamp();
        self.organization_revisions.insert(organization_id, stamp);
        stamp
    }
}

type Reply = Result<ResponsePayload, (BackendErrorCode, String)>;

fn refuse(code: BackendErrorCode, message: impl Into<String>) -> Reply {
    Err((code, message.into()))
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    refuse_init: Option<String>,
    latency_ms: AtomicU64,
    invocations: AtomicUsize,
    inits: AtomicUsize,
    releases: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `init` always fails with `message`.
    pub fn refusing_init(message: impl Into<String>) -> Self {
        Self {
            refuse_init: Some(message.into()),
            ..Self::default()
        }
    }

    /// Register `token` with access to `organizations`.
    pub fn with_access_token(
        self,
        token: &str,
        organizations: impl IntoIterator<Item = OrganizationId>,
    ) -> Self {
        self.lock().grants.insert(
            token.to_string(),
            Grant {
                organizations: organizations.into_iter().collect(),
                revoked: false,
            },
        );
        self
    }

    /// Delay every answer by `latency`.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.set_latency(latency);
        self
    }

    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    /// Revoke `token`. Sessions logged in with it get `unauthorized` from now on.
    pub fn revoke(&self, token: &str) {
        if let Some(grant) = self.lock().grants.get_mut(token) {
            grant.revoked = true;
        }
    }

    /// Number of `invoke` calls, counted on entry (timed-out calls included).
    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub fn init_count(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    /// Number of `release` calls, including any on already released handles.
    pub fn released_handles(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn live_handles(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Settings decoded from the last successful `init`.
    pub fn settings_received(&self) -> Option<ClientSettings> {
        self.lock().last_settings.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn answer(&self, handle: MemoryHandle, raw: &str) -> String {
        let reply = match decode_command(raw) {
            Ok(command) => {
                debug!("MemoryBackend handling {}", command.kind());
                self.execute(handle, command)
            }
            Err(e) => refuse(BackendErrorCode::InvalidRequest, e.to_string()),
        };

        let encoded = match reply {
            Ok(payload) => encode_response(&payload),
            Err((code, message)) => encode_error(code, &message),
        };

        encoded.unwrap_or_else(|e| {
            warn!("MemoryBackend failed to encode its answer: {e}");
            String::from(ENCODE_FAILURE_ENVELOPE)
        })
    }

    fn execute(&self, handle: MemoryHandle, command: Command) -> Reply {
        let mut state = self.lock();

        let Some(session) = state.sessions.get(&handle).cloned() else {
            return refuse(BackendErrorCode::Internal, "Unknown handle.");
        };

        if let Command::PasswordGenerate(request) = &command {
            return match request.policy() {
                Ok(policy) => Ok(ResponsePayload::GeneratedPassword(GeneratedPassword::new(
                    password::generate(&policy),
                ))),
                Err(e) => refuse(BackendErrorCode::InvalidRequest, e.to_string()),
            };
        }

        if let Command::AccessTokenLogin(request) = command {
            let token = request.access_token().as_str();
            let granted = matches!(state.grants.get(token), Some(grant) if !grant.revoked);
            if !granted {
                return refuse(BackendErrorCode::Unauthorized, INVALID_TOKEN_MESSAGE);
            }

            state.sessions.insert(handle, Some(token.to_string()));
            return Ok(ResponsePayload::Login(LoginOutcome {
                authenticated: true,
            }));
        }

        let Some(token) = session else {
            return refuse(BackendErrorCode::Unauthorized, UNAUTHENTICATED_MESSAGE);
        };
        let organizations = match state.grants.get(&token) {
            Some(grant) if !grant.revoked => grant.organizations.clone(),
            _ => return refuse(BackendErrorCode::Unauthorized, REVOKED_MESSAGE),
        };

        let scope = Scope { organizations };
        match command {
            Command::AccessTokenLogin(_) | Command::PasswordGenerate(_) => {
                refuse(BackendErrorCode::Internal, "Command already handled.")
            }
            Command::ProjectGet(request) => scope
                .project(&state, request.id())
                .cloned()
                .map(ResponsePayload::Project),
            Command::ProjectCreate(request) => create_project(&mut state, &scope, &request),
            Command::ProjectUpdate(request) => update_project(&mut state, &scope, &request),
            Command::ProjectDelete(request) => {
                let data = request
                    .ids()
                    .iter()
                    .map(|id| delete_project(&mut state, &scope, *id))
                    .collect();
                Ok(ResponsePayload::ProjectsDeleted(BatchDeleteResult::new(data)))
            }
            Command::ProjectList(request) => {
                scope.permit(request.organization_id())?;
                let projects = state
                    .projects
                    .iter()
                    .filter(|project| project.organization_id == request.organization_id())
                    .cloned()
                    .collect();
                Ok(ResponsePayload::Projects(projects))
            }
            Command::SecretGet(request) => scope
                .secret(&state, request.id())
                .cloned()
                .map(ResponsePayload::Secret),
            Command::SecretGetByIds(request) => request
                .ids()
                .iter()
                .map(|id| scope.secret(&state, *id).cloned())
                .collect::<Result<Vec<_>, _>>()
                .map(ResponsePayload::Secrets),
            Command::SecretCreate(request) => create_secret(&mut state, &scope, &request),
            Command::SecretUpdate(request) => update_secret(&mut state, &scope, &request),
            Command::SecretDelete(request) => {
                let data = request
                    .ids()
                    .iter()
                    .map(|id| delete_secret(&mut state, &scope, *id))
                    .collect();
                Ok(ResponsePayload::SecretsDeleted(BatchDeleteResult::new(data)))
            }
            Command::SecretList(request) => {
                scope.permit(request.organization_id())?;
                let identifiers = state
                    .secrets
                    .iter()
                    .filter(|secret| secret.organization_id == request.organization_id())
                    .map(|secret| SecretIdentifier {
                        id: secret.id,
                        organization_id: secret.organization_id,
                        key: secret.key.clone(),
                    })
                    .collect();
                Ok(ResponsePayload::SecretIdentifiers(identifiers))
            }
            Command::SecretSync(request) => sync_secrets(&state, &scope, &request),
        }
    }
}

/// Organizations the calling session may touch.
struct Scope {
    organizations: Vec<OrganizationId>,
}

impl Scope {
    fn permit(&self, organization_id: OrganizationId) -> Result<(), (BackendErrorCode, String)> {
        if self.organizations.contains(&organization_id) {
            Ok(())
        } else {
            Err((BackendErrorCode::PermissionDenied, FORBIDDEN_MESSAGE.to_string()))
        }
    }

    /// Resources of other organizations are indistinguishable from missing ones.
    fn project<'a>(
        &self,
        state: &'a State,
        id: ProjectId,
    ) -> Result<&'a Project, (BackendErrorCode, String)> {
        state
            .projects
            .iter()
            .find(|project| {
                project.id == id && self.organizations.contains(&project.organization_id)
            })
            .ok_or_else(|| (BackendErrorCode::NotFound, NOT_FOUND_MESSAGE.to_string()))
    }

    fn secret<'a>(
        &self,
        state: &'a State,
        id: SecretId,
    ) -> Result<&'a Secret, (BackendErrorCode, String)> {
        state
            .secrets
            .iter()
            .find(|secret| secret.id == id && self.organizations.contains(&secret.organization_id))
            .ok_or_else(|| (BackendErrorCode::NotFound, NOT_FOUND_MESSAGE.to_string()))
    }

    /// Every associated project must exist in the secret's own organization.
    fn check_projects(
        &self,
        state: &State,
        organization_id: OrganizationId,
        project_ids: &[ProjectId],
    ) -> Result<(), (BackendErrorCode, String)> {
        for id in project_ids {
            let project = self.project(state, *id)?;
            if project.organization_id != organization_id {
                return Err((
                    BackendErrorCode::InvalidRequest,
                    format!("Project {id} belongs to another organization."),
                ));
            }
        }
        Ok(())
    }
}

fn create_project(state: &mut State, scope: &Scope, request: &ProjectCreateRequest) -> Reply {
    scope.permit(request.organization_id())?;

    let now = state.next_timestamp();
    let project = Project {
        id: ProjectId::new_random(),
        organization_id: request.organization_id(),
        name: request.name().to_string(),
        creation_date: now,
        revision_date: now,
    };
    state.projects.push(project.clone());

    Ok(ResponsePayload::Project(project))
}

fn update_project(state: &mut State, scope: &Scope, request: &ProjectUpdateRequest) -> Reply {
    scope.permit(request.organization_id())?;
    let current = scope.project(state, request.id())?;
    if current.organization_id != request.organization_id() {
        return refuse(
            BackendErrorCode::InvalidRequest,
            "Project belongs to another organization.",
        );
    }

    let now = state.next_timestamp();
    let Some(project) = state.projects.iter_mut().find(|p| p.id == request.id()) else {
        return refuse(BackendErrorCode::NotFound, NOT_FOUND_MESSAGE);
    };
    project.name = request.name().to_string();
    project.revision_date = now;

    Ok(ResponsePayload::Project(project.clone()))
}

/// Removes the project and its associations. Associated secrets are kept.
fn delete_project(state: &mut State, scope: &Scope, id: ProjectId) -> DeleteOutcome<ProjectId> {
    let organization_id = match scope.project(state, id) {
        Ok(project) => project.organization_id,
        Err((_, message)) => return DeleteOutcome::failed(id, message),
    };

    state.projects.retain(|project| project.id != id);

    let mut touched = false;
    for secret in state.secrets.iter_mut() {
        let before = secret.project_ids.len();
        secret.project_ids.retain(|project_id| *project_id != id);
        touched |= secret.project_ids.len() != before;
    }
    if touched {
        state.touch_organization(organization_id);
    }

    DeleteOutcome::succeeded(id)
}

fn create_secret(state: &mut State, scope: &Scope, request: &SecretCreateRequest) -> Reply {
    scope.permit(request.organization_id())?;
    scope.check_projects(state, request.organization_id(), request.project_ids())?;

    let now = state.touch_organization(request.organization_id());
    let secret = Secret {
        id: SecretId::new_random(),
        organization_id: request.organization_id(),
        project_ids: request.project_ids().to_vec(),
        key: request.key().to_string(),
        value: request.value().to_string(),
        note: request.note().to_string(),
        creation_date: now,
        revision_date: now,
    };
    state.secrets.push(secret.clone());

    Ok(ResponsePayload::Secret(secret))
}

fn update_secret(state: &mut State, scope: &Scope, request: &SecretUpdateRequest) -> Reply {
    scope.permit(request.organization_id())?;
    let current = scope.secret(state, request.id())?;
    if current.organization_id != request.organization_id() {
        return refuse(
            BackendErrorCode::InvalidRequest,
            "Secret belongs to another organization.",
        );
    }
    scope.check_projects(state, request.organization_id(), request.project_ids())?;

    let now = state.touch_organization(request.organization_id());
    let Some(secret) = state.secrets.iter_mut().find(|s| s.id == request.id()) else {
        return refuse(BackendErrorCode::NotFound, NOT_FOUND_MESSAGE);
    };
    secret.key = request.key().to_string();
    secret.value = request.value().to_string();
    secret.note = request.note().to_string();
    secret.project_ids = request.project_ids().to_vec();
    secret.revision_date = now;

    Ok(ResponsePayload::Secret(secret.clone()))
}

fn delete_secret(state: &mut State, scope: &Scope, id: SecretId) -> DeleteOutcome<SecretId> {
    let organization_id = match scope.secret(state, id) {
        Ok(secret) => secret.organization_id,
        Err((_, message)) => return DeleteOutcome::failed(id, message),
    };

    state.secrets.retain(|secret| secret.id != id);
    state.touch_organization(organization_id);

    DeleteOutcome::succeeded(id)
}

fn sync_secrets(state: &State, scope: &Scope, request: &SecretsSyncRequest) -> Reply {
    scope.permit(request.organization_id())?;

    let revision = state
        .organization_revisions
        .get(&request.organization_id())
        .copied();
    let has_changes = match (request.last_synced_date(), revision) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(last_synced), Some(revision)) => revision > last_synced,
    };

    let secrets = has_changes.then(|| {
        state
            .secrets
            .iter()
            .filter(|secret| secret.organization_id == request.organization_id())
            .cloned()
            .collect()
    });

    Ok(ResponsePayload::SecretsSync(SecretsSync {
        has_changes,
        secrets,
    }))
}

impl Backend for MemoryBackend {
    type Handle = MemoryHandle;

    fn init(&self, settings_envelope: &str) -> Result<Self::Handle, String> {
        if let Some(message) = &self.refuse_init {
            return Err(message.clone());
        }

        let settings = decode_settings(settings_envelope).map_err(|e| e.to_string())?;

        let mut state = self.lock();
        state.next_handle += 1;
        let handle = MemoryHandle(state.next_handle);
        state.sessions.insert(handle, None);
        state.last_settings = Some(settings);
        self.inits.fetch_add(1, Ordering::SeqCst);

        Ok(handle)
    }

    async fn invoke(&self, handle: &Self::Handle, command_envelope: &str) -> String {
        self.invocations.fetch_add(1, Ordering::SeqCst);

        let latency_ms = self.latency_ms.load(Ordering::SeqCst);
        if latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(latency_ms)).await;
        }

        self.answer(*handle, command_envelope)
    }

    fn release(&self, handle: Self::Handle) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        if self.lock().sessions.remove(&handle).is_none() {
            warn!("MemoryBackend release of unknown handle {:?}", handle);
        }
    }
}
