//! Public entry point: one client per logical session.
//!
//! The client owns the backend handle for its whole life. `close` (or drop)
//! releases it exactly once; after that every operation fails with
//! `ClosedError` and the backend is never touched again.

use crate::ACCESS_TOKEN_ENV_VAR;
use crate::auth::{AccessToken, access_token_from_env};
use crate::backend::{Backend, BackendHandle};
use crate::codec::{CommandKind, encode_settings};
use crate::config::{ClientConfig, ClientSettings};
use crate::dispatcher::Dispatcher;
use crate::error::{ClientError, ConstructionError};
use crate::logger;
use crate::resources::{GeneratorsClient, ProjectsClient, SecretsClient};
use crate::session::SessionState;

use sm_models::{
    BatchDeleteResult, GeneratedPassword, OrganizationId, PasswordPolicy, Project, ProjectId,
    Secret, SecretDraft, SecretId, SecretIdentifier, SecretsSync,
};

use std::path::Path;
use std::time::SystemTime;

use log::info;

pub struct SecretsManagerClient<B: Backend> {
    dispatcher: Dispatcher<B>,
}

impl<B: Backend> SecretsManagerClient<B> {
    /// Validate `config`, hand its settings to the backend's `init` and hold the handle.
    ///
    /// # Errors
    ///
    /// - `ConfigError` when the config is invalid (the backend is not called)
    /// - `ConstructionError` when the settings cannot be encoded or `init` fails
    pub fn new(backend: B, config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let settings = config.effective_settings();
        let envelope = encode_settings(&settings)
            .map_err(|e| ConstructionError::settings(e.to_string()))?;

        let handle = BackendHandle::acquire(backend, &envelope)?;
        info!(
            "Secrets client ready (api: {}, identity: {})",
            settings.api_url, settings.identity_url
        );

        Ok(Self {
            dispatcher: Dispatcher::new(handle, config.dispatch.clone()),
        })
    }

    /// Host entry point: load `{config_dir}/config.toml`, install logging from its
    /// `[logging]` table, then build the client.
    ///
    /// # Errors
    ///
    /// - `ConfigError` when the file is unreadable or invalid (a missing file means defaults)
    /// - `LoggerError` when the configured log output cannot be set up
    /// - everything [`Self::new`] reports
    pub fn from_config_dir(backend: B, config_dir: &Path) -> Result<Self, ClientError> {
        let config = ClientConfig::load(config_dir)?;
        logger::initialize(&config.logging)?;
        Self::new(backend, &config)
    }

    /// Client with default dispatch behavior and the given settings.
    pub fn with_settings(backend: B, settings: ClientSettings) -> Result<Self, ClientError> {
        let config = ClientConfig {
            settings,
            ..ClientConfig::default()
        };
        Self::new(backend, &config)
    }

    pub async fn login(&mut self, access_token: &str) -> Result<(), ClientError> {
        self.dispatcher.ensure_ready(CommandKind::AccessTokenLogin)?;

        let token = AccessToken::parse(access_token)?;
        self.dispatcher.login(token).await
    }

    pub async fn login_with_token(&mut self, token: AccessToken) -> Result<(), ClientError> {
        self.dispatcher.login(token).await
    }

    /// Log in with the token in `SM_ACCESS_TOKEN` (a `.env` file is honored).
    pub async fn login_from_env(&mut self) -> Result<(), ClientError> {
        self.dispatcher.ensure_ready(CommandKind::AccessTokenLogin)?;

        let token = access_token_from_env(ACCESS_TOKEN_ENV_VAR)?;
        self.dispatcher.login(token).await
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.dispatcher.logout()
    }

    pub fn session_state(&self) -> SessionState {
        self.dispatcher.session_state()
    }

    pub fn is_closed(&self) -> bool {
        self.dispatcher.is_closed()
    }

    /// Release the backend handle. Idempotent.
    pub fn close(&mut self) {
        self.dispatcher.close();
    }

    /// The backend, until the client is closed.
    pub fn backend(&self) -> Option<&B> {
        self.dispatcher.backend()
    }

    pub fn projects(&mut self) -> ProjectsClient<'_, B> {
        ProjectsClient::new(&mut self.dispatcher)
    }

    pub fn secrets(&mut self) -> SecretsClient<'_, B> {
        SecretsClient::new(&mut self.dispatcher)
    }

    pub fn generators(&mut self) -> GeneratorsClient<'_, B> {
        GeneratorsClient::new(&mut self.dispatcher)
    }

    // ========================================================================
    // Projects
    // ========================================================================

    pub async fn get_project(&mut self, id: ProjectId) -> Result<Project, ClientError> {
        self.projects().get(id).await
    }

    pub async fn create_project(
        &mut self,
        organization_id: OrganizationId,
        name: &str,
    ) -> Result<Project, ClientError> {
        self.projects().create(organization_id, name).await
    }

    pub async fn update_project(
        &mut self,
        id: ProjectId,
        organization_id: OrganizationId,
        name: &str,
    ) -> Result<Project, ClientError> {
        self.projects().update(id, organization_id, name).await
    }

    pub async fn list_projects(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Project>, ClientError> {
        self.projects().list(organization_id).await
    }

    pub async fn delete_projects(
        &mut self,
        ids: Vec<ProjectId>,
    ) -> Result<BatchDeleteResult<ProjectId>, ClientError> {
        self.projects().delete(ids).await
    }

    // ========================================================================
    // Secrets
    // ========================================================================

    pub async fn get_secret(&mut self, id: SecretId) -> Result<Secret, ClientError> {
        self.secrets().get(id).await
    }

    pub async fn get_secrets_by_ids(
        &mut self,
        ids: Vec<SecretId>,
    ) -> Result<Vec<Secret>, ClientError> {
        self.secrets().get_by_ids(ids).await
    }

    pub async fn create_secret(
        &mut self,
        organization_id: OrganizationId,
        key: &str,
        value: &str,
        note: Option<&str>,
        project_ids: &[ProjectId],
    ) -> Result<Secret, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::SecretCreate)?;

        let draft = secret_draft(organization_id, key, value, note, project_ids)?;
        self.secrets().create(draft).await
    }

    pub async fn update_secret(
        &mut self,
        id: SecretId,
        organization_id: OrganizationId,
        key: &str,
        value: &str,
        note: Option<&str>,
        project_ids: &[ProjectId],
    ) -> Result<Secret, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::SecretUpdate)?;

        let draft = secret_draft(organization_id, key, value, note, project_ids)?;
        self.secrets().update(id, draft).await
    }

    pub async fn list_secrets(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<SecretIdentifier>, ClientError> {
        self.secrets().list(organization_id).await
    }

    pub async fn delete_secrets(
        &mut self,
        ids: Vec<SecretId>,
    ) -> Result<BatchDeleteResult<SecretId>, ClientError> {
        self.secrets().delete(ids).await
    }

    pub async fn sync_secrets(
        &mut self,
        organization_id: OrganizationId,
        last_synced: Option<SystemTime>,
    ) -> Result<SecretsSync, ClientError> {
        self.secrets().sync(organization_id, last_synced).await
    }

    // ========================================================================
    // Generators
    // ========================================================================

    /// Generate a password. No login is needed; a closed client still refuses.
    pub async fn generate_password(
        &mut self,
        policy: &PasswordPolicy,
    ) -> Result<GeneratedPassword, ClientError> {
        self.generators().password(policy).await
    }
}

#[track_caller]
fn secret_draft(
    organization_id: OrganizationId,
    key: &str,
    value: &str,
    note: Option<&str>,
    project_ids: &[ProjectId],
) -> Result<SecretDraft, ClientError> {
    let mut builder = SecretDraft::builder()
        .with_organization_id(organization_id)
        .with_key(key)
        .with_value(value)
        .with_project_ids(project_ids.iter().copied());

    if let Some(note) = note {
        builder = builder.with_note(note);
    }

    Ok(builder.build()?)
}

impl<B: Backend> Drop for SecretsManagerClient<B> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<B: Backend> std::fmt::Debug for SecretsManagerClient<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsManagerClient")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
