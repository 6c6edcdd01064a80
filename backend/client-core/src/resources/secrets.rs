use crate::backend::Backend;
use crate::codec::command::{
    SecretCreateRequest, SecretGetRequest, SecretIdentifiersRequest, SecretUpdateRequest,
    SecretsDeleteRequest, SecretsGetRequest, SecretsSyncRequest,
};
use crate::codec::{Command, CommandKind, ResponsePayload};
use crate::dispatcher::Dispatcher;
use crate::error::ClientError;
use crate::resources::check_delete_outcomes;

use sm_models::{
    BatchDeleteResult, OrganizationId, Secret, SecretDraft, SecretId, SecretIdentifier,
    SecretsSync,
};

use std::time::SystemTime;

pub struct SecretsClient<'a, B: Backend> {
    dispatcher: &'a mut Dispatcher<B>,
}

impl<'a, B: Backend> SecretsClient<'a, B> {
    pub fn new(dispatcher: &'a mut Dispatcher<B>) -> Self {
        Self { dispatcher }
    }

    pub async fn get(&mut self, id: SecretId) -> Result<Secret, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::SecretGet)?;

        let command = Command::SecretGet(SecretGetRequest::new(id));
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_secret)
            .await
    }

    /// Fetch several secrets in one command. Fails as a whole if any id is missing.
    pub async fn get_by_ids(&mut self, ids: Vec<SecretId>) -> Result<Vec<Secret>, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::SecretGetByIds)?;

        let command = Command::SecretGetByIds(SecretsGetRequest::new(ids)?);
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_secrets)
            .await
    }

    pub async fn create(&mut self, draft: SecretDraft) -> Result<Secret, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::SecretCreate)?;

        let command = Command::SecretCreate(SecretCreateRequest::new(draft));
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_secret)
            .await
    }

    pub async fn update(
        &mut self,
        id: SecretId,
        draft: SecretDraft,
    ) -> Result<Secret, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::SecretUpdate)?;

        let command = Command::SecretUpdate(SecretUpdateRequest::new(id, draft));
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_secret)
            .await
    }

    /// Delete a batch. Outcomes must cover exactly the distinct requested ids.
    pub async fn delete(
        &mut self,
        ids: Vec<SecretId>,
    ) -> Result<BatchDeleteResult<SecretId>, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::SecretDelete)?;

        let request = SecretsDeleteRequest::new(ids)?;
        let requested = request.ids().to_vec();
        let result = self
            .dispatcher
            .dispatch_expect(
                Command::SecretDelete(request),
                ResponsePayload::into_secrets_deleted,
            )
            .await?;

        check_delete_outcomes(CommandKind::SecretDelete, &requested, &result)?;
        Ok(result)
    }

    /// Identifiers and keys only; values are fetched with [`Self::get`] or [`Self::get_by_ids`].
    pub async fn list(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<SecretIdentifier>, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::SecretList)?;

        let command = Command::SecretList(SecretIdentifiersRequest::new(organization_id)?);
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_secret_identifiers)
            .await
    }

    /// Secrets of the organization if anything changed since `last_synced`.
    pub async fn sync(
        &mut self,
        organization_id: OrganizationId,
        last_synced: Option<SystemTime>,
    ) -> Result<SecretsSync, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::SecretSync)?;

        let command = Command::SecretSync(SecretsSyncRequest::new(organization_id, last_synced)?);
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_secrets_sync)
            .await
    }
}
