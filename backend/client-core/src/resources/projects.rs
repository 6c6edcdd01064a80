use crate::backend::Backend;
use crate::codec::command::{
    ProjectCreateRequest, ProjectGetRequest, ProjectUpdateRequest, ProjectsDeleteRequest,
    ProjectsListRequest,
};
use crate::codec::{Command, CommandKind, ResponsePayload};
use crate::dispatcher::Dispatcher;
use crate::error::ClientError;
use crate::resources::check_delete_outcomes;

use sm_models::{BatchDeleteResult, OrganizationId, Project, ProjectDraft, ProjectId};

pub struct ProjectsClient<'a, B: Backend> {
    dispatcher: &'a mut Dispatcher<B>,
}

impl<'a, B: Backend> ProjectsClient<'a, B> {
    pub fn new(dispatcher: &'a mut Dispatcher<B>) -> Self {
        Self { dispatcher }
    }

    pub async fn get(&mut self, id: ProjectId) -> Result<Project, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::ProjectGet)?;

        let command = Command::ProjectGet(ProjectGetRequest::new(id));
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_project)
            .await
    }

    pub async fn create(
        &mut self,
        organization_id: OrganizationId,
        name: &str,
    ) -> Result<Project, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::ProjectCreate)?;

        let draft = ProjectDraft::new(organization_id, name)?;
        let command = Command::ProjectCreate(ProjectCreateRequest::new(draft));
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_project)
            .await
    }

    /// Replace the project's name. The organization must be the project's own.
    pub async fn update(
        &mut self,
        id: ProjectId,
        organization_id: OrganizationId,
        name: &str,
    ) -> Result<Project, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::ProjectUpdate)?;

        let draft = ProjectDraft::new(organization_id, name)?;
        let command = Command::ProjectUpdate(ProjectUpdateRequest::new(id, draft));
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_project)
            .await
    }

    /// Delete a batch. The result carries one outcome per distinct requested id;
    /// an answer that reports other ids, or skips one, is malformed.
    ///
    /// Secrets associated with a deleted project are not deleted.
    pub async fn delete(
        &mut self,
        ids: Vec<ProjectId>,
    ) -> Result<BatchDeleteResult<ProjectId>, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::ProjectDelete)?;

        let request = ProjectsDeleteRequest::new(ids)?;
        let requested = request.ids().to_vec();
        let result = self
            .dispatcher
            .dispatch_expect(
                Command::ProjectDelete(request),
                ResponsePayload::into_projects_deleted,
            )
            .await?;

        check_delete_outcomes(CommandKind::ProjectDelete, &requested, &result)?;
        Ok(result)
    }

    pub async fn list(
        &mut self,
        organization_id: OrganizationId,
    ) -> Result<Vec<Project>, ClientError> {
        self.dispatcher.ensure_ready(CommandKind::ProjectList)?;

        let command = Command::ProjectList(ProjectsListRequest::new(organization_id)?);
        self.dispatcher
            .dispatch_expect(command, ResponsePayload::into_projects)
            .await
    }
}
