use crate::helpers::{
    LOGIN_OK, OTHER_ACCESS_TOKEN, ScriptedBackend, TEST_ACCESS_TOKEN, client, logged_in_client,
    memory_backend, org_a, org_b,
};

use sm_client_core::error::ClientError;
use sm_common::BackendErrorCode;
use sm_models::OrganizationId;

use std::sync::Arc;

use serde_json::{Value, json};
use uuid::Uuid;

/// **VALUE**: Verifies list commands carry the organization on the wire.
///
/// **WHY THIS MATTERS**: The backend scopes every listing by organization. A list request
/// without one would fall back to whatever the backend considers a default tenant.
///
/// **BUG THIS CATCHES**: Would catch organization_id being skipped during serialization.
#[tokio::test]
async fn given_list_calls_when_dispatched_then_envelopes_carry_organization() {
    // GIVEN: A scripted backend answering both lists with empty data
    let empty = r#"{"success":true,"data":{"data":[]}}"#;
    let backend = Arc::new(ScriptedBackend::new([LOGIN_OK, empty, empty]));
    let mut client = client(Arc::clone(&backend));
    client.login(TEST_ACCESS_TOKEN).await.unwrap();

    // WHEN: Listing projects and secrets of org A
    assert!(client.list_projects(org_a()).await.unwrap().is_empty());
    assert!(client.list_secrets(org_a()).await.unwrap().is_empty());

    // THEN: Both envelopes name org A
    let received = backend.received();
    let projects: Value = serde_json::from_str(&received[1]).unwrap();
    let secrets: Value = serde_json::from_str(&received[2]).unwrap();
    let org = org_a().to_string();
    assert_eq!(projects, json!({ "project_list": { "organization_id": org } }));
    assert_eq!(secrets, json!({ "secret_list": { "organization_id": org } }));
}

/// **VALUE**: Verifies the nil organization is rejected before any dispatch.
///
/// **BUG THIS CATCHES**: Would catch a zero UUID (the default of many callers' structs)
/// being sent as a real tenant.
#[tokio::test]
async fn given_nil_organization_when_scoped_call_then_validation_error_without_invoke() {
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    let invocations = backend.invocation_count();
    let nil = OrganizationId::from_uuid(Uuid::nil());

    let results = vec![
        client.list_projects(nil).await.map(drop),
        client.list_secrets(nil).await.map(drop),
        client.sync_secrets(nil, None).await.map(drop),
        client.create_project(nil, "infra").await.map(drop),
        client.create_secret(nil, "KEY", "value", None, &[]).await.map(drop),
    ];

    for result in results {
        match result {
            Err(ClientError::Validation(err)) => assert_eq!(err.field(), "organization_id"),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }
    assert_eq!(backend.invocation_count(), invocations);
}

/// **VALUE**: Verifies a foreign organization is refused by the backend and surfaced verbatim.
///
/// **BUG THIS CATCHES**: Would catch the client hiding a permission refusal behind an
/// empty list.
#[tokio::test]
async fn given_foreign_organization_when_list_then_permission_denied() {
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;

    let projects = client.list_projects(org_b()).await.unwrap_err();
    let secrets = client.list_secrets(org_b()).await.unwrap_err();

    assert_eq!(projects.backend_code(), Some(BackendErrorCode::PermissionDenied));
    assert_eq!(secrets.backend_code(), Some(BackendErrorCode::PermissionDenied));
}

/// **VALUE**: Verifies resources of another tenant are indistinguishable from missing ones.
///
/// **WHY THIS MATTERS**: Answering "forbidden" for a foreign id would confirm that it exists.
///
/// **BUG THIS CATCHES**: Would catch get-by-id skipping the tenant check.
#[tokio::test]
async fn given_foreign_resources_when_get_then_not_found() {
    // GIVEN: A project and secret owned by another account in org B
    let backend = memory_backend();
    let mut other = client(Arc::clone(&backend));
    other.login(OTHER_ACCESS_TOKEN).await.unwrap();
    let project = other.create_project(org_b(), "theirs").await.unwrap();
    let secret = other
        .create_secret(org_b(), "TOKEN", "hidden", None, &[project.id])
        .await
        .unwrap();

    // WHEN: The org A account asks for them by id
    let mut client = logged_in_client(&backend).await;
    let project_err = client.get_project(project.id).await.unwrap_err();
    let secret_err = client.get_secret(secret.id).await.unwrap_err();
    let batch_err = client.get_secrets_by_ids(vec![secret.id]).await.unwrap_err();

    // THEN: All three are NotFound
    for err in [project_err, secret_err, batch_err] {
        assert_eq!(err.backend_code(), Some(BackendErrorCode::NotFound));
    }
}

/// **VALUE**: Verifies a secret cannot be linked to a project of another organization.
///
/// **BUG THIS CATCHES**: Would catch cross-tenant associations being accepted.
#[tokio::test]
async fn given_project_of_other_org_when_create_secret_then_refused() {
    let backend = memory_backend();
    let mut other = client(Arc::clone(&backend));
    other.login(OTHER_ACCESS_TOKEN).await.unwrap();
    let foreign = other.create_project(org_b(), "theirs").await.unwrap();

    let mut client = logged_in_client(&backend).await;
    let err = client
        .create_secret(org_a(), "KEY", "value", None, &[foreign.id])
        .await
        .unwrap_err();

    assert_eq!(err.error_category(), "backend");
    assert!(client.list_secrets(org_a()).await.unwrap().is_empty());
}
