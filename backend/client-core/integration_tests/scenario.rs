use crate::helpers::{logged_in_client, memory_backend, org_a};

use sm_client_core::ClientError;
use sm_client_core::session::SessionState;
use sm_common::BackendErrorCode;
use sm_models::SecretDraft;

use std::time::{Duration, UNIX_EPOCH};

/// **VALUE**: Walks the basic project lifecycle end to end.
///
/// **WHY THIS MATTERS**: This is the sequence every consumer runs first: log in, create,
/// list, delete, confirm it is gone.
///
/// **BUG THIS CATCHES**: Would catch any break between the facade, codec and backend for
/// the project commands.
#[tokio::test]
async fn given_logged_in_client_when_project_created_listed_and_deleted_then_consistent() {
    // GIVEN: A logged-in client
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    assert_eq!(client.session_state(), SessionState::Authenticated);

    // WHEN: Creating project "infra"
    let project = client.create_project(org_a(), "infra").await.unwrap();

    // THEN: It is listed under its organization
    assert_eq!(project.name, "infra");
    assert_eq!(project.organization_id, org_a());
    let listed = client.list_projects(org_a()).await.unwrap();
    assert_eq!(listed, vec![project.clone()]);

    // WHEN: Renaming it
    let renamed = client
        .update_project(project.id, org_a(), "  platform  ")
        .await
        .unwrap();
    assert_eq!(renamed.name, "platform");
    assert_eq!(renamed.creation_date, project.creation_date);
    assert!(renamed.revision_date > project.revision_date);

    // WHEN: Deleting it
    let deleted = client.delete_projects(vec![project.id]).await.unwrap();
    assert!(deleted.is_complete_success());

    // THEN: Fetching it is NotFound
    let err = client.get_project(project.id).await.unwrap_err();
    assert_eq!(err.backend_code(), Some(BackendErrorCode::NotFound));
}

/// **VALUE**: Walks secret create, read, update, bulk read and delete.
///
/// **BUG THIS CATCHES**: Would catch the value, note or project links being lost between
/// draft and stored secret.
#[tokio::test]
async fn given_project_when_secret_lifecycle_run_then_fields_survive() {
    // GIVEN: A project to link secrets to
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    let project = client.create_project(org_a(), "payments").await.unwrap();

    // WHEN: Creating two secrets
    let db = client
        .create_secret(org_a(), "DB_URL", "postgres://db", Some("primary"), &[project.id])
        .await
        .unwrap();
    let api = client
        .create_secret(org_a(), "API_KEY", "k-123", None, &[])
        .await
        .unwrap();

    // THEN: Reads return the stored fields
    let fetched = client.get_secret(db.id).await.unwrap();
    assert_eq!(fetched.value, "postgres://db");
    assert_eq!(fetched.note, "primary");
    assert_eq!(fetched.project_ids, vec![project.id]);
    assert_eq!(api.note, "");

    let both = client.get_secrets_by_ids(vec![db.id, api.id]).await.unwrap();
    assert_eq!(both.len(), 2);

    // AND: Listing returns identifiers only
    let mut keys: Vec<String> = client
        .list_secrets(org_a())
        .await
        .unwrap()
        .into_iter()
        .map(|identifier| identifier.key)
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["API_KEY", "DB_URL"]);

    // WHEN: Updating the value and dropping the project link
    let updated = client
        .update_secret(db.id, org_a(), "DB_URL", "postgres://replica", None, &[])
        .await
        .unwrap();
    assert_eq!(updated.value, "postgres://replica");
    assert!(updated.project_ids.is_empty());

    // WHEN: Deleting both
    let deleted = client.delete_secrets(vec![db.id, api.id]).await.unwrap();
    assert!(deleted.is_complete_success());
    assert!(client.list_secrets(org_a()).await.unwrap().is_empty());
}

/// **VALUE**: Verifies sync reports changes only after writes newer than the caller's mark.
///
/// **WHY THIS MATTERS**: Sync is how long-running consumers avoid refetching every secret.
/// A false "no changes" leaves them running with stale credentials.
///
/// **BUG THIS CATCHES**: Would catch last_synced_date being dropped from the request or
/// truncated so that a fresh write looks old.
#[tokio::test]
async fn given_sync_mark_when_secrets_change_then_has_changes_flips() {
    // GIVEN: One secret
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    let secret = client
        .create_secret(org_a(), "TOKEN", "v1", None, &[])
        .await
        .unwrap();

    // WHEN: Syncing without a mark
    let first = client.sync_secrets(org_a(), None).await.unwrap();

    // THEN: Everything is returned
    assert!(first.has_changes);
    let secrets = first.secrets.unwrap();
    assert_eq!(secrets.len(), 1);
    let mark = secrets[0].revision_date;

    // WHEN: Syncing with the latest revision date
    let unchanged = client.sync_secrets(org_a(), Some(mark)).await.unwrap();

    // THEN: No changes and no payload
    assert!(!unchanged.has_changes);
    assert!(unchanged.secrets.is_none());

    // WHEN: The secret changes
    client
        .update_secret(secret.id, org_a(), "TOKEN", "v2", None, &[])
        .await
        .unwrap();
    let changed = client.sync_secrets(org_a(), Some(mark)).await.unwrap();

    // THEN: The new value comes back
    assert!(changed.has_changes);
    assert_eq!(changed.secrets.unwrap()[0].value, "v2");
}

/// **VALUE**: Verifies a sync mark before 1970 is rejected before anything is sent.
///
/// **WHY THIS MATTERS**: Such an instant has no RFC 3339 form. Encoding it used to panic in
/// the middle of a dispatch.
///
/// **BUG THIS CATCHES**: Would catch the sync request accepting any `SystemTime`.
#[tokio::test]
async fn given_pre_epoch_sync_mark_when_sync_then_validation_error_without_invoke() {
    // GIVEN: A logged-in client
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    let invocations = backend.invocation_count();

    // WHEN: Syncing with a mark one second before the epoch
    let mark = UNIX_EPOCH - Duration::from_secs(1);
    let error = client.sync_secrets(org_a(), Some(mark)).await.unwrap_err();

    // THEN: A validation error on the mark, and the backend never saw the command
    match error {
        ClientError::Validation(ref model) => assert_eq!(model.field(), "last_synced_date"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(backend.invocation_count(), invocations);
}

/// **VALUE**: Verifies deleting a project keeps its secrets and only removes the link.
///
/// **BUG THIS CATCHES**: Would catch project deletion cascading into secret deletion.
#[tokio::test]
async fn given_linked_secret_when_project_deleted_then_secret_kept_without_link() {
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    let project = client.create_project(org_a(), "legacy").await.unwrap();
    let secret = client
        .create_secret(org_a(), "OLD_KEY", "value", None, &[project.id])
        .await
        .unwrap();

    client.delete_projects(vec![project.id]).await.unwrap();

    let kept = client.get_secret(secret.id).await.unwrap();
    assert_eq!(kept.value, "value");
    assert!(kept.project_ids.is_empty());
}

/// **VALUE**: Verifies the resource sub-clients behave like the flat facade methods.
#[tokio::test]
async fn given_sub_clients_when_used_then_same_results_as_facade() {
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;

    let project = client.projects().create(org_a(), "tools").await.unwrap();
    let draft = SecretDraft::builder()
        .with_organization_id(org_a())
        .with_key("CI_TOKEN")
        .with_value("t0k3n")
        .with_project_ids(vec![project.id])
        .build()
        .unwrap();
    let secret = client.secrets().create(draft).await.unwrap();

    assert_eq!(client.projects().get(project.id).await.unwrap(), project);
    assert_eq!(client.get_secret(secret.id).await.unwrap(), secret);
    assert_eq!(client.secrets().list(org_a()).await.unwrap().len(), 1);
    assert!(client.secrets().sync(org_a(), None).await.unwrap().has_changes);
}
