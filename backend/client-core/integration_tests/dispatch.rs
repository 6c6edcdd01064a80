use crate::helpers::{
    LOGIN_OK, ScriptedBackend, TEST_ACCESS_TOKEN, client, logged_in_client, memory_backend, org_a,
};

use sm_client_core::SecretsManagerClient;
use sm_client_core::config::{ClientConfig, DispatchConfig};
use sm_client_core::error::{ClientError, DispatchError};
use sm_common::BackendErrorCode;
use sm_models::ProjectId;

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{Value, json};

async fn scripted_logged_in(
    responses: &[&str],
) -> (Arc<ScriptedBackend>, SecretsManagerClient<Arc<ScriptedBackend>>) {
    let script = std::iter::once(LOGIN_OK).chain(responses.iter().copied());
    let backend = Arc::new(ScriptedBackend::new(script));
    let mut client = client(Arc::clone(&backend));
    client.login(TEST_ACCESS_TOKEN).await.unwrap();
    (backend, client)
}

/// **VALUE**: Verifies each resource call results in exactly one backend invoke.
///
/// **WHY THIS MATTERS**: Hidden extra invokes (pre-flight checks, retries) would double
/// side effects and make backend load unpredictable.
///
/// **BUG THIS CATCHES**: Would catch a resource method dispatching twice (e.g. a create
/// followed by an implicit get).
#[tokio::test]
async fn given_logged_in_client_when_each_operation_called_then_one_invoke_each() {
    // GIVEN: A logged-in client
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    let mut expected = backend.invocation_count();

    // WHEN/THEN: Each operation adds exactly one invoke
    let project = client.create_project(org_a(), "infra").await.unwrap();
    expected += 1;
    assert_eq!(backend.invocation_count(), expected);

    client.get_project(project.id).await.unwrap();
    client.update_project(project.id, org_a(), "infra-2").await.unwrap();
    client.list_projects(org_a()).await.unwrap();
    expected += 3;
    assert_eq!(backend.invocation_count(), expected);

    let secret = client
        .create_secret(org_a(), "DB_URL", "postgres://", None, &[project.id])
        .await
        .unwrap();
    client.get_secret(secret.id).await.unwrap();
    client.get_secrets_by_ids(vec![secret.id]).await.unwrap();
    client
        .update_secret(secret.id, org_a(), "DB_URL", "postgres://db", Some("primary"), &[])
        .await
        .unwrap();
    client.list_secrets(org_a()).await.unwrap();
    client.sync_secrets(org_a(), None).await.unwrap();
    client.delete_secrets(vec![secret.id]).await.unwrap();
    client.delete_projects(vec![project.id]).await.unwrap();
    expected += 8;
    assert_eq!(backend.invocation_count(), expected);
}

/// **VALUE**: Verifies the outgoing envelope is exactly the tagged command.
///
/// **BUG THIS CATCHES**: Would catch extra fields or a changed tag reaching the backend.
#[tokio::test]
async fn given_get_project_when_dispatched_then_backend_receives_tagged_envelope() {
    let id = ProjectId::new_random();
    let (backend, mut client) = scripted_logged_in(&[
        r#"{"success":false,"error_message":"Resource not found.","error_code":"not_found"}"#,
    ])
    .await;

    let _ = client.get_project(id).await;

    let received = backend.received();
    let login: Value = serde_json::from_str(&received[0]).unwrap();
    let get: Value = serde_json::from_str(&received[1]).unwrap();
    assert_eq!(login, json!({ "access_token_login": { "access_token": TEST_ACCESS_TOKEN } }));
    assert_eq!(get, json!({ "project_get": { "id": id.to_string() } }));
}

/// **VALUE**: Verifies backend failures surface verbatim as DispatchError::Backend.
///
/// **WHY THIS MATTERS**: Callers decide for themselves whether a permission error is worth
/// retrying; rewriting the message or code takes that decision away.
///
/// **BUG THIS CATCHES**: Would catch backend errors being mapped to Malformed, or the
/// message being replaced.
#[tokio::test]
async fn given_backend_failure_when_dispatched_then_backend_error_verbatim() {
    let (_backend, mut client) = scripted_logged_in(&[
        r#"{"success":false,"error_message":"You do not have permission.","error_code":"permission_denied"}"#,
        r#"{"success":false,"error_message":"Something new"}"#,
    ])
    .await;

    let denied = client.list_projects(org_a()).await.unwrap_err();
    let uncoded = client.list_projects(org_a()).await.unwrap_err();

    match denied {
        ClientError::Dispatch(DispatchError::Backend {
            operation,
            code,
            message,
            ..
        }) => {
            assert_eq!(operation, "project_list");
            assert_eq!(code, BackendErrorCode::PermissionDenied);
            assert_eq!(message, "You do not have permission.");
        }
        other => panic!("Expected Backend error, got {other}"),
    }
    assert_eq!(uncoded.backend_code(), Some(BackendErrorCode::Unknown));
}

/// **VALUE**: Verifies undecodable answers become Malformed and never a default value.
///
/// **WHY THIS MATTERS**: An empty project list returned for a garbled answer would look
/// like "this organization has no projects".
///
/// **BUG THIS CATCHES**: Would catch decode failures being swallowed or mapped to Backend.
#[tokio::test]
async fn given_malformed_answers_when_dispatched_then_malformed_error() {
    // GIVEN: Garbage, a contradictory envelope, and a payload for the wrong command
    let (_backend, mut client) = scripted_logged_in(&[
        "<html>502 Bad Gateway</html>",
        r#"{"success":true,"data":{"data":[]},"error_message":"both"}"#,
        r#"{"success":true,"data":{"authenticated":true}}"#,
    ])
    .await;

    // WHEN: Listing three times
    let mut errors = Vec::new();
    for _ in 0..3 {
        errors.push(client.list_projects(org_a()).await.unwrap_err());
    }

    // THEN: All three are Malformed for project_list
    for err in errors {
        match err {
            ClientError::Dispatch(DispatchError::Malformed { operation, .. }) => {
                assert_eq!(operation, "project_list");
            }
            other => panic!("Expected Malformed, got {other}"),
        }
    }
}

/// **VALUE**: Verifies a configured timeout turns a hung backend into DispatchError::Timeout.
///
/// **BUG THIS CATCHES**: Would catch the timeout not being applied (the call would hang for
/// the full backend delay).
#[tokio::test]
async fn given_hung_backend_and_timeout_when_login_then_timeout_error_quickly() {
    // GIVEN: A backend that takes 5 s and a 50 ms timeout
    let backend = Arc::new(ScriptedBackend::new([LOGIN_OK]).with_delay(Duration::from_secs(5)));
    let config = ClientConfig {
        dispatch: DispatchConfig {
            invoke_timeout_ms: Some(50),
            retry: None,
        },
        ..ClientConfig::default()
    };
    let mut client = SecretsManagerClient::new(Arc::clone(&backend), &config).unwrap();

    // WHEN: Logging in
    let started = Instant::now();
    let result = client.login(TEST_ACCESS_TOKEN).await;

    // THEN: Timeout well before the backend would answer, one invoke
    assert_eq!(result.unwrap_err().error_category(), "timeout");
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(backend.received().len(), 1);
}
