use crate::helpers::{
    LOGIN_OK, OTHER_ACCESS_TOKEN, ScriptedBackend, TEST_ACCESS_TOKEN, client, logged_in_client,
    memory_backend, org_a, org_b,
};

use sm_client_core::SecretsManagerClient;
use sm_client_core::error::{ClientError, DispatchError};
use sm_models::{ProjectId, SecretId};

use std::sync::Arc;

/// **VALUE**: Verifies a project batch with existing and missing ids reports each id separately.
///
/// **WHY THIS MATTERS**: A single success flag for a partially applied batch hides which
/// projects still exist.
///
/// **BUG THIS CATCHES**: Would catch the client turning a partial failure into a whole-call
/// error, or dropping outcomes for refused ids.
#[tokio::test]
async fn given_mixed_project_ids_when_delete_then_per_id_outcomes() {
    // GIVEN: Two existing projects and one unknown id
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    let first = client.create_project(org_a(), "first").await.unwrap();
    let second = client.create_project(org_a(), "second").await.unwrap();
    let missing = ProjectId::new_random();

    // WHEN: Deleting all three in one batch
    let result = client
        .delete_projects(vec![first.id, missing, second.id])
        .await
        .unwrap();

    // THEN: Two succeeded, the unknown one failed with a message
    assert_eq!(result.len(), 3);
    assert!(!result.is_complete_success());
    assert_eq!(result.succeeded(), vec![first.id, second.id]);
    assert_eq!(result.failed().len(), 1);
    let outcome = result.outcome_for(missing).unwrap();
    assert_eq!(outcome.error.as_deref(), Some("Resource not found."));

    // AND: The deleted projects are gone
    assert!(client.list_projects(org_a()).await.unwrap().is_empty());
}

/// **VALUE**: Verifies a secret batch reports a per-id refusal for a foreign secret.
///
/// **BUG THIS CATCHES**: Would catch another tenant's secret being deleted because it was
/// bundled with the caller's own ids.
#[tokio::test]
async fn given_foreign_secret_in_batch_when_delete_then_only_foreign_id_fails() {
    // GIVEN: A secret in org A and one created by another account in org B
    let backend = memory_backend();
    let mut own = logged_in_client(&backend).await;
    let mine = own
        .create_secret(org_a(), "API_KEY", "abc", None, &[])
        .await
        .unwrap();

    let mut other = client(Arc::clone(&backend));
    other.login(OTHER_ACCESS_TOKEN).await.unwrap();
    let theirs = other
        .create_secret(org_b(), "API_KEY", "xyz", None, &[])
        .await
        .unwrap();

    // WHEN: The first account deletes both
    let result = own.delete_secrets(vec![mine.id, theirs.id]).await.unwrap();

    // THEN: Own secret deleted, foreign one refused and still present for its owner
    assert_eq!(result.succeeded(), vec![mine.id]);
    assert!(result.outcome_for(theirs.id).is_some_and(|o| !o.is_success()));
    assert_eq!(other.get_secret(theirs.id).await.unwrap().value, "xyz");
}

/// **VALUE**: Verifies an empty batch is rejected locally.
///
/// **BUG THIS CATCHES**: Would catch an empty delete reaching the backend, where its meaning
/// ("nothing" or "everything") is undefined.
#[tokio::test]
async fn given_empty_batch_when_delete_then_validation_error_without_invoke() {
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    let invocations = backend.invocation_count();

    let projects = client.delete_projects(Vec::new()).await.unwrap_err();
    let secrets = client.delete_secrets(Vec::<SecretId>::new()).await.unwrap_err();

    assert_eq!(projects.error_category(), "validation");
    assert_eq!(secrets.error_category(), "validation");
    assert_eq!(backend.invocation_count(), invocations);
}

async fn scripted_delete(answer: String) -> SecretsManagerClient<Arc<ScriptedBackend>> {
    let backend = Arc::new(ScriptedBackend::new([LOGIN_OK.to_string(), answer]));
    let mut client = client(backend);
    client.login(TEST_ACCESS_TOKEN).await.unwrap();
    client
}

fn deleted_envelope(ids: &[SecretId]) -> String {
    let outcomes: Vec<String> = ids.iter().map(|id| format!(r#"{{"id":"{id}"}}"#)).collect();
    format!(r#"{{"success":true,"data":{{"data":[{}]}}}}"#, outcomes.join(","))
}

fn assert_malformed(error: ClientError, expected: &str) {
    match error {
        ClientError::Dispatch(DispatchError::Malformed { message, .. }) => {
            assert!(message.contains(expected), "unexpected message: {message}");
        }
        other => panic!("expected malformed response, got {other:?}"),
    }
}

/// **VALUE**: Verifies an outcome for an id that was never requested is rejected.
///
/// **WHY THIS MATTERS**: Callers look outcomes up by the ids they sent. An outcome for a
/// different id would report a deletion that never happened to the caller's ids.
///
/// **BUG THIS CATCHES**: Would catch the client accepting any well-shaped outcome list.
#[tokio::test]
async fn given_outcome_for_unrequested_id_when_delete_secrets_then_malformed() {
    // GIVEN: A backend answering a delete of `requested` with an outcome for `stranger`
    let requested = SecretId::new_random();
    let stranger = SecretId::new_random();
    let mut client = scripted_delete(deleted_envelope(&[stranger])).await;

    // WHEN: Deleting `requested`
    let error = client.delete_secrets(vec![requested]).await.unwrap_err();

    // THEN: The answer is malformed
    assert_malformed(error, "unrequested id");
}

/// **VALUE**: Verifies an answer that silently skips a requested id is rejected.
///
/// **BUG THIS CATCHES**: Would catch a dropped outcome being read as "nothing to report",
/// leaving the caller unsure whether the secret still exists.
#[tokio::test]
async fn given_outcome_missing_for_requested_id_when_delete_secrets_then_malformed() {
    let first = SecretId::new_random();
    let second = SecretId::new_random();
    let mut client = scripted_delete(deleted_envelope(&[first])).await;

    let error = client.delete_secrets(vec![first, second]).await.unwrap_err();

    assert_malformed(error, "no outcome reported");
}

#[tokio::test]
async fn given_duplicate_outcomes_when_delete_secrets_then_malformed() {
    let id = SecretId::new_random();
    let mut client = scripted_delete(deleted_envelope(&[id, id])).await;

    let error = client.delete_secrets(vec![id]).await.unwrap_err();

    assert_malformed(error, "more than one outcome");
}

/// **VALUE**: Verifies a project delete answer for the wrong id is rejected the same way.
///
/// **BUG THIS CATCHES**: Would catch the outcome check being wired to secrets only.
#[tokio::test]
async fn given_outcome_for_unrequested_id_when_delete_projects_then_malformed() {
    // GIVEN: A backend reporting a project id nobody asked about
    let requested = ProjectId::new_random();
    let stranger = ProjectId::new_random();
    let answer = format!(r#"{{"success":true,"data":{{"data":[{{"id":"{stranger}"}}]}}}}"#);
    let mut client = scripted_delete(answer).await;

    // WHEN: Deleting `requested`
    let error = client.delete_projects(vec![requested]).await.unwrap_err();

    // THEN: Malformed, not a successful batch
    assert_malformed(error, "unrequested id");
}

/// **VALUE**: Verifies a repeated id in the request needs only one outcome.
///
/// **BUG THIS CATCHES**: Would catch the check counting requested ids instead of distinct ones.
#[tokio::test]
async fn given_repeated_requested_id_when_single_outcome_then_accepted() {
    let id = SecretId::new_random();
    let mut client = scripted_delete(deleted_envelope(&[id])).await;

    let result = client.delete_secrets(vec![id, id]).await.unwrap();

    assert_eq!(result.succeeded(), vec![id]);
}
