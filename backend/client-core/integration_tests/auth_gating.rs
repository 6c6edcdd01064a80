use crate::helpers::{
    LOGIN_OK, ScriptedBackend, TEST_ACCESS_TOKEN, client, logged_in_client, memory_backend, org_a,
};

use sm_client_core::error::{AuthError, ClientError, TokenFormatFailure};
use sm_client_core::session::SessionState;
use sm_models::{ProjectId, SecretId};

use std::sync::Arc;

/// **VALUE**: Verifies every resource operation is refused before login and nothing is invoked.
///
/// **WHY THIS MATTERS**: Auth gating is a local precondition. If any operation slipped
/// through, the only protection left would be the backend's own check.
///
/// **BUG THIS CATCHES**: Would catch a resource method dispatching without the gate, or
/// validating input before checking the session.
#[tokio::test]
async fn given_unauthenticated_client_when_resource_operations_called_then_auth_error_without_invoke() {
    // GIVEN: A client that never logged in
    let backend = memory_backend();
    let mut client = client(Arc::clone(&backend));

    // WHEN: Calling every resource operation
    let results: Vec<Result<(), ClientError>> = vec![
        client.get_project(ProjectId::new_random()).await.map(drop),
        client.create_project(org_a(), "infra").await.map(drop),
        client.create_project(org_a(), "   ").await.map(drop),
        client.update_project(ProjectId::new_random(), org_a(), "x").await.map(drop),
        client.list_projects(org_a()).await.map(drop),
        client.delete_projects(vec![ProjectId::new_random()]).await.map(drop),
        client.get_secret(SecretId::new_random()).await.map(drop),
        client.get_secrets_by_ids(vec![]).await.map(drop),
        client.create_secret(org_a(), "K", "V", Some("n"), &[]).await.map(drop),
        client.update_secret(SecretId::new_random(), org_a(), "K", "V", None, &[]).await.map(drop),
        client.list_secrets(org_a()).await.map(drop),
        client.delete_secrets(vec![SecretId::new_random()]).await.map(drop),
        client.sync_secrets(org_a(), None).await.map(drop),
        client.projects().list(org_a()).await.map(drop),
        client.secrets().list(org_a()).await.map(drop),
    ];

    // THEN: AuthError::NotAuthenticated everywhere, zero invokes
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Err(ClientError::Auth(AuthError::NotAuthenticated { state, .. })) => {
                assert_eq!(state, SessionState::Unauthenticated, "operation #{index}");
            }
            other => panic!("operation #{index}: expected NotAuthenticated, got {other:?}"),
        }
    }
    assert_eq!(backend.invocation_count(), 0);
}

/// **VALUE**: Verifies a malformed token is rejected locally with the reason.
///
/// **BUG THIS CATCHES**: Would catch a bad token being sent to the backend.
#[tokio::test]
async fn given_malformed_token_when_login_then_invalid_token_without_invoke() {
    let backend = memory_backend();
    let mut client = client(Arc::clone(&backend));

    let result = client.login("token-A").await;

    assert!(matches!(
        result,
        Err(ClientError::Auth(AuthError::InvalidAccessToken {
            reason: TokenFormatFailure::InvalidStructure,
            ..
        }))
    ));
    assert_eq!(backend.invocation_count(), 0);
    assert_eq!(client.session_state(), SessionState::Unauthenticated);
}

/// **VALUE**: Verifies a second login on an authenticated client is refused, not re-run.
///
/// **WHY THIS MATTERS**: Silently re-logging in could switch service accounts under callers.
///
/// **BUG THIS CATCHES**: Would catch login skipping the session state check.
#[tokio::test]
async fn given_authenticated_client_when_login_again_then_already_authenticated() {
    // GIVEN: A logged-in client
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;

    // WHEN: Logging in again
    let result = client.login(TEST_ACCESS_TOKEN).await;

    // THEN: Refused locally, still authenticated
    assert!(matches!(
        result,
        Err(ClientError::Auth(AuthError::AlreadyAuthenticated { .. }))
    ));
    assert_eq!(backend.invocation_count(), 1);
    assert_eq!(client.session_state(), SessionState::Authenticated);
}

/// **VALUE**: Verifies a backend answering `authenticated: false` leaves the client logged out.
///
/// **BUG THIS CATCHES**: Would catch login treating any success envelope as authenticated.
#[tokio::test]
async fn given_backend_denying_login_when_login_then_login_rejected() {
    let backend = Arc::new(ScriptedBackend::new([
        r#"{"success":true,"data":{"authenticated":false}}"#,
    ]));
    let mut client = client(Arc::clone(&backend));

    let result = client.login(TEST_ACCESS_TOKEN).await;

    assert!(matches!(
        result,
        Err(ClientError::Auth(AuthError::LoginRejected { .. }))
    ));
    assert_eq!(client.session_state(), SessionState::Unauthenticated);
}

/// **VALUE**: Verifies logout is final: operations and new logins are refused afterwards.
///
/// **WHY THIS MATTERS**: A revoked session coming back to life on the next login would
/// make logout meaningless for long-lived processes.
///
/// **BUG THIS CATCHES**: Would catch logout resetting to Unauthenticated.
#[tokio::test]
async fn given_logged_out_client_when_operating_or_logging_in_then_refused() {
    // GIVEN: A client that logged in and out
    let backend = Arc::new(ScriptedBackend::new([LOGIN_OK]));
    let mut client = client(Arc::clone(&backend));
    client.login(TEST_ACCESS_TOKEN).await.unwrap();
    client.logout().unwrap();

    // WHEN: Listing and logging in again
    let listed = client.list_projects(org_a()).await;
    let relogin = client.login(TEST_ACCESS_TOKEN).await;

    // THEN: Both refused, only the first login reached the backend
    assert_eq!(client.session_state(), SessionState::Revoked);
    assert!(matches!(
        listed,
        Err(ClientError::Auth(AuthError::NotAuthenticated {
            state: SessionState::Revoked,
            ..
        }))
    ));
    assert!(matches!(
        relogin,
        Err(ClientError::Auth(AuthError::SessionTerminated { .. }))
    ));
    assert_eq!(backend.received().len(), 1);
}

/// **VALUE**: Verifies revocation on the backend expires the session at the next call.
///
/// **BUG THIS CATCHES**: Would catch an unauthorized answer being reported without
/// updating the session, or the client re-logging in by itself.
#[tokio::test]
async fn given_token_revoked_on_backend_when_listing_then_session_expires() {
    // GIVEN: A logged-in client whose token is revoked
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    backend.revoke(TEST_ACCESS_TOKEN);

    // WHEN: Listing projects
    let result = client.list_projects(org_a()).await;

    // THEN: Backend unauthorized, session expired, no second login attempt
    assert_eq!(
        result.unwrap_err().backend_code(),
        Some(sm_common::BackendErrorCode::Unauthorized)
    );
    assert_eq!(client.session_state(), SessionState::Expired);
    assert_eq!(backend.invocation_count(), 2);
}
