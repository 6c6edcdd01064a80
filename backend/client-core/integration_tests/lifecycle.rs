use crate::helpers::{TEST_ACCESS_TOKEN, client, logged_in_client, memory_backend, org_a};

use sm_client_core::SecretsManagerClient;
use sm_client_core::backend::MemoryBackend;
use sm_client_core::config::{ClientConfig, ClientSettings};
use sm_client_core::error::{ClientError, ConfigError, ConstructionError};
use sm_client_core::session::SessionState;
use sm_models::{PasswordPolicy, ProjectId, SecretId};

use std::sync::Arc;

/// **VALUE**: Verifies every public operation on a closed client fails with ClosedError
/// and never touches the backend.
///
/// **WHY THIS MATTERS**: After close the backend handle is gone. Any call that reached the
/// backend anyway would be a use-after-release.
///
/// **BUG THIS CATCHES**: Would catch any entry point missing the closed check, or checking
/// input validity (or auth) before it.
#[tokio::test]
async fn given_closed_client_when_any_operation_called_then_closed_error_without_invoke() {
    // GIVEN: A logged-in client that is then closed
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    client.close();
    let invocations = backend.invocation_count();

    // WHEN: Calling every operation (some with invalid input on purpose)
    let results: Vec<Result<(), ClientError>> = vec![
        client.login(TEST_ACCESS_TOKEN).await,
        client.login("garbage").await,
        client.logout(),
        client.get_project(ProjectId::new_random()).await.map(drop),
        client.create_project(org_a(), "infra").await.map(drop),
        client.create_project(org_a(), "").await.map(drop),
        client.update_project(ProjectId::new_random(), org_a(), "x").await.map(drop),
        client.list_projects(org_a()).await.map(drop),
        client.delete_projects(vec![]).await.map(drop),
        client.get_secret(SecretId::new_random()).await.map(drop),
        client.get_secrets_by_ids(vec![SecretId::new_random()]).await.map(drop),
        client.create_secret(org_a(), "", "", None, &[]).await.map(drop),
        client.update_secret(SecretId::new_random(), org_a(), "K", "V", None, &[]).await.map(drop),
        client.list_secrets(org_a()).await.map(drop),
        client.delete_secrets(vec![SecretId::new_random()]).await.map(drop),
        client.sync_secrets(org_a(), None).await.map(drop),
        client.generate_password(&PasswordPolicy::default()).await.map(drop),
    ];

    // THEN: ClosedError everywhere, no invoke, one release
    for (index, result) in results.into_iter().enumerate() {
        let err = result.expect_err("closed client must refuse");
        assert!(err.is_closed(), "operation #{index} returned {err}");
    }
    assert_eq!(backend.invocation_count(), invocations);
    assert_eq!(backend.released_handles(), 1);
    assert!(client.is_closed());
    assert!(client.backend().is_none());
}

/// **VALUE**: Verifies close is idempotent and drop after close does not release again.
///
/// **WHY THIS MATTERS**: Releasing a handle twice hands the backend a handle it may have
/// reissued to someone else.
///
/// **BUG THIS CATCHES**: Would catch Drop releasing unconditionally.
#[tokio::test]
async fn given_client_when_closed_twice_and_dropped_then_released_once() {
    // GIVEN: An open client
    let backend = memory_backend();
    let mut client = client(Arc::clone(&backend));

    // WHEN: Closing twice and dropping
    client.close();
    client.close();
    drop(client);

    // THEN: Exactly one release
    assert_eq!(backend.released_handles(), 1);
    assert_eq!(backend.live_handles(), 0);
}

/// **VALUE**: Verifies dropping an open client releases its handle.
///
/// **BUG THIS CATCHES**: Would catch a handle leaked when the caller never calls close.
#[tokio::test]
async fn given_open_client_when_dropped_then_handle_released() {
    let backend = memory_backend();

    {
        let _client = logged_in_client(&backend).await;
        assert_eq!(backend.live_handles(), 1);
    }

    assert_eq!(backend.released_handles(), 1);
    assert_eq!(backend.live_handles(), 0);
}

/// **VALUE**: Verifies a failed init yields ConstructionError and releases nothing.
///
/// **WHY THIS MATTERS**: There is no handle after a failed init; the client never exists.
///
/// **BUG THIS CATCHES**: Would catch a half-built client calling release on drop.
#[test]
fn given_refusing_backend_when_client_constructed_then_construction_error() {
    // GIVEN: A backend whose init fails
    let backend = Arc::new(MemoryBackend::refusing_init("bad settings"));

    // WHEN: Constructing a client
    let result = SecretsManagerClient::new(Arc::clone(&backend), &ClientConfig::default());

    // THEN: ConstructionError carrying the backend message, nothing released
    match result {
        Err(ClientError::Construction(ConstructionError::BackendInit { message, .. })) => {
            assert_eq!(message, "bad settings");
        }
        Err(other) => panic!("Expected BackendInit, got {other}"),
        Ok(_) => panic!("Expected construction to fail"),
    }
    assert_eq!(backend.released_handles(), 0);
}

/// **VALUE**: Verifies an invalid config is rejected before the backend is initialized.
///
/// **BUG THIS CATCHES**: Would catch invalid URLs being handed to init.
#[test]
fn given_invalid_config_when_client_constructed_then_config_error_and_no_init() {
    let backend = memory_backend();
    let config = ClientConfig {
        settings: ClientSettings {
            identity_url: "nope".to_string(),
            ..ClientSettings::default()
        },
        ..ClientConfig::default()
    };

    let result = SecretsManagerClient::new(Arc::clone(&backend), &config);

    assert!(matches!(
        result,
        Err(ClientError::Config(ConfigError::ValidationError { .. }))
    ));
    assert_eq!(backend.init_count(), 0);
}

/// **VALUE**: Verifies the settings reach the backend unchanged (server base applied).
#[test]
fn given_self_hosted_config_when_client_constructed_then_backend_receives_derived_urls() {
    let backend = memory_backend();
    let config = ClientConfig {
        server_base: Some("https://vault.example.com".to_string()),
        ..ClientConfig::default()
    };

    let client = SecretsManagerClient::new(Arc::clone(&backend), &config).unwrap();

    let received = backend.settings_received().unwrap();
    assert_eq!(received.api_url, "https://vault.example.com/api");
    assert_eq!(received.identity_url, "https://vault.example.com/identity");
    assert_eq!(client.session_state(), SessionState::Unauthenticated);
    assert!(!client.is_closed());
}
