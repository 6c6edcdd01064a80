use super::{TEST_ACCESS_TOKEN, test_organization};

use crate::auth::AccessToken;
use crate::backend::{Backend, MemoryBackend};
use crate::codec::command::{
    AccessTokenLoginRequest, PasswordGenerateRequest, ProjectsListRequest,
};
use crate::codec::{
    Command, CommandKind, ResponseOutcome, ResponsePayload, decode_response, encode_command,
    encode_settings,
};
use crate::config::ClientSettings;

use sm_common::BackendErrorCode;
use sm_models::PasswordPolicy;

async fn run(
    backend: &MemoryBackend,
    handle: &<MemoryBackend as Backend>::Handle,
    command: Command,
) -> ResponseOutcome {
    let kind = command.kind();
    let raw = backend.invoke(handle, &encode_command(&command).unwrap()).await;
    decode_response(kind, &raw).unwrap()
}

fn login_command() -> Command {
    Command::AccessTokenLogin(AccessTokenLoginRequest::new(
        &AccessToken::parse(TEST_ACCESS_TOKEN).unwrap(),
    ))
}

fn list_command() -> Command {
    Command::ProjectList(ProjectsListRequest::new(test_organization()).unwrap())
}

/// **VALUE**: Verifies init decodes the settings envelope and keeps what it received.
///
/// **BUG THIS CATCHES**: Would catch settings being altered on their way to the backend.
#[test]
fn given_settings_envelope_when_init_then_settings_received_unchanged() {
    let backend = MemoryBackend::new();
    let settings = ClientSettings::from_server_base("https://vault.example.com");

    backend.init(&encode_settings(&settings).unwrap()).unwrap();

    assert_eq!(backend.settings_received(), Some(settings));
    assert_eq!(backend.init_count(), 1);
}

#[test]
fn given_garbage_settings_when_init_then_refused() {
    let backend = MemoryBackend::new();

    let result = backend.init("{}");

    assert!(result.is_err());
    assert_eq!(backend.live_handles(), 0);
}

/// **VALUE**: Verifies the backend refuses work on a handle that never logged in.
///
/// **WHY THIS MATTERS**: The client gates commands itself, but the backend must not rely
/// on that. This is the second line of defense.
///
/// **BUG THIS CATCHES**: Would catch the backend serving data to anonymous handles.
#[tokio::test]
async fn given_handle_without_login_when_command_invoked_then_unauthorized() {
    let backend = MemoryBackend::new().with_access_token(TEST_ACCESS_TOKEN, [test_organization()]);
    let handle = backend.init(&encode_settings(&ClientSettings::default()).unwrap()).unwrap();

    let outcome = run(&backend, &handle, list_command()).await;

    assert!(matches!(
        outcome,
        ResponseOutcome::Failure {
            code: BackendErrorCode::Unauthorized,
            ..
        }
    ));
}

/// **VALUE**: Verifies unknown tokens cannot log in and known ones can.
///
/// **BUG THIS CATCHES**: Would catch login accepting any well-formed token.
#[tokio::test]
async fn given_registered_and_unknown_tokens_when_login_then_only_registered_accepted() {
    // GIVEN: One backend with the token registered, one without
    let settings = encode_settings(&ClientSettings::default()).unwrap();
    let known = MemoryBackend::new().with_access_token(TEST_ACCESS_TOKEN, [test_organization()]);
    let unknown = MemoryBackend::new();
    let known_handle = known.init(&settings).unwrap();
    let unknown_handle = unknown.init(&settings).unwrap();

    // WHEN: Logging in on both
    let accepted = run(&known, &known_handle, login_command()).await;
    let refused = run(&unknown, &unknown_handle, login_command()).await;

    // THEN: Only the registered token authenticates
    assert!(matches!(accepted, ResponseOutcome::Success(_)));
    assert!(matches!(
        refused,
        ResponseOutcome::Failure {
            code: BackendErrorCode::Unauthorized,
            ..
        }
    ));
    assert_eq!(known.invocation_count(), 1);
}

/// **VALUE**: Verifies revocation cuts off a logged-in handle.
///
/// **BUG THIS CATCHES**: Would catch grants being checked only at login time.
#[tokio::test]
async fn given_logged_in_handle_when_token_revoked_then_unauthorized() {
    let backend = MemoryBackend::new().with_access_token(TEST_ACCESS_TOKEN, [test_organization()]);
    let handle = backend.init(&encode_settings(&ClientSettings::default()).unwrap()).unwrap();
    run(&backend, &handle, login_command()).await;
    assert!(matches!(run(&backend, &handle, list_command()).await, ResponseOutcome::Success(_)));

    backend.revoke(TEST_ACCESS_TOKEN);
    let outcome = run(&backend, &handle, list_command()).await;

    match outcome {
        ResponseOutcome::Failure { code, message } => {
            assert_eq!(code, BackendErrorCode::Unauthorized);
            assert!(message.contains("revoked"));
        }
        other => panic!("Expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn given_released_handle_when_invoked_then_internal_error() {
    let backend = MemoryBackend::new();
    let handle = backend.init(&encode_settings(&ClientSettings::default()).unwrap()).unwrap();
    backend.release(handle);

    let raw = backend.invoke(&handle, &encode_command(&list_command()).unwrap()).await;
    let outcome = decode_response(CommandKind::ProjectList, &raw).unwrap();

    assert!(matches!(
        outcome,
        ResponseOutcome::Failure {
            code: BackendErrorCode::Internal,
            ..
        }
    ));
    assert_eq!(backend.released_handles(), 1);
}

/// **VALUE**: Verifies a handle that never logged in can still generate a password.
///
/// **WHY THIS MATTERS**: Generation touches no organization data. Requiring a login would
/// make it unusable for provisioning the very token a consumer logs in with.
///
/// **BUG THIS CATCHES**: Would catch the generator branch sitting behind the session check.
#[tokio::test]
async fn given_handle_without_login_when_password_generated_then_answered() {
    // GIVEN: A fresh handle, no login
    let backend = MemoryBackend::new();
    let handle = backend.init(&encode_settings(&ClientSettings::default()).unwrap()).unwrap();
    let policy = PasswordPolicy::builder().with_length(40).build().unwrap();

    // WHEN: Asking for a password
    let command = Command::PasswordGenerate(PasswordGenerateRequest::new(&policy));
    let outcome = run(&backend, &handle, command).await;

    // THEN: A password of the requested length
    match outcome {
        ResponseOutcome::Success(ResponsePayload::GeneratedPassword(password)) => {
            assert_eq!(password.len(), 40);
        }
        other => panic!("expected a generated password, got {other:?}"),
    }
}

#[tokio::test]
async fn given_invalid_policy_on_wire_when_generated_then_invalid_request() {
    let backend = MemoryBackend::new();
    let handle = backend.init(&encode_settings(&ClientSettings::default()).unwrap()).unwrap();
    let envelope = r#"{"password_generate":{"length":2,"avoid_ambiguous":true,"lowercase":true,"uppercase":true,"numbers":true,"special":true}}"#;

    let raw = backend.invoke(&handle, envelope).await;
    let outcome = decode_response(CommandKind::PasswordGenerate, &raw).unwrap();

    assert!(matches!(
        outcome,
        ResponseOutcome::Failure {
            code: BackendErrorCode::InvalidRequest,
            ..
        }
    ));
}
