use crate::helpers::{ScriptedBackend, client, logged_in_client, memory_backend};

use sm_client_core::session::SessionState;
use sm_models::PasswordPolicy;

use std::sync::Arc;

use serde_json::{Value, json};

/// **VALUE**: Verifies a password can be generated before login and leaves the session alone.
///
/// **WHY THIS MATTERS**: Provisioning scripts generate credentials before they have any
/// access token to log in with.
///
/// **BUG THIS CATCHES**: Would catch the generator being gated like a resource operation, or
/// its answer being taken for a login.
#[tokio::test]
async fn given_unauthenticated_client_when_password_generated_then_returned() {
    // GIVEN: A client that never logged in
    let backend = memory_backend();
    let mut client = client(Arc::clone(&backend));

    // WHEN: Generating with the default policy
    let password = client
        .generate_password(&PasswordPolicy::default())
        .await
        .unwrap();

    // THEN: 24 characters, one invoke, still unauthenticated
    assert_eq!(password.len(), 24);
    assert_eq!(backend.invocation_count(), 1);
    assert_eq!(client.session_state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn given_logged_in_client_when_generated_through_sub_client_then_policy_honored() {
    let backend = memory_backend();
    let mut client = logged_in_client(&backend).await;
    let policy = PasswordPolicy::builder()
        .with_length(16)
        .with_uppercase(false)
        .with_special(false)
        .with_min_number(6)
        .build()
        .unwrap();

    let password = client.generators().password(&policy).await.unwrap();

    assert_eq!(password.len(), 16);
    assert!(password.as_str().chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    assert!(password.as_str().chars().filter(char::is_ascii_digit).count() >= 6);
}

/// **VALUE**: Verifies the policy goes out on the wire under its own tag with every option.
///
/// **BUG THIS CATCHES**: Would catch a dropped minimum, or unset minimums sent as `null`.
#[tokio::test]
async fn given_policy_when_generated_then_backend_receives_password_generate_envelope() {
    // GIVEN: A scripted backend and a policy with one minimum
    let backend = Arc::new(ScriptedBackend::new([r#"{"success":true,"data":"abcd2345"}"#]));
    let mut client = client(Arc::clone(&backend));
    let policy = PasswordPolicy::builder()
        .with_length(8)
        .with_special(false)
        .with_min_number(4)
        .build()
        .unwrap();

    // WHEN: Generating
    let password = client.generate_password(&policy).await.unwrap();

    // THEN: The scripted password, and the full policy on the wire
    assert_eq!(password.as_str(), "abcd2345");
    let received: Value = serde_json::from_str(&backend.received()[0]).unwrap();
    assert_eq!(
        received,
        json!({
            "password_generate": {
                "length": 8,
                "avoid_ambiguous": true,
                "lowercase": true,
                "uppercase": true,
                "numbers": true,
                "special": false,
                "min_number": 4
            }
        })
    );
}

#[tokio::test]
async fn given_unauthorized_answer_when_generated_then_session_not_expired() {
    let backend = Arc::new(ScriptedBackend::new([
        r#"{"success":false,"error_message":"nope","error_code":"unauthorized"}"#,
    ]));
    let mut client = client(Arc::clone(&backend));

    let error = client
        .generate_password(&PasswordPolicy::default())
        .await
        .unwrap_err();

    assert_eq!(error.error_category(), "backend");
    assert_eq!(client.session_state(), SessionState::Unauthenticated);
}
