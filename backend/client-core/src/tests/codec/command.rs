use super::super::{TEST_ACCESS_TOKEN, test_organization};

use crate::auth::AccessToken;
use crate::codec::command::{
    AccessTokenLoginRequest, ProjectGetRequest, ProjectsDeleteRequest, ProjectsListRequest,
    SecretCreateRequest, SecretIdentifiersRequest, SecretsGetRequest, SecretsSyncRequest,
};
use crate::codec::{Command, CommandKind, decode_command, encode_command};

use sm_models::{ModelError, OrganizationId, ProjectId, SecretDraft};

use std::time::{Duration, UNIX_EPOCH};

use serde_json::{Value, json};
use uuid::Uuid;

fn encoded_json(command: &Command) -> Value {
    serde_json::from_str(&encode_command(command).unwrap()).unwrap()
}

/// **VALUE**: Verifies commands use externally tagged snake_case envelopes.
///
/// **WHY THIS MATTERS**: The tag is the only thing telling the backend which operation
/// to run. A renamed tag is an unknown command on the other side.
///
/// **BUG THIS CATCHES**: Would catch a missing `rename_all` or an internally tagged enum.
#[test]
fn given_project_get_when_encoded_then_single_snake_case_tag() {
    // GIVEN: A project_get command
    let id = ProjectId::from_uuid(Uuid::from_u128(7));
    let command = Command::ProjectGet(ProjectGetRequest::new(id));

    // WHEN: Encoding it
    let value = encoded_json(&command);

    // THEN: Exactly one tag, carrying only the id
    assert_eq!(value, json!({ "project_get": { "id": id.to_string() } }));
}

/// **VALUE**: Verifies the login envelope carries the raw token while Debug stays redacted.
///
/// **WHY THIS MATTERS**: The codec is the one place allowed to read the token. Everything
/// else (logs, panics, error chains) only ever sees Debug output.
///
/// **BUG THIS CATCHES**: Would catch the token being serialized through RedactedAccessToken's
/// own Serialize impl (which fails) or a derived Debug leaking it.
#[test]
fn given_login_command_when_encoded_then_token_sent_but_never_debug_printed() {
    // GIVEN: A login command
    let token = AccessToken::parse(TEST_ACCESS_TOKEN).unwrap();
    let command = Command::AccessTokenLogin(AccessTokenLoginRequest::new(&token));

    // WHEN: Encoding and debug-formatting it
    let value = encoded_json(&command);
    let debug = format!("{command:?}");

    // THEN: Envelope has the token, Debug does not
    assert_eq!(
        value,
        json!({ "access_token_login": { "access_token": TEST_ACCESS_TOKEN } })
    );
    assert!(!debug.contains("C2IgxjjLF7qSshsbwe8JGcbM075YXw"));
}

/// **VALUE**: Verifies a secret create envelope carries all fields and redacts the value in Debug.
///
/// **BUG THIS CATCHES**: Would catch a missing note (must be sent as "") or project_ids field.
#[test]
fn given_secret_create_when_encoded_then_all_fields_present() {
    // GIVEN: A draft without note or projects
    let draft = SecretDraft::builder()
        .with_organization_id(test_organization())
        .with_key("DB_PASSWORD")
        .with_value("hunter2")
        .build()
        .unwrap();
    let command = Command::SecretCreate(SecretCreateRequest::new(draft));

    // WHEN: Encoding it
    let value = encoded_json(&command);

    // THEN: Note defaults to empty, project_ids to an empty list
    assert_eq!(
        value,
        json!({
            "secret_create": {
                "organization_id": test_organization().to_string(),
                "key": "DB_PASSWORD",
                "value": "hunter2",
                "note": "",
                "project_ids": []
            }
        })
    );
    assert!(!format!("{command:?}").contains("hunter2"));
}

/// **VALUE**: Verifies the decode side (used by backends) rejects unknown tags and fields.
///
/// **WHY THIS MATTERS**: A partially understood command must fail loudly instead of
/// running with defaults.
///
/// **BUG THIS CATCHES**: Would catch a missing `deny_unknown_fields` on request structs.
#[test]
fn given_unknown_tag_or_field_when_decoded_then_error() {
    // GIVEN: An unknown tag and an unknown field
    let unknown_tag = r#"{"project_purge":{"id":"00000000-0000-0000-0000-000000000007"}}"#;
    let unknown_field =
        r#"{"project_get":{"id":"00000000-0000-0000-0000-000000000007","force":true}}"#;
    let two_tags = r#"{"project_get":{"id":"00000000-0000-0000-0000-000000000007"},"secret_get":{"id":"00000000-0000-0000-0000-000000000007"}}"#;

    // WHEN/THEN: Each one fails to decode
    assert!(decode_command(unknown_tag).is_err());
    assert!(decode_command(unknown_field).is_err());
    assert!(decode_command(two_tags).is_err());
}

/// **VALUE**: Verifies the backend sees exactly the command the client built.
///
/// **BUG THIS CATCHES**: Would catch asymmetric serde attributes (e.g. a renamed field on
/// only one side) for the sync command's optional timestamp.
#[test]
fn given_sync_command_when_encoded_and_decoded_then_identical() {
    // GIVEN: Sync commands with and without a last-synced date
    let since = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let with_date =
        Command::SecretSync(SecretsSyncRequest::new(test_organization(), Some(since)).unwrap());
    let without_date =
        Command::SecretSync(SecretsSyncRequest::new(test_organization(), None).unwrap());

    // WHEN: Round-tripping them
    let decoded_with = decode_command(&encode_command(&with_date).unwrap()).unwrap();
    let decoded_without = decode_command(&encode_command(&without_date).unwrap()).unwrap();

    // THEN: Identical, and the absent date is omitted from the envelope
    assert_eq!(decoded_with, with_date);
    assert_eq!(decoded_without, without_date);
    assert_eq!(
        encoded_json(&without_date),
        json!({ "secret_sync": { "organization_id": test_organization().to_string() } })
    );
}

#[test]
fn given_pre_epoch_mark_when_sync_request_built_then_validation_error() {
    let before_epoch = UNIX_EPOCH - Duration::from_millis(1);

    let err = SecretsSyncRequest::new(test_organization(), Some(before_epoch)).unwrap_err();

    assert_eq!(err.field(), "last_synced_date");
}

/// **VALUE**: Verifies listing cannot be built without a real organization.
///
/// **WHY THIS MATTERS**: A nil organization id would be an "unscoped" list in disguise.
///
/// **BUG THIS CATCHES**: Would catch list requests skipping organization validation.
#[test]
fn given_nil_organization_when_list_request_built_then_validation_error() {
    let nil = OrganizationId::from_uuid(Uuid::nil());

    let projects = ProjectsListRequest::new(nil);
    let secrets = SecretIdentifiersRequest::new(nil);

    assert!(matches!(
        projects,
        Err(ModelError::Validation {
            field: "organization_id",
            ..
        })
    ));
    assert!(secrets.is_err());
}

/// **VALUE**: Verifies empty batches are refused before a command exists.
///
/// **BUG THIS CATCHES**: Would catch an empty delete reaching the backend and reporting
/// "success" for nothing.
#[test]
fn given_empty_batch_when_request_built_then_validation_error() {
    let deleted = ProjectsDeleteRequest::new(Vec::new());
    let fetched = SecretsGetRequest::new(Vec::new());

    let err = deleted.unwrap_err();
    assert_eq!(err.field(), "ids");
    assert!(err.to_string().contains("at least one identifier"));
    assert!(fetched.is_err());
}

/// **VALUE**: Verifies only login and generation run without a session and only reads are
/// marked read-only.
///
/// **WHY THIS MATTERS**: `requires_session` drives auth gating; `is_read_only` decides what
/// may ever be retried. A write marked read-only could be applied twice.
///
/// **BUG THIS CATCHES**: Would catch a new command kind added with the wrong flags.
#[test]
fn given_command_kinds_when_classified_then_flags_match_semantics() {
    let all = [
        CommandKind::AccessTokenLogin,
        CommandKind::ProjectGet,
        CommandKind::ProjectCreate,
        CommandKind::ProjectUpdate,
        CommandKind::ProjectDelete,
        CommandKind::ProjectList,
        CommandKind::SecretGet,
        CommandKind::SecretGetByIds,
        CommandKind::SecretCreate,
        CommandKind::SecretUpdate,
        CommandKind::SecretDelete,
        CommandKind::SecretList,
        CommandKind::SecretSync,
        CommandKind::PasswordGenerate,
    ];

    let sessionless = [CommandKind::AccessTokenLogin, CommandKind::PasswordGenerate];
    for kind in all {
        assert_eq!(
            kind.requires_session(),
            !sessionless.contains(&kind),
            "{kind}"
        );
    }

    let writes = [
        CommandKind::AccessTokenLogin,
        CommandKind::ProjectCreate,
        CommandKind::ProjectUpdate,
        CommandKind::ProjectDelete,
        CommandKind::SecretCreate,
        CommandKind::SecretUpdate,
        CommandKind::SecretDelete,
    ];
    for kind in all {
        assert_eq!(kind.is_read_only(), !writes.contains(&kind), "{kind}");
    }
}
