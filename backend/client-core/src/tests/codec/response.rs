use super::super::test_organization;

use crate::codec::{
    CommandKind, ResponseOutcome, ResponsePayload, decode_response, encode_error, encode_response,
};
use crate::error::CodecError;

use sm_common::BackendErrorCode;
use sm_models::{
    BatchDeleteResult, DeleteOutcome, GeneratedPassword, LoginOutcome, Project, ProjectId,
    SecretId, SecretIdentifier,
};

use std::time::{Duration, UNIX_EPOCH};

use serde_json::json;
use uuid::Uuid;

fn sample_project() -> Project {
    let created = UNIX_EPOCH + Duration::from_secs(1_704_067_200);
    Project {
        id: ProjectId::from_uuid(Uuid::from_u128(42)),
        organization_id: test_organization(),
        name: "infra".to_string(),
        creation_date: created,
        revision_date: created + Duration::from_millis(1500),
    }
}

fn success(kind: CommandKind, raw: &str) -> ResponsePayload {
    match decode_response(kind, raw) {
        Ok(ResponseOutcome::Success(payload)) => payload,
        other => panic!("Expected success, got {other:?}"),
    }
}

/// **VALUE**: Verifies a project answer written by a backend decodes into the typed record.
///
/// **WHY THIS MATTERS**: This is the shape real backends send: RFC 3339 timestamps and
/// snake_case fields inside `data`.
///
/// **BUG THIS CATCHES**: Would catch timestamp or field-name drift in the Project model.
#[test]
fn given_backend_project_json_when_decoded_then_typed_project() {
    // GIVEN: A success envelope as a backend would write it
    let raw = json!({
        "success": true,
        "data": {
            "id": "00000000-0000-0000-0000-00000000002a",
            "organization_id": test_organization().to_string(),
            "name": "infra",
            "creation_date": "2024-01-01T00:00:00Z",
            "revision_date": "2024-01-01T00:00:01.5Z"
        }
    })
    .to_string();

    // WHEN: Decoding it as the answer to project_get
    let payload = success(CommandKind::ProjectGet, &raw);

    // THEN: Every field lands in the Project
    assert_eq!(payload, ResponsePayload::Project(sample_project()));
}

/// **VALUE**: Verifies failure envelopes keep the backend's code and message verbatim.
///
/// **WHY THIS MATTERS**: Callers branch on the code (e.g. not_found vs permission_denied);
/// parsing it back out of the message would be guesswork.
///
/// **BUG THIS CATCHES**: Would catch the code being dropped or the message rewritten.
#[test]
fn given_failure_envelope_when_decoded_then_code_and_message_preserved() {
    // GIVEN: A failure with and without a code
    let with_code = encode_error(BackendErrorCode::NotFound, "Resource not found.").unwrap();
    let without_code = r#"{"success":false,"error_message":"boom"}"#;

    // WHEN: Decoding both
    let coded = decode_response(CommandKind::SecretGet, &with_code).unwrap();
    let uncoded = decode_response(CommandKind::SecretGet, without_code).unwrap();

    // THEN: The code survives; a missing code is Unknown
    assert_eq!(
        coded,
        ResponseOutcome::Failure {
            code: BackendErrorCode::NotFound,
            message: "Resource not found.".to_string()
        }
    );
    assert_eq!(
        uncoded,
        ResponseOutcome::Failure {
            code: BackendErrorCode::Unknown,
            message: "boom".to_string()
        }
    );
}

/// **VALUE**: Verifies envelopes breaking the exactly-one-of rule are rejected.
///
/// **WHY THIS MATTERS**: `success: true` without data, or with an error message, is a
/// contract violation. Guessing which half is right could hand callers a default value.
///
/// **BUG THIS CATCHES**: Would catch decode accepting contradictory envelopes.
#[test]
fn given_contradictory_envelopes_when_decoded_then_envelope_error() {
    let cases = [
        r#"{"success":true}"#,
        r#"{"success":true,"data":{"authenticated":true},"error_message":"x"}"#,
        r#"{"success":false}"#,
        r#"{"success":false,"data":{"authenticated":true},"error_message":"x"}"#,
        r#"{"success":true,"data":null}"#,
    ];

    for raw in cases {
        let result = decode_response(CommandKind::AccessTokenLogin, raw);
        assert!(
            matches!(result, Err(CodecError::Envelope { .. })),
            "{raw} should be an envelope error, got {result:?}"
        );
    }
}

/// **VALUE**: Verifies unparsable or unexpected JSON is a decode error, not a default value.
///
/// **BUG THIS CATCHES**: Would catch `#[serde(default)]` creeping onto required fields, or
/// extra envelope fields being ignored.
#[test]
fn given_wrong_shapes_when_decoded_then_decode_error() {
    let cases = [
        (CommandKind::AccessTokenLogin, "not json"),
        (
            CommandKind::AccessTokenLogin,
            r#"{"success":true,"data":{"authenticated":true},"extra":1}"#,
        ),
        (CommandKind::AccessTokenLogin, r#"{"success":true,"data":{}}"#),
        (CommandKind::ProjectGet, r#"{"success":true,"data":{"authenticated":true}}"#),
        (CommandKind::ProjectList, r#"{"success":true,"data":[]}"#),
    ];

    for (kind, raw) in cases {
        let result = decode_response(kind, raw);
        assert!(
            matches!(result, Err(CodecError::Decode { .. })),
            "{raw} as {kind} should be a decode error, got {result:?}"
        );
    }
}

/// **VALUE**: Verifies list answers travel wrapped in `{ "data": [...] }`.
///
/// **BUG THIS CATCHES**: Would catch encode and decode disagreeing on list wrapping.
#[test]
fn given_secret_identifiers_when_encoded_then_wrapped_and_decodable() {
    // GIVEN: Two identifiers
    let identifiers = vec![
        SecretIdentifier {
            id: SecretId::from_uuid(Uuid::from_u128(1)),
            organization_id: test_organization(),
            key: "A".to_string(),
        },
        SecretIdentifier {
            id: SecretId::from_uuid(Uuid::from_u128(2)),
            organization_id: test_organization(),
            key: "B".to_string(),
        },
    ];
    let payload = ResponsePayload::SecretIdentifiers(identifiers.clone());

    // WHEN: Encoding as a backend would
    let raw = encode_response(&payload).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    // THEN: The list sits under data.data and decodes back unchanged
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["data"]["data"][1]["key"], json!("B"));
    assert_eq!(success(CommandKind::SecretList, &raw), payload);
}

/// **VALUE**: Verifies a partially failed bulk delete keeps one outcome per id.
///
/// **WHY THIS MATTERS**: Collapsing to "failed" hides the deletions that did happen;
/// collapsing to "ok" hides the ones that did not.
///
/// **BUG THIS CATCHES**: Would catch the per-id error being dropped on either side.
#[test]
fn given_partial_delete_result_when_round_tripped_then_outcomes_preserved() {
    // GIVEN: Two deleted ids and one refused
    let kept = ProjectId::from_uuid(Uuid::from_u128(3));
    let result = BatchDeleteResult::new(vec![
        DeleteOutcome::succeeded(ProjectId::from_uuid(Uuid::from_u128(1))),
        DeleteOutcome::failed(kept, "Resource not found."),
        DeleteOutcome::succeeded(ProjectId::from_uuid(Uuid::from_u128(2))),
    ]);

    // WHEN: Encoding and decoding
    let raw = encode_response(&ResponsePayload::ProjectsDeleted(result.clone())).unwrap();
    let decoded = success(CommandKind::ProjectDelete, &raw);

    // THEN: Same three outcomes, same order
    assert_eq!(decoded, ResponsePayload::ProjectsDeleted(result));
    assert!(raw.contains(r#""error":"Resource not found.""#));
}

#[test]
fn given_payloads_when_matched_against_kinds_then_only_their_own_kinds_accepted() {
    let login = ResponsePayload::Login(LoginOutcome {
        authenticated: true,
    });
    let project = ResponsePayload::Project(sample_project());

    assert!(login.kind_matches(CommandKind::AccessTokenLogin));
    assert!(!login.kind_matches(CommandKind::ProjectGet));
    assert!(project.kind_matches(CommandKind::ProjectGet));
    assert!(project.kind_matches(CommandKind::ProjectCreate));
    assert!(project.kind_matches(CommandKind::ProjectUpdate));
    assert!(!project.kind_matches(CommandKind::ProjectList));
    assert!(!project.kind_matches(CommandKind::SecretGet));
}

/// **VALUE**: Verifies a generated password travels as a bare JSON string in `data`.
///
/// **WHY THIS MATTERS**: Every other payload is an object. A decoder that expects one here
/// rejects every generator answer as malformed.
///
/// **BUG THIS CATCHES**: Would catch the password being wrapped (`{"data": "..."}`) on one
/// side only.
#[test]
fn given_generated_password_when_decoded_then_bare_string_payload() {
    // GIVEN: A backend answer with a string payload, and one with an object payload
    let raw = r#"{"success":true,"data":"Xq7#kR2mWp"}"#;
    let wrapped = r#"{"success":true,"data":{"password":"Xq7#kR2mWp"}}"#;

    // WHEN: Decoding both as password_generate answers
    let decoded = success(CommandKind::PasswordGenerate, raw);
    let rejected = decode_response(CommandKind::PasswordGenerate, wrapped);

    // THEN: The string decodes, the object does not
    assert_eq!(
        decoded,
        ResponsePayload::GeneratedPassword(GeneratedPassword::new("Xq7#kR2mWp"))
    );
    assert!(decoded.kind_matches(CommandKind::PasswordGenerate));
    assert!(!decoded.kind_matches(CommandKind::SecretGet));
    assert!(matches!(rejected, Err(CodecError::Decode { .. })));
}
