use crate::helpers::{LOGIN_OK, ScriptedBackend, TEST_ACCESS_TOKEN, client, org_a};

use sm_client_core::auth::AccessToken;
use sm_client_core::codec::command::{
    AccessTokenLoginRequest, PasswordGenerateRequest, ProjectCreateRequest, ProjectGetRequest,
    ProjectUpdateRequest, ProjectsDeleteRequest, ProjectsListRequest, SecretCreateRequest,
    SecretGetRequest, SecretIdentifiersRequest, SecretUpdateRequest, SecretsDeleteRequest,
    SecretsGetRequest, SecretsSyncRequest,
};
use sm_client_core::codec::{
    Command, CommandKind, ResponseOutcome, ResponsePayload, decode_command, decode_response,
    encode_command, encode_response,
};
use sm_models::{
    BatchDeleteResult, DeleteOutcome, GeneratedPassword, LoginOutcome, PasswordPolicy, Project,
    ProjectDraft, ProjectId, Secret, SecretDraft, SecretId, SecretIdentifier, SecretsSync,
};

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use uuid::Uuid;

fn at(nanos: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_nanos(1_760_000_000_000_000_000 + nanos)
}

fn project_id() -> ProjectId {
    ProjectId::from_uuid(Uuid::from_u128(0x1001))
}

fn secret_id() -> SecretId {
    SecretId::from_uuid(Uuid::from_u128(0x2001))
}

fn draft() -> SecretDraft {
    SecretDraft::builder()
        .with_organization_id(org_a())
        .with_key("DB_URL")
        .with_value("postgres://db")
        .with_note("primary")
        .with_project_ids([project_id()])
        .build()
        .unwrap()
}

fn every_command() -> Vec<Command> {
    let token = AccessToken::parse(TEST_ACCESS_TOKEN).unwrap();
    let project_draft = ProjectDraft::new(org_a(), "infra").unwrap();
    let strict_policy = PasswordPolicy::builder()
        .with_length(32)
        .with_special(false)
        .with_min_number(4)
        .build()
        .unwrap();

    vec![
        Command::AccessTokenLogin(AccessTokenLoginRequest::new(&token)),
        Command::ProjectGet(ProjectGetRequest::new(project_id())),
        Command::ProjectCreate(ProjectCreateRequest::new(project_draft.clone())),
        Command::ProjectUpdate(ProjectUpdateRequest::new(project_id(), project_draft)),
        Command::ProjectDelete(ProjectsDeleteRequest::new(vec![project_id()]).unwrap()),
        Command::ProjectList(ProjectsListRequest::new(org_a()).unwrap()),
        Command::SecretGet(SecretGetRequest::new(secret_id())),
        Command::SecretGetByIds(SecretsGetRequest::new(vec![secret_id()]).unwrap()),
        Command::SecretCreate(SecretCreateRequest::new(draft())),
        Command::SecretUpdate(SecretUpdateRequest::new(secret_id(), draft())),
        Command::SecretDelete(SecretsDeleteRequest::new(vec![secret_id()]).unwrap()),
        Command::SecretList(SecretIdentifiersRequest::new(org_a()).unwrap()),
        Command::SecretSync(SecretsSyncRequest::new(org_a(), Some(at(123_456_789))).unwrap()),
        Command::SecretSync(SecretsSyncRequest::new(org_a(), None).unwrap()),
        Command::PasswordGenerate(PasswordGenerateRequest::new(&PasswordPolicy::default())),
        Command::PasswordGenerate(PasswordGenerateRequest::new(&strict_policy)),
    ]
}

fn sample_project() -> Project {
    Project {
        id: project_id(),
        organization_id: org_a(),
        name: "infra".to_string(),
        creation_date: at(1),
        revision_date: at(2),
    }
}

fn sample_secret() -> Secret {
    Secret {
        id: secret_id(),
        organization_id: org_a(),
        project_ids: vec![project_id()],
        key: "DB_URL".to_string(),
        value: "postgres://db".to_string(),
        note: "primary".to_string(),
        creation_date: at(3),
        revision_date: at(4),
    }
}

fn payload_for(kind: CommandKind) -> ResponsePayload {
    match kind {
        CommandKind::AccessTokenLogin => {
            ResponsePayload::Login(LoginOutcome { authenticated: true })
        }
        CommandKind::ProjectGet | CommandKind::ProjectCreate | CommandKind::ProjectUpdate => {
            ResponsePayload::Project(sample_project())
        }
        CommandKind::ProjectList => ResponsePayload::Projects(vec![sample_project()]),
        CommandKind::ProjectDelete => ResponsePayload::ProjectsDeleted(BatchDeleteResult::new(
            vec![DeleteOutcome::failed(project_id(), "Resource not found.")],
        )),
        CommandKind::SecretGet | CommandKind::SecretCreate | CommandKind::SecretUpdate => {
            ResponsePayload::Secret(sample_secret())
        }
        CommandKind::SecretGetByIds => ResponsePayload::Secrets(vec![sample_secret()]),
        CommandKind::SecretList => ResponsePayload::SecretIdentifiers(vec![SecretIdentifier {
            id: secret_id(),
            organization_id: org_a(),
            key: "DB_URL".to_string(),
        }]),
        CommandKind::SecretDelete => ResponsePayload::SecretsDeleted(BatchDeleteResult::new(vec![
            DeleteOutcome::succeeded(secret_id()),
        ])),
        CommandKind::SecretSync => ResponsePayload::SecretsSync(SecretsSync {
            has_changes: true,
            secrets: Some(vec![sample_secret()]),
        }),
        CommandKind::PasswordGenerate => {
            ResponsePayload::GeneratedPassword(GeneratedPassword::new("Xq7#kR2m"))
        }
    }
}

/// **VALUE**: Verifies every command decodes back to itself on the backend side.
///
/// **WHY THIS MATTERS**: Backends decode with the same codec. Any variant that does not
/// survive the trip is an operation the backend can never execute.
///
/// **BUG THIS CATCHES**: Would catch a field that serializes but is rejected by
/// deny_unknown_fields, or a timestamp losing precision.
#[test]
fn given_every_command_when_encoded_and_decoded_then_identical() {
    for command in every_command() {
        let encoded = encode_command(&command).unwrap();
        let decoded = decode_command(&encoded).unwrap();
        assert_eq!(decoded, command, "round trip of {}", command.kind());
    }
}

/// **VALUE**: Verifies every success payload decodes back to itself for its command kind.
///
/// **BUG THIS CATCHES**: Would catch a list payload encoded without its `data` wrapper, or
/// a kind mapped to the wrong payload shape.
#[test]
fn given_every_payload_when_encoded_and_decoded_then_identical() {
    for command in every_command() {
        let kind = command.kind();
        let payload = payload_for(kind);

        let encoded = encode_response(&payload).unwrap();
        let decoded = decode_response(kind, &encoded).unwrap();

        assert!(payload.kind_matches(kind), "{kind}");
        assert_eq!(decoded, ResponseOutcome::Success(payload), "round trip of {kind}");
    }
}

/// **VALUE**: Verifies the envelope the backend receives is exactly what the codec encodes.
///
/// **BUG THIS CATCHES**: Would catch the dispatcher rewriting or re-wrapping the command
/// between codec and backend.
#[tokio::test]
async fn given_create_secret_when_dispatched_then_backend_receives_codec_output() {
    // GIVEN: A scripted backend that accepts the login and the create
    let created = encode_response(&payload_for(CommandKind::SecretCreate)).unwrap();
    let backend = Arc::new(ScriptedBackend::new([LOGIN_OK.to_string(), created]));
    let mut client = client(Arc::clone(&backend));
    client.login(TEST_ACCESS_TOKEN).await.unwrap();

    // WHEN: Creating the secret through the facade
    let secret = client.secrets().create(draft()).await.unwrap();

    // THEN: The received envelope decodes to the same command the codec would build
    assert_eq!(secret, sample_secret());
    let received = backend.received();
    assert_eq!(
        decode_command(&received[1]).unwrap(),
        Command::SecretCreate(SecretCreateRequest::new(draft()))
    );
}
