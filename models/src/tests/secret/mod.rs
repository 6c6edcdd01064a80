mod builder;

use crate::{OrganizationId, Secret, SecretId};

use std::time::{Duration, SystemTime};

#[test]
fn given_secret_when_debug_formatted_then_value_is_redacted() {
    let secret = Secret {
        id: SecretId::new_random(),
        organization_id: OrganizationId::new_random(),
        project_ids: Vec::new(),
        key: String::from("DB_PASSWORD"),
        value: String::from("hunter2-very-secret"),
        note: String::new(),
        creation_date: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        revision_date: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
    };

    let debug = format!("{secret:?}");

    assert!(debug.contains("DB_PASSWORD"));
    assert!(!debug.contains("hunter2-very-secret"));
}

/// **VALUE**: Verifies that a secret without `project_ids` decodes to an empty association.
///
/// **WHY THIS MATTERS**: Secrets may belong to zero projects. A strict decode that required
/// the field would turn every unassigned secret into a Malformed response.
///
/// **BUG THIS CATCHES**: Would catch removal of `#[serde(default)]` on `project_ids`.
#[test]
fn given_secret_json_without_project_ids_when_decoded_then_association_is_empty() {
    // GIVEN: A secret payload with no project_ids field
    let json = r#"{
        "id": "1f0c3e52-7b7b-4a35-9a4e-3d1c1d0d3a01",
        "organization_id": "5d3a52c3-1b61-4a0f-8c5b-0d0bd7a1b3c4",
        "key": "API_KEY",
        "value": "abc",
        "note": "",
        "creation_date": "2024-03-01T10:00:00Z",
        "revision_date": "2024-03-01T10:00:00Z"
    }"#;

    // WHEN: Decoding
    let secret: Secret = serde_json::from_str(json).unwrap();

    // THEN: No project association
    assert!(secret.project_ids.is_empty());
    assert_eq!(secret.key, "API_KEY");
}
