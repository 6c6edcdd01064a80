use crate::{ModelError, OrganizationId, ProjectId, SecretDraft};

fn org() -> OrganizationId {
    OrganizationId::new_random()
}

fn assert_validation(
    result: Result<SecretDraft, ModelError>,
    expected_field: &str,
    expected: &str,
) {
    match result {
        Err(ModelError::Validation { field, message, .. }) => {
            assert_eq!(field, expected_field);
            assert_eq!(message, expected);
        }
        Ok(draft) => panic!("expected validation error, got {draft:?}"),
    }
}

/// **VALUE**: Verifies that a fully specified draft builds with trimmed key and note.
///
/// **WHY THIS MATTERS**: The backend stores the key as sent. Leading/trailing whitespace
/// in a key produces secrets that look identical in listings but never match lookups.
///
/// **BUG THIS CATCHES**: Would catch if trimming is dropped from the key/note path or
/// accidentally applied to the value.
#[test]
fn given_all_fields_when_building_then_trims_key_and_note_but_not_value() {
    // GIVEN: Builder with padded fields
    let organization_id = org();
    let project = ProjectId::new_random();
    let builder = SecretDraft::builder()
        .with_organization_id(organization_id)
        .with_key("  DB_PASSWORD ")
        .with_value("  spaced value  ")
        .with_note(" primary db ")
        .with_project_ids([project]);

    // WHEN: Building
    let draft = builder.build().unwrap();

    // THEN: Key and note trimmed, value verbatim
    assert_eq!(draft.organization_id(), organization_id);
    assert_eq!(draft.key(), "DB_PASSWORD");
    assert_eq!(draft.value(), "  spaced value  ");
    assert_eq!(draft.note(), "primary db");
    assert_eq!(draft.project_ids(), &[project]);
}

#[test]
fn given_missing_note_when_building_then_note_is_empty_string() {
    let draft = SecretDraft::builder()
        .with_organization_id(org())
        .with_key("KEY")
        .with_value("value")
        .build()
        .unwrap();

    assert_eq!(draft.note(), "");
    assert!(draft.project_ids().is_empty());
}

#[test]
fn given_empty_key_when_building_then_returns_validation_error() {
    let result = SecretDraft::builder()
        .with_organization_id(org())
        .with_key("")
        .with_value("value")
        .build();

    assert_validation(result, "key", "key must not be empty");
}

#[test]
fn given_whitespace_key_when_building_then_returns_validation_error() {
    for key in [" ", "\t", "\n", " \t\n"] {
        let result = SecretDraft::builder()
            .with_organization_id(org())
            .with_key(key)
            .with_value("value")
            .build();

        assert_validation(result, "key", "key must not contain only whitespaces");
    }
}

#[test]
fn given_501_char_key_when_building_then_returns_validation_error() {
    let result = SecretDraft::builder()
        .with_organization_id(org())
        .with_key("a".repeat(501))
        .with_value("value")
        .build();

    assert_validation(result, "key", "key must not exceed 500 characters in length");
}

#[test]
fn given_oversized_value_when_building_then_returns_validation_error() {
    let result = SecretDraft::builder()
        .with_organization_id(org())
        .with_key("KEY")
        .with_value("a".repeat(25_001))
        .build();

    assert_validation(result, "value", "value must not exceed 25000 characters in length");
}

#[test]
fn given_empty_value_when_building_then_returns_validation_error() {
    let result = SecretDraft::builder()
        .with_organization_id(org())
        .with_key("KEY")
        .with_value("")
        .build();

    assert_validation(result, "value", "value must not be empty");
}

#[test]
fn given_whitespace_note_when_building_then_returns_validation_error() {
    let result = SecretDraft::builder()
        .with_organization_id(org())
        .with_key("KEY")
        .with_value("value")
        .with_note(" \t")
        .build();

    assert_validation(result, "note", "note must not contain only whitespaces");
}

#[test]
fn given_7001_char_note_when_building_then_returns_validation_error() {
    let result = SecretDraft::builder()
        .with_organization_id(org())
        .with_key("KEY")
        .with_value("value")
        .with_note("a".repeat(7_001))
        .build();

    assert_validation(result, "note", "note must not exceed 7000 characters in length");
}

/// **VALUE**: Verifies that a missing or nil organization is rejected at construction.
///
/// **WHY THIS MATTERS**: The organization is the tenant boundary. A secret request
/// without one must never reach the dispatcher.
///
/// **BUG THIS CATCHES**: Would catch if the organization requirement is made optional or
/// the nil-UUID check is removed.
#[test]
fn given_missing_or_nil_organization_when_building_then_returns_validation_error() {
    // GIVEN/WHEN: No organization
    let missing = SecretDraft::builder().with_key("KEY").with_value("value").build();

    // THEN: Required error
    assert_validation(missing, "organization_id", "organization_id is required");

    // GIVEN/WHEN: Nil organization
    let nil = SecretDraft::builder()
        .with_organization_id(OrganizationId::from_uuid(uuid::Uuid::nil()))
        .with_key("KEY")
        .with_value("value")
        .build();

    // THEN: Nil rejected
    assert_validation(nil, "organization_id", "organization_id must not be the nil UUID");
}

#[test]
fn given_duplicate_project_ids_when_building_then_keeps_first_occurrence_order() {
    let first = ProjectId::new_random();
    let second = ProjectId::new_random();

    let draft = SecretDraft::builder()
        .with_organization_id(org())
        .with_key("KEY")
        .with_value("value")
        .with_project_ids([first, second, first])
        .build()
        .unwrap();

    assert_eq!(draft.project_ids(), &[first, second]);
}

#[test]
fn given_draft_when_debug_formatted_then_value_is_redacted() {
    let draft = SecretDraft::builder()
        .with_organization_id(org())
        .with_key("KEY")
        .with_value("do-not-print-me")
        .build()
        .unwrap();

    assert!(!format!("{draft:?}").contains("do-not-print-me"));
}
