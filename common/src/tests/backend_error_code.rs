use crate::BackendErrorCode;

/// **VALUE**: Verifies that codes unknown to this client decode to `Unknown`.
///
/// **WHY THIS MATTERS**: A newer backend may introduce codes. Failing the whole envelope
/// decode over an unrecognized code would hide the real error message from the caller.
///
/// **BUG THIS CATCHES**: Would catch if Deserialize is switched to a strict derive.
#[test]
fn given_unrecognized_code_when_deserialized_then_maps_to_unknown() {
    // GIVEN: A code string this client has never seen
    let raw = "\"quota_exceeded\"";

    // WHEN: Deserializing
    let code: BackendErrorCode = serde_json::from_str(raw).unwrap();

    // THEN: Maps to Unknown
    assert_eq!(code, BackendErrorCode::Unknown);
}

#[test]
fn given_known_codes_when_round_tripped_through_strings_then_preserved() {
    let codes = [
        BackendErrorCode::NotFound,
        BackendErrorCode::PermissionDenied,
        BackendErrorCode::Unauthorized,
        BackendErrorCode::InvalidRequest,
        BackendErrorCode::Conflict,
        BackendErrorCode::Internal,
    ];

    for code in codes {
        assert_eq!(BackendErrorCode::parse(code.as_str()), code, "{code}");
    }
}

/// **VALUE**: Verifies that only `Unauthorized` counts as an auth failure.
///
/// **WHY THIS MATTERS**: Auth failures expire the session. Treating NotFound or
/// PermissionDenied as auth failures would lock a caller out after a routine miss.
///
/// **BUG THIS CATCHES**: Would catch a widened match in `is_auth_failure()`.
#[test]
fn given_codes_when_checking_auth_failure_then_only_unauthorized_matches() {
    assert!(BackendErrorCode::Unauthorized.is_auth_failure());
    assert!(!BackendErrorCode::PermissionDenied.is_auth_failure());
    assert!(!BackendErrorCode::NotFound.is_auth_failure());
    assert!(!BackendErrorCode::Internal.is_client_error());
}
