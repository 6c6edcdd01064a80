use super::{TEST_ACCESS_TOKEN, TEST_SERVICE_ACCOUNT_ID};

use crate::auth::AccessToken;
use crate::error::{AuthError, TokenFormatFailure};

fn format_failure(raw: &str) -> TokenFormatFailure {
    match AccessToken::parse(raw) {
        Err(AuthError::InvalidAccessToken { reason, .. }) => reason,
        other => panic!("Expected InvalidAccessToken, got {other:?}"),
    }
}

/// **VALUE**: Verifies a well-formed token parses and exposes its service account id.
///
/// **WHY THIS MATTERS**: The service account id is the only part of the token that
/// may appear in logs. It has to come out of the token intact.
///
/// **BUG THIS CATCHES**: Would catch a regex that swaps or truncates token segments.
#[test]
fn given_well_formed_token_when_parsed_then_service_account_id_extracted() {
    // GIVEN: A version 0 token

    // WHEN: Parsing it
    let token = AccessToken::parse(TEST_ACCESS_TOKEN).unwrap();

    // THEN: The service account id is the UUID segment and the raw token is kept whole
    assert_eq!(token.service_account_id().to_string(), TEST_SERVICE_ACCOUNT_ID);
    assert_eq!(token.redacted().as_str(), TEST_ACCESS_TOKEN);
}

/// **VALUE**: Verifies surrounding whitespace (common when pasting from .env files) is ignored.
///
/// **BUG THIS CATCHES**: Would catch a trailing newline making a valid token unusable.
#[test]
fn given_token_with_surrounding_whitespace_when_parsed_then_trimmed() {
    let token = AccessToken::parse(&format!("  {TEST_ACCESS_TOKEN}\n")).unwrap();

    assert_eq!(token.redacted().as_str(), TEST_ACCESS_TOKEN);
}

/// **VALUE**: Verifies each malformed shape maps to its own failure reason.
///
/// **WHY THIS MATTERS**: "Invalid token" alone does not tell an operator whether they pasted
/// the wrong value, a truncated one, or a token from a newer server.
///
/// **BUG THIS CATCHES**: Would catch reasons collapsing into InvalidStructure, or a bad
/// token reaching the backend at all.
#[test]
fn given_malformed_tokens_when_parsed_then_specific_reason_reported() {
    // GIVEN/WHEN/THEN: One malformed token per failure reason
    assert_eq!(format_failure(""), TokenFormatFailure::Empty);
    assert_eq!(format_failure("   "), TokenFormatFailure::Empty);
    assert_eq!(
        format_failure("0.ec2c1d46-6a4b-4751-a310-af9601317f2d.secret"),
        TokenFormatFailure::InvalidStructure
    );
    assert_eq!(format_failure("token-A"), TokenFormatFailure::InvalidStructure);
    assert_eq!(
        format_failure("1.ec2c1d46-6a4b-4751-a310-af9601317f2d.secret:key"),
        TokenFormatFailure::UnsupportedVersion {
            actual: "1".to_string()
        }
    );
    assert_eq!(
        format_failure("0.not-a-uuid.secret:key"),
        TokenFormatFailure::InvalidServiceAccountId
    );
}

/// **VALUE**: Verifies Debug output of a parsed token never contains the secret parts.
///
/// **WHY THIS MATTERS**: Tokens end up inside session structs that get logged with `{:?}`.
///
/// **BUG THIS CATCHES**: Would catch a derived Debug on AccessToken.
#[test]
fn given_parsed_token_when_debug_formatted_then_secret_not_exposed() {
    let token = AccessToken::parse(TEST_ACCESS_TOKEN).unwrap();

    let debug = format!("{token:?}");

    assert!(!debug.contains("C2IgxjjLF7qSshsbwe8JGcbM075YXw"));
    assert!(!debug.contains("X8vbvA0bduihIDe"));
    assert!(debug.contains(TEST_SERVICE_ACCOUNT_ID));
    assert!(debug.contains("REDACTED"));
}

/// **VALUE**: Verifies the error message itself never echoes the rejected token.
#[test]
fn given_invalid_token_when_error_displayed_then_token_not_echoed() {
    let err = AccessToken::parse("9.secret-looking-value.abc:def").unwrap_err();

    let message = err.to_string();

    assert!(message.contains("Invalid Access Token"));
    assert!(!message.contains("secret-looking-value"));
}
