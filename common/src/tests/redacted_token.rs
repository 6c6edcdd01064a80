use crate::RedactedAccessToken;

const RAW_TOKEN: &str = "0.ec2c1d46-6a4b-4751-a310-af9601317f2d.C2IgxjjLF7qSshsbwe8JGcbM075YXw:X8vbvA0bduihIDe/qrzIQQ==";

/// **VALUE**: Verifies that Debug output never contains the token value.
///
/// **WHY THIS MATTERS**: Sessions are logged with `{:?}` during diagnostics. A token in a
/// log file is a credential leak.
///
/// **BUG THIS CATCHES**: Would catch if someone derives Debug instead of the manual impl.
#[test]
fn given_token_when_debug_formatted_then_value_is_redacted() {
    // GIVEN: A redacted token
    let token = RedactedAccessToken::new(RAW_TOKEN);

    // WHEN: Debug and Display formatting
    let debug = format!("{token:?}");
    let display = format!("{token}");

    // THEN: Neither contains the secret part
    assert!(!debug.contains("C2IgxjjLF7qSshsbwe8JGcbM075YXw"));
    assert!(!display.contains("C2IgxjjLF7qSshsbwe8JGcbM075YXw"));
    assert!(debug.contains("REDACTED"));
}

/// **VALUE**: Verifies that implicit serialization is refused.
///
/// **WHY THIS MATTERS**: A token embedded in a serialized struct would end up in envelopes,
/// config files or logs without anyone calling `as_str()`.
///
/// **BUG THIS CATCHES**: Would catch if the Serialize impl is replaced by a derive.
#[test]
fn given_token_when_serialized_then_returns_error() {
    // GIVEN: A redacted token
    let token = RedactedAccessToken::new(RAW_TOKEN);

    // WHEN: Serializing through serde
    let result = serde_json::to_string(&token);

    // THEN: Serialization fails with a pointer to as_str()
    let err = result.expect_err("serialization must fail");
    assert!(err.to_string().contains("as_str()"));
}

#[test]
fn given_token_when_accessed_explicitly_then_returns_raw_value() {
    let token = RedactedAccessToken::new(RAW_TOKEN);

    assert_eq!(token.as_str(), RAW_TOKEN);
    assert_eq!(token.len(), RAW_TOKEN.len());
    assert!(!token.is_empty());
}
