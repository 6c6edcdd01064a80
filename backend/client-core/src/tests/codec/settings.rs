use crate::codec::{SCHEMA_VERSION, decode_settings, encode_settings};
use crate::config::ClientSettings;
use crate::error::CodecError;

use serde_json::json;

/// **VALUE**: Verifies the settings envelope announces the schema version next to the settings.
///
/// **WHY THIS MATTERS**: The backend checks the version once, at init, so a client built
/// against another envelope schema fails at construction rather than on the first command.
///
/// **BUG THIS CATCHES**: Would catch the version being nested or dropped.
#[test]
fn given_settings_when_encoded_then_schema_version_is_top_level() {
    // GIVEN: Self-hosted settings
    let settings = ClientSettings::from_server_base("https://vault.example.com/");

    // WHEN: Encoding them
    let raw = encode_settings(&settings).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    // THEN: Flat object with the version and the settings unchanged
    assert_eq!(value["schema_version"], json!(SCHEMA_VERSION));
    assert_eq!(value["api_url"], json!("https://vault.example.com/api"));
    assert_eq!(value["identity_url"], json!("https://vault.example.com/identity"));
    assert_eq!(value["device_type"], json!("sdk"));
    assert_eq!(decode_settings(&raw).unwrap(), settings);
}

/// **VALUE**: Verifies a backend refuses settings from another schema version.
///
/// **BUG THIS CATCHES**: Would catch decode_settings ignoring the version field.
#[test]
fn given_other_schema_version_when_decoded_then_envelope_error() {
    let raw = json!({
        "schema_version": SCHEMA_VERSION + 1,
        "identity_url": "https://identity.example.com",
        "api_url": "https://api.example.com",
        "user_agent": "test",
        "device_type": "sdk"
    })
    .to_string();

    let result = decode_settings(&raw);

    assert!(matches!(result, Err(CodecError::Envelope { .. })));
}
