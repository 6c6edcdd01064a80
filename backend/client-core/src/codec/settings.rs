//! Settings envelope handed to the backend's `init`.

use super::SCHEMA_VERSION;
use crate::config::ClientSettings;
use crate::error::CodecError;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct SettingsEnvelope {
    schema_version: u32,
    #[serde(flatten)]
    settings: ClientSettings,
}

pub fn encode_settings(settings: &ClientSettings) -> Result<String, CodecError> {
    let envelope = SettingsEnvelope {
        schema_version: SCHEMA_VERSION,
        settings: settings.clone(),
    };

    serde_json::to_string(&envelope).map_err(|e| CodecError::encode(format!("settings: {e}")))
}

/// Decode a settings envelope, refusing any schema version but the current one.
pub fn decode_settings(raw: &str) -> Result<ClientSettings, CodecError> {
    let envelope: SettingsEnvelope = serde_json::from_str(raw)
        .map_err(|e| CodecError::decode(format!("settings envelope: {e}")))?;

    if envelope.schema_version != SCHEMA_VERSION {
        return Err(CodecError::envelope(format!(
            "unsupported schema_version {} (expected {})",
            envelope.schema_version, SCHEMA_VERSION
        )));
    }

    Ok(envelope.settings)
}
