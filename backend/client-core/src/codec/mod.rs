//! JSON envelopes exchanged with the backend.
//!
//! Commands go out as externally tagged objects (`{"project_get": {"id": ...}}`),
//! answers come back as a `success`/`data`/`error_message` envelope whose data
//! shape is fixed by the command kind.

pub mod command;
pub mod response;
pub mod settings;

pub use command::{Command, CommandKind};
pub use response::{
    ResponseOutcome, ResponsePayload, decode_response, encode_error, encode_response,
};
pub use settings::{decode_settings, encode_settings};

use crate::error::CodecError;

/// Version of the envelope schema, announced to the backend at init.
pub const SCHEMA_VERSION: u32 = 1;

pub fn encode_command(command: &Command) -> Result<String, CodecError> {
    serde_json::to_string(command)
        .map_err(|e| CodecError::encode(format!("{}: {e}", command.kind())))
}

/// Decode a command envelope. Used by backends.
pub fn decode_command(raw: &str) -> Result<Command, CodecError> {
    serde_json::from_str(raw).map_err(|e| CodecError::decode(format!("command envelope: {e}")))
}
