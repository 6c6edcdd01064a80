//! Field limits enforced before a request leaves the client.
//!
//! The backend enforces the same limits; checking here fails fast without a
//! round trip and keeps malformed input out of the dispatcher.

use crate::timestamp;
use crate::{ModelError, OrganizationId};

use std::time::SystemTime;

pub const NAME_MAX_CHARS: usize = 500;
pub const KEY_MAX_CHARS: usize = 500;
pub const VALUE_MAX_CHARS: usize = 25_000;
pub const NOTE_MAX_CHARS: usize = 7_000;

/// Required text field: non-empty, not whitespace-only, bounded. Returns the trimmed value.
#[track_caller]
pub fn required_text(
    field: &'static str,
    raw: &str,
    max_chars: usize,
) -> Result<String, ModelError> {
    if raw.is_empty() {
        return Err(ModelError::validation(field, format!("{field} must not be empty")));
    }

    if raw.trim().is_empty() {
        return Err(ModelError::validation(
            field,
            format!("{field} must not contain only whitespaces"),
        ));
    }

    bounded(field, raw, max_chars)?;

    Ok(raw.trim().to_string())
}

/// Optional text field: may be empty, but not whitespace-only. Returns the trimmed value.
#[track_caller]
pub fn optional_text(
    field: &'static str,
    raw: &str,
    max_chars: usize,
) -> Result<String, ModelError> {
    if raw.is_empty() {
        return Ok(String::new());
    }

    if raw.trim().is_empty() {
        return Err(ModelError::validation(
            field,
            format!("{field} must not contain only whitespaces"),
        ));
    }

    bounded(field, raw, max_chars)?;

    Ok(raw.trim().to_string())
}

/// Secret values are sent verbatim: surrounding whitespace is part of the value.
#[track_caller]
pub fn secret_value(raw: &str) -> Result<String, ModelError> {
    if raw.is_empty() {
        return Err(ModelError::validation("value", "value must not be empty"));
    }

    bounded("value", raw, VALUE_MAX_CHARS)?;

    Ok(raw.to_string())
}

#[track_caller]
pub fn organization(organization_id: OrganizationId) -> Result<OrganizationId, ModelError> {
    if organization_id.is_nil() {
        return Err(ModelError::validation(
            "organization_id",
            "organization_id must not be the nil UUID",
        ));
    }

    Ok(organization_id)
}

/// Timestamps sent to the backend must have an RFC 3339 form (1970 through 9999).
#[track_caller]
pub fn timestamp(field: &'static str, time: SystemTime) -> Result<SystemTime, ModelError> {
    if !timestamp::is_representable(time) {
        return Err(ModelError::validation(
            field,
            format!("{field} must be between 1970-01-01 and 9999-12-31 (UTC)"),
        ));
    }

    Ok(time)
}

#[track_caller]
pub fn non_empty_batch<T>(field: &'static str, ids: &[T]) -> Result<(), ModelError> {
    if ids.is_empty() {
        return Err(ModelError::validation(
            field,
            format!("{field} must contain at least one identifier"),
        ));
    }

    Ok(())
}

#[track_caller]
fn bounded(field: &'static str, raw: &str, max_chars: usize) -> Result<(), ModelError> {
    let actual = raw.chars().count();
    if actual > max_chars {
        return Err(ModelError::validation(
            field,
            format!("{field} must not exceed {max_chars} characters in length"),
        ));
    }

    Ok(())
}
