//! RFC 3339 encoding for `SystemTime` fields.
//!
//! Use with `#[serde(with = "crate::timestamp::rfc3339")]`.
//!
//! Only years 1970 through 9999 have an RFC 3339 form here. Anything outside
//! that range is a serialization error, never a panic.

use std::time::{SystemTime, UNIX_EPOCH};

use humantime::format_rfc3339_nanos;

/// `10000-01-01T00:00:00Z` in seconds since the epoch.
const END_OF_YEAR_9999_SECS: u64 = 253_402_300_800;

/// Whether `time` falls in 1970..=9999 and can be written as RFC 3339.
pub fn is_representable(time: SystemTime) -> bool {
    time.duration_since(UNIX_EPOCH)
        .is_ok_and(|since_epoch| since_epoch.as_secs() < END_OF_YEAR_9999_SECS)
}

pub(crate) fn encode(time: SystemTime) -> Result<String, String> {
    if !is_representable(time) {
        return Err(format!(
            "{time:?} cannot be encoded as RFC 3339 (years 1970 through 9999 only)"
        ));
    }

    Ok(format_rfc3339_nanos(time).to_string())
}

pub mod rfc3339 {
    use std::time::SystemTime;

    use humantime::parse_rfc3339_weak;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = super::encode(*time).map_err(S::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_rfc3339_weak(&raw).map_err(|e| D::Error::custom(format!("{raw}: {e}")))
    }
}

pub mod rfc3339_option {
    use std::time::SystemTime;

    use humantime::parse_rfc3339_weak;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::Error as _};

    pub fn serialize<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => {
                let formatted = super::encode(*time).map_err(S::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SystemTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|raw| {
            parse_rfc3339_weak(&raw).map_err(|e| D::Error::custom(format!("{raw}: {e}")))
        })
        .transpose()
    }
}
