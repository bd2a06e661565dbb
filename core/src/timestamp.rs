//! Timestamp conventions.
//!
//! Timestamps are UTC wall-clock values with millisecond precision. Over HTTP
//! they travel as `yyyy-MM-dd'T'HH:mm:ss`; inside the document store they are
//! epoch milliseconds so numeric range indexes apply.

use chrono::{DateTime, NaiveDateTime, SubsecRound};

/// Format used when rendering timestamps in HTTP responses.
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format accepted when parsing timestamps from requests.
///
/// Same as [`FORMAT`] with an optional fractional-second part.
pub const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Drops sub-millisecond precision.
#[must_use]
pub fn truncate(ts: NaiveDateTime) -> NaiveDateTime {
    ts.trunc_subsecs(3)
}

/// Epoch milliseconds of a UTC wall-clock timestamp.
#[must_use]
pub fn to_millis(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_millis()
}

/// Inverse of [`to_millis`]. `None` when out of chrono's range.
#[must_use]
pub fn from_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Renders a timestamp in the HTTP format.
#[must_use]
pub fn format(ts: NaiveDateTime) -> String {
    ts.format(FORMAT).to_string()
}

/// Parses a timestamp in the HTTP format.
///
/// # Errors
///
/// Returns the chrono parse error when the input does not match.
pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, PARSE_FORMAT).map(truncate)
}

/// Serde adapter for `NaiveDateTime` in the HTTP format.
///
/// ```ignore
/// #[serde(with = "todo_service_core::timestamp::serde_format")]
/// created_at: NaiveDateTime,
/// ```
pub mod serde_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// Serialize as `yyyy-MM-dd'T'HH:mm:ss`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(*ts))
    }

    /// Deserialize from `yyyy-MM-dd'T'HH:mm:ss[.fff]`.
    ///
    /// # Errors
    ///
    /// Fails on malformed timestamps.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(|e| D::Error::custom(format!("invalid timestamp '{raw}': {e}")))
    }
}

/// Serde adapter for `Option<NaiveDateTime>` in the HTTP format.
pub mod serde_format_option {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// Serialize `Some` as a formatted string and `None` as `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        ts: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_some(&super::format(*ts)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize `null` or a formatted string.
    ///
    /// # Errors
    ///
    /// Fails on malformed timestamps.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| {
                super::parse(&raw)
                    .map_err(|e| D::Error::custom(format!("invalid timestamp '{raw}': {e}")))
            })
            .transpose()
    }
}
