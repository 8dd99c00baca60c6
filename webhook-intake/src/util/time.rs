//! Timestamp helpers.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as ISO-8601 with millisecond precision,
/// e.g. `2024-05-01T10:00:00.123Z`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
