use chrono::{DateTime, SecondsFormat, Utc};

/// ISO 8601 in UTC with milliseconds, e.g. `2024-05-01T10:00:00.000Z`.
pub fn iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
