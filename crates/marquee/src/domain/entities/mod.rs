pub mod movie;
pub mod user;

use chrono::{DateTime, Utc};

/// Current time truncated to the millisecond precision of BSON datetimes, so
/// a record reads back exactly as it was written.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
