//! Time and timestamp helpers.

use chrono::{DateTime, TimeZone, Utc};

/// UTC timestamp used for platform manufacture dates.
pub type Timestamp = DateTime<Utc>;

/// Build a UTC timestamp from calendar fields.
///
/// Returns `None` when the fields do not name a valid instant.
#[must_use]
pub fn utc(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> Option<Timestamp> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()
}
