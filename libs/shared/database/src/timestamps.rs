//! Storage boundary for instants.
//!
//! Every stored timestamp is a UTC instant written without an offset tag.
//! Writes strip the tag, reads re-attach UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Convert an offset-aware instant into the same instant in UTC.
pub fn normalize<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<Utc> {
    instant.with_timezone(&Utc)
}

/// Strip the UTC tag for storage.
pub fn to_storage(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.naive_utc()
}

/// Re-attach UTC to a stored value.
pub fn from_storage(stored: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&stored)
}

/// Storage values bounding one UTC calendar day as `[start, end)`.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = date
        .succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}
