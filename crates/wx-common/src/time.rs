//! GRIB time-range arithmetic.

use chrono::{DateTime, Duration, Utc};

/// Seconds per unit of GRIB code table 4.4 (indicator of unit of time range).
///
/// Calendar-fuzzy units (month and longer) use nominal lengths; `None` for
/// reserved or missing codes.
pub fn time_range_unit_seconds(unit: u8) -> Option<i64> {
    match unit {
        0 => Some(60),                 // minute
        1 => Some(3600),               // hour
        2 => Some(86400),              // day
        3 => Some(30 * 86400),         // month
        4 => Some(365 * 86400),        // year
        5 => Some(10 * 365 * 86400),   // decade
        6 => Some(30 * 365 * 86400),   // normal (30 years)
        7 => Some(100 * 365 * 86400),  // century
        10 => Some(3 * 3600),          // 3 hours
        11 => Some(6 * 3600),          // 6 hours
        12 => Some(12 * 3600),         // 12 hours
        13 => Some(1),                 // second
        _ => None,
    }
}

/// Effective (valid) time of a forecast field.
pub fn effective_time(reference: DateTime<Utc>, offset: i64, unit: u8) -> Option<DateTime<Utc>> {
    let secs = time_range_unit_seconds(unit)?;
    offset
        .checked_mul(secs)
        .map(|s| reference + Duration::seconds(s))
}
