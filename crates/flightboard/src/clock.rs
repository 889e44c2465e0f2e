//! Wall-clock handling in India Standard Time.
//!
//! The backend serves timestamps in a few shapes: naive `T`- or
//! space-separated wall-clock strings, strings with a `+0530` style offset,
//! and occasionally RFC 3339 or RFC 2822. Everything is parsed into a
//! `DateTime<FixedOffset>` expressed in IST so that "hour of day" means the
//! airport's hour regardless of where the board runs.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc,
};

use crate::error::{Error, Result};

/// Offset of India Standard Time from UTC, in seconds.
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// A timestamp in IST.
pub type IstDateTime = DateTime<FixedOffset>;

/// Offset-aware layouts tried after RFC 3339, once spaces have been normalized to `T`.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Naive layouts, interpreted as IST wall clock.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// The IST offset.
#[must_use]
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current time in IST.
#[must_use]
pub fn now_ist() -> IstDateTime {
    Utc::now().with_timezone(&ist())
}

/// Today's date in IST.
#[must_use]
pub fn today_ist() -> NaiveDate {
    now_ist().date_naive()
}

/// Parse a backend timestamp.
///
/// Returns `None` for empty strings, the `-` placeholder and anything that
/// matches none of the known layouts. Callers decide whether that deserves
/// a warning.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<IstDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&ist()));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&ist()));
    }

    let normalized = normalize_separator(trimmed);

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Some(dt.with_timezone(&ist()));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return ist().from_local_datetime(&naive).single();
        }
    }

    None
}

/// Replace a space date/time separator with `T`.
///
/// `"2026-10-19 14:05:00"` and `"2026-10-19T14:05:00"` must land on the same
/// wall-clock hour.
fn normalize_separator(raw: &str) -> String {
    if raw.contains(' ') && !raw.contains('T') {
        raw.replacen(' ', "T", 1)
    } else {
        raw.to_string()
    }
}

/// Parse a `YYYY-MM-DD` date argument.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the input is not a calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        input: input.to_string(),
    })
}

/// Minutes since local midnight.
#[must_use]
pub fn minute_of_day(dt: &IstDateTime) -> u32 {
    dt.hour() * 60 + dt.minute()
}

/// Date cell as shown on the board, e.g. `Mon, 19 Oct 2026`.
#[must_use]
pub fn format_board_date(dt: &IstDateTime) -> String {
    dt.format("%a, %d %b %Y").to_string()
}

/// Time cell as shown on the board, e.g. `14:05:00`.
#[must_use]
pub fn format_board_time(dt: &IstDateTime) -> String {
    dt.format("%H:%M:%S").to_string()
}

/// Format a minute-of-day as `HH:MM`; 1440 and above wrap to `00:00`.
#[must_use]
pub fn format_minutes(minutes: u32) -> String {
    if minutes >= 1440 {
        return "00:00".to_string();
    }
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
pub(crate) fn ist_at(date: &str, time: &str) -> IstDateTime {
    parse_timestamp(&format!("{date}T{time}")).expect("valid test timestamp")
}
