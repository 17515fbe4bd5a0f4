//! Slot rules: date/time parsing, end-time derivation and the "no past
//! bookings" check.
//!
//! Appointment dates and times are wall-clock local values with no timezone
//! component. "Today" is supplied by a [`Clock`] so callers (and tests) decide
//! what the current calendar day is.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serializer;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Every appointment occupies exactly one slot of this length.
pub const SLOT_DURATION_MINUTES: i64 = 60;

/// Wire format for appointment dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for start/end times (24h).
pub const TIME_FORMAT: &str = "%H:%M";

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current calendar day.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always reports the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a strict `YYYY-MM-DD` calendar date (zero-padded, no surrounding whitespace).
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, CoreError> {
    let invalid = || CoreError::validation(field, "invalid date format, use YYYY-MM-DD");

    let shaped = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

/// Parse a strict `HH:MM` start time (two-digit hour 00-23, two-digit minute 00-59).
pub fn parse_start_time(raw: &str) -> Result<NaiveTime, CoreError> {
    let invalid = || CoreError::validation("start_time", "invalid start time format, use HH:MM");

    let (hour, minute) = raw.split_once(':').ok_or_else(invalid)?;
    if hour.len() != 2 || minute.len() != 2 {
        return Err(invalid());
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    if hour > 23 {
        return Err(CoreError::validation("start_time", "hour must be between 00 and 23"));
    }
    if minute > 59 {
        return Err(CoreError::validation("start_time", "minute must be between 00 and 59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

// ---------------------------------------------------------------------------
// Slot arithmetic
// ---------------------------------------------------------------------------

/// End of the slot starting at `start`, wrapping past midnight.
pub fn end_time(start: NaiveTime) -> NaiveTime {
    let (end, _wrapped_secs) =
        start.overflowing_add_signed(Duration::minutes(SLOT_DURATION_MINUTES));
    end
}

/// Reject dates strictly before `today`.
pub fn ensure_not_past(
    field: &'static str,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<(), CoreError> {
    if date < today {
        return Err(CoreError::validation(
            field,
            format!("{date} is in the past"),
        ));
    }
    Ok(())
}

/// Parse a date and apply [`ensure_not_past`] in one step.
pub fn parse_bookable_date(
    field: &'static str,
    raw: &str,
    clock: &impl Clock,
) -> Result<NaiveDate, CoreError> {
    let date = parse_date(field, raw)?;
    ensure_not_past(field, date, clock.today())?;
    Ok(date)
}

/// Serde helper rendering a [`NaiveTime`] as `HH:MM`.
pub fn serialize_hhmm<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format(TIME_FORMAT))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
