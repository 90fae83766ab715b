//! Calendar arithmetic primitives used by the resolver.
//!
//! Everything here is pure civil-time arithmetic: instants are
//! `jiff::civil::DateTime` values in the device's implicit local frame,
//! and no function reads the ambient clock.

use jiff::civil::{Date, DateTime, Time};

use crate::error::AlarmError;

/// Combine a calendar date with a wall-clock time.
pub fn at(date: Date, time: Time) -> DateTime {
    date.to_datetime(time)
}

/// True iff `a` and `b` fall on the same calendar day.
pub fn same_day(a: DateTime, b: DateTime) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Date part of `date_part` with the hour and minute of `time_part`;
/// seconds and subseconds zeroed.
pub fn combine(date_part: DateTime, time_part: DateTime) -> DateTime {
    // Hour/minute come from an existing DateTime, so Time::new cannot fail.
    let time = Time::new(time_part.hour(), time_part.minute(), 0, 0).unwrap();
    at(date_part.date(), time)
}

/// True iff `instant` is strictly before `now`.
pub fn is_past(instant: DateTime, now: DateTime) -> bool {
    instant < now
}

/// Advance by a whole number of days, preserving time-of-day.
pub fn add_days(dt: DateTime, days: i64) -> Result<DateTime, AlarmError> {
    dt.checked_add(jiff::Span::new().days(days))
        .map_err(|e| AlarmError::resolve(format!("date overflow adding {days} days: {e}")))
}

/// Count calendar days from `a` to `b` (signed).
pub fn days_between(a: Date, b: Date) -> i64 {
    a.until(b).unwrap().get_days() as i64
}

/// Get the last day of a month.
pub fn last_day_of_month(year: i16, month: i8) -> Date {
    if month == 12 {
        Date::new(year + 1, 1, 1).unwrap().yesterday().unwrap()
    } else {
        Date::new(year, month + 1, 1).unwrap().yesterday().unwrap()
    }
}

/// Re-date an instant to the given year and month, keeping its day-of-month
/// where the target month is long enough and clamping to the month's last
/// day otherwise (Jan 31 -> Feb 28/29). Time-of-day is preserved.
pub fn with_month_clamped(dt: DateTime, year: i16, month: i8) -> Result<DateTime, AlarmError> {
    if !(1..=12).contains(&month) {
        return Err(AlarmError::resolve(format!("month {month} out of range")));
    }
    let last = last_day_of_month(year, month).day();
    let day = dt.day().min(last);
    let date = Date::new(year, month, day)
        .map_err(|e| AlarmError::resolve(format!("invalid date {year}-{month}-{day}: {e}")))?;
    Ok(at(date, dt.time()))
}

/// Re-date an instant to the given year, keeping month and day with the
/// same last-day clamp (Feb 29 -> Feb 28 in non-leap years).
pub fn with_year_clamped(dt: DateTime, year: i16) -> Result<DateTime, AlarmError> {
    with_month_clamped(dt, year, dt.month())
}

/// Year and month of the month immediately after `date`'s month.
pub fn month_after(date: Date) -> (i16, i8) {
    if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    }
}
