//! Next-occurrence resolution for alarm repeat rules.
//!
//! The resolver is a pure function over its arguments: `now` is always
//! passed explicitly, nothing reads the ambient clock, and every
//! transformation builds a new `DateTime` instead of mutating in place.
//!
//! Two behaviors of the shipped scheduler are preserved deliberately
//! rather than corrected:
//! - a missed one-shot alarm advances by exactly one day, even when `now`
//!   is more than a day past it, so the result can still be in the past;
//! - a weekly alarm whose weekday set has no enabled day resolves to its
//!   candidate unchanged. The store-level validation refuses to save such
//!   an alarm, so this is only reachable when calling the resolver
//!   directly.

use jiff::civil::DateTime;

use crate::clock;
use crate::error::AlarmError;
use crate::model::{Repeat, WeekdaySet};

/// Compute the next instant at or after `now` at which an alarm with the
/// given base instant and repeat rule should fire.
///
/// `days` is only consulted for [`Repeat::Weekly`]; pass `None` for plain
/// 7-day recurrence.
///
/// For `Daily`, `Weekly` without a day set, and `Yearly` the result is
/// strictly after `now`. For `Once` and an all-false day set it may not be
/// (see the module docs).
pub fn next_occurrence(
    base: DateTime,
    repeat: Repeat,
    now: DateTime,
    days: Option<&WeekdaySet>,
) -> Result<DateTime, AlarmError> {
    match repeat {
        Repeat::Once => {
            if clock::is_past(base, now) {
                clock::add_days(base, 1)
            } else {
                Ok(base)
            }
        }
        Repeat::Daily => next_daily(base, now),
        Repeat::Weekly => {
            let candidate = next_weekly(base, now)?;
            match days {
                Some(set) => next_enabled_day(candidate, set),
                None => Ok(candidate),
            }
        }
        Repeat::Monthly => next_monthly(base, now),
        Repeat::Yearly => next_yearly(base, now),
    }
}

fn next_daily(base: DateTime, now: DateTime) -> Result<DateTime, AlarmError> {
    if base > now {
        return Ok(base);
    }
    let mut next = clock::add_days(base, 1)?;
    if next <= now {
        // Catch up in whole days; time-of-day is preserved, so after this
        // step the date matches now's date and at most one more day is
        // needed for a strictly-future result.
        let days = clock::days_between(next.date(), now.date());
        next = clock::add_days(next, days)?;
        if next <= now {
            next = clock::add_days(next, 1)?;
        }
    }
    Ok(next)
}

fn next_weekly(base: DateTime, now: DateTime) -> Result<DateTime, AlarmError> {
    if base > now {
        return Ok(base);
    }
    let mut next = clock::add_days(base, 7)?;
    if next <= now {
        let weeks = clock::days_between(next.date(), now.date()) / 7;
        next = clock::add_days(next, weeks * 7)?;
        if next <= now {
            next = clock::add_days(next, 7)?;
        }
    }
    Ok(next)
}

fn next_monthly(base: DateTime, now: DateTime) -> Result<DateTime, AlarmError> {
    if base > now {
        return Ok(base);
    }
    let (y, m) = clock::month_after(base.date());
    let next = clock::with_month_clamped(base, y, m)?;
    if next <= now {
        // More than a month behind: jump to the month right after now's,
        // restoring base's day-of-month with the same clamp.
        let (y, m) = clock::month_after(now.date());
        return clock::with_month_clamped(base, y, m);
    }
    Ok(next)
}

fn next_yearly(base: DateTime, now: DateTime) -> Result<DateTime, AlarmError> {
    if base > now {
        return Ok(base);
    }
    let next = clock::with_year_clamped(base, base.year() + 1)?;
    if next <= now {
        return clock::with_year_clamped(base, now.year() + 1);
    }
    Ok(next)
}

/// Snap a candidate instant onto the earliest enabled weekday at or after
/// it, preserving time-of-day.
///
/// A day strictly after the candidate's weekday is preferred within the
/// same week; otherwise the pick wraps to the first enabled day of the
/// following week. An empty set returns the candidate unchanged.
pub fn next_enabled_day(
    candidate: DateTime,
    days: &WeekdaySet,
) -> Result<DateTime, AlarmError> {
    if days.is_empty() {
        return Ok(candidate);
    }
    let d = candidate.date().weekday().to_sunday_zero_offset() as u8;
    // Ascending Sunday=0 order by construction of WeekdaySet::iter.
    let indices: Vec<u8> = days.iter().map(|w| w.index()).collect();
    match indices.iter().copied().find(|&i| i > d) {
        Some(i) => clock::add_days(candidate, (i - d) as i64),
        None => clock::add_days(candidate, (7 - d + indices[0]) as i64),
    }
}

/// Lazy iterator over successive fire times.
///
/// Each yielded instant becomes the base and evaluation time for the next
/// one, reproducing the reschedule-after-fire loop of the alarm app. A
/// one-shot alarm yields at most one instant.
#[derive(Debug, Clone)]
pub struct Occurrences {
    repeat: Repeat,
    days: Option<WeekdaySet>,
    base: DateTime,
    now: DateTime,
    done: bool,
}

impl Occurrences {
    /// Iterate fire times for `(base, repeat, days)` starting from `from`.
    pub fn new(base: DateTime, repeat: Repeat, days: Option<WeekdaySet>, from: DateTime) -> Self {
        Self {
            repeat,
            days,
            base,
            now: from,
            done: false,
        }
    }
}

impl Iterator for Occurrences {
    type Item = Result<DateTime, AlarmError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let occ = match next_occurrence(self.base, self.repeat, self.now, self.days.as_ref()) {
            Ok(occ) => occ,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if self.repeat == Repeat::Once {
            self.done = true;
        }
        self.base = occ;
        self.now = occ;
        Some(Ok(occ))
    }
}
