//! chime — alarm scheduling core.
//!
//! Repeat rules, next-occurrence resolution, and a local alarm store.
//! All time arithmetic is pure: the evaluation time (`now`) is passed in
//! explicitly everywhere, so every operation is deterministic and
//! independently testable.
//!
//! # Examples
//!
//! ```
//! use chime::{next_occurrence, Repeat};
//! use jiff::civil::date;
//!
//! let base = date(2023, 5, 1).at(7, 0, 0, 0);
//! let now = date(2023, 5, 1).at(12, 0, 0, 0);
//! let next = next_occurrence(base, Repeat::Daily, now, None).unwrap();
//! assert_eq!(next, date(2023, 5, 2).at(7, 0, 0, 0));
//! ```

pub mod clock;
pub mod display;
pub mod error;
pub mod model;
pub mod notify;
pub mod resolve;
pub mod store;

pub use error::AlarmError;
pub use model::{parse_hhmm, Alarm, Repeat, Snooze, Weekday, WeekdaySet};
pub use notify::TriggerRequest;
pub use resolve::{next_enabled_day, next_occurrence, Occurrences};
pub use store::AlarmStore;

use jiff::civil::DateTime;

// --- Alarm convenience methods ---

impl Alarm {
    /// Iterate successive fire times starting from `from`.
    ///
    /// Each yielded instant feeds the next computation, reproducing a
    /// reschedule-after-fire loop. One-shot alarms yield at most once.
    pub fn occurrences(&self, from: DateTime) -> Occurrences {
        let days = if self.repeat == Repeat::Weekly && !self.days.is_empty() {
            Some(self.days)
        } else {
            None
        };
        Occurrences::new(self.base_instant(from), self.repeat, days, from)
    }
}
