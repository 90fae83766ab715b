use jiff::civil::{Date, DateTime, Time};
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::clock;
use crate::error::AlarmError;
use crate::resolve;

/// Recurrence rule governing how an alarm's next fire time is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Repeat {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Repeat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Repeat {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(AlarmError::validation(
                "repeat",
                format!("unknown repeat '{s}' (expected once, daily, weekly, monthly or yearly)"),
            )),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Repeat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Repeat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Weekday with custom serde (lowercase string).
///
/// Indexed Sunday=0 .. Saturday=6, matching the weekday numbering the
/// alarm store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Self::Sunday => "sun",
            Self::Monday => "mon",
            Self::Tuesday => "tue",
            Self::Wednesday => "wed",
            Self::Thursday => "thu",
            Self::Friday => "fri",
            Self::Saturday => "sat",
        }
    }

    /// Sunday=0 .. Saturday=6.
    pub fn index(self) -> u8 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    pub fn from_index(n: u8) -> Option<Self> {
        match n {
            0 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            _ => None,
        }
    }

    pub fn to_jiff(self) -> jiff::civil::Weekday {
        match self {
            Self::Sunday => jiff::civil::Weekday::Sunday,
            Self::Monday => jiff::civil::Weekday::Monday,
            Self::Tuesday => jiff::civil::Weekday::Tuesday,
            Self::Wednesday => jiff::civil::Weekday::Wednesday,
            Self::Thursday => jiff::civil::Weekday::Thursday,
            Self::Friday => jiff::civil::Weekday::Friday,
            Self::Saturday => jiff::civil::Weekday::Saturday,
        }
    }

    pub fn from_jiff(wd: jiff::civil::Weekday) -> Self {
        match wd {
            jiff::civil::Weekday::Sunday => Self::Sunday,
            jiff::civil::Weekday::Monday => Self::Monday,
            jiff::civil::Weekday::Tuesday => Self::Tuesday,
            jiff::civil::Weekday::Wednesday => Self::Wednesday,
            jiff::civil::Weekday::Thursday => Self::Thursday,
            jiff::civil::Weekday::Friday => Self::Friday,
            jiff::civil::Weekday::Saturday => Self::Saturday,
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_weekday(&s).ok_or_else(|| serde::de::Error::custom(format!("unknown weekday: {s}")))
    }
}

pub fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sunday),
        "monday" | "mon" => Some(Weekday::Monday),
        "tuesday" | "tue" => Some(Weekday::Tuesday),
        "wednesday" | "wed" => Some(Weekday::Wednesday),
        "thursday" | "thu" => Some(Weekday::Thursday),
        "friday" | "fri" => Some(Weekday::Friday),
        "saturday" | "sat" => Some(Weekday::Saturday),
        _ => None,
    }
}

/// Membership set over the seven weekdays, Sunday=0 .. Saturday=6.
///
/// Only meaningful for weekly alarms; an empty set means "no day
/// restriction was configured".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All seven days enabled.
    pub const fn all() -> Self {
        Self(0b0111_1111)
    }

    /// Monday through Friday.
    pub fn weekdays() -> Self {
        let mut set = Self::empty();
        for d in [
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
        ] {
            set.insert(d);
        }
        set
    }

    pub fn from_days(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut set = Self::empty();
        for d in days {
            set.insert(d);
        }
        set
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.index();
    }

    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !(1 << day.index());
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Enabled days in ascending index order (Sunday first).
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        (0u8..7).filter_map(move |i| {
            if self.0 & (1 << i) != 0 {
                Weekday::from_index(i)
            } else {
                None
            }
        })
    }

    /// Parse a comma-separated day list like "mon,wed,fri".
    pub fn parse_list(s: &str) -> Result<Self, AlarmError> {
        let mut set = Self::empty();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match parse_weekday(part) {
                Some(d) => set.insert(d),
                None => {
                    return Err(AlarmError::validation(
                        "days",
                        format!("unknown weekday '{part}'"),
                    ))
                }
            }
        }
        Ok(set)
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        Self::from_days(iter)
    }
}

#[cfg(feature = "serde")]
impl Serialize for WeekdaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let days = Vec::<Weekday>::deserialize(deserializer)?;
        Ok(Self::from_days(days))
    }
}

/// Snooze configuration for an alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snooze {
    pub enabled: bool,
    pub minutes: u16,
}

impl Default for Snooze {
    fn default() -> Self {
        Self {
            enabled: false,
            minutes: DEFAULT_SNOOZE_MINUTES,
        }
    }
}

/// Default snooze duration in minutes.
pub const DEFAULT_SNOOZE_MINUTES: u16 = 5;

/// Longest accepted snooze duration in minutes.
pub const MAX_SNOOZE_MINUTES: u16 = 120;

/// Longest accepted alarm label, in characters after sanitization.
pub const MAX_LABEL_LEN: usize = 100;

/// A stored alarm: label, trigger time, recurrence, and ring options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alarm {
    pub id: String,
    pub label: String,
    /// Wall-clock trigger time, minute precision.
    pub time: Time,
    /// Calendar date for one-shot alarms; repeating alarms leave this unset
    /// and anchor to the evaluation day instead.
    #[cfg_attr(feature = "serde", serde(default))]
    pub date: Option<Date>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub repeat: Repeat,
    #[cfg_attr(feature = "serde", serde(default))]
    pub days: WeekdaySet,
    pub enabled: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sound: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vibration: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub snooze: Snooze,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Alarm {
    /// Create an alarm with the given label, time and repeat, everything
    /// else defaulted. The store stamps `created_at`/`updated_at` on add.
    pub fn new(label: impl Into<String>, time: Time, repeat: Repeat) -> Self {
        Self {
            id: String::new(),
            label: label.into(),
            time,
            date: None,
            repeat,
            days: WeekdaySet::empty(),
            enabled: true,
            sound: None,
            vibration: false,
            snooze: Snooze::default(),
            created_at: DateTime::default(),
            updated_at: DateTime::default(),
        }
    }

    pub fn with_days(mut self, days: WeekdaySet) -> Self {
        self.days = days;
        self
    }

    pub fn with_date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Check the alarm is acceptable for the store.
    ///
    /// This is the editing-layer guard: a weekly alarm with no enabled day
    /// is refused here, so the resolver's return-unchanged behavior for an
    /// empty set is never reachable through the store.
    pub fn validate(&self) -> Result<(), AlarmError> {
        let label = sanitize(&self.label);
        if label.is_empty() {
            return Err(AlarmError::validation("label", "must not be empty"));
        }
        if label.chars().count() > MAX_LABEL_LEN {
            return Err(AlarmError::validation(
                "label",
                format!("must be at most {MAX_LABEL_LEN} characters"),
            ));
        }
        if self.repeat == Repeat::Once && self.date.is_none() {
            return Err(AlarmError::validation(
                "date",
                "one-shot alarms require a date",
            ));
        }
        if self.repeat == Repeat::Weekly && self.days.is_empty() {
            return Err(AlarmError::validation(
                "days",
                "weekly alarms require at least one enabled day",
            ));
        }
        if self.snooze.enabled
            && !(1..=MAX_SNOOZE_MINUTES).contains(&self.snooze.minutes)
        {
            return Err(AlarmError::validation(
                "snooze",
                format!("duration must be between 1 and {MAX_SNOOZE_MINUTES} minutes"),
            ));
        }
        Ok(())
    }

    /// The alarm's configured trigger instant: its date (or the evaluation
    /// day for repeating alarms) combined with its wall-clock time.
    pub fn base_instant(&self, now: DateTime) -> DateTime {
        let date = self.date.unwrap_or_else(|| now.date());
        clock::at(date, self.time)
    }

    /// Next fire time for an enabled alarm, or `None` when disabled.
    pub fn next_trigger(&self, now: DateTime) -> Result<Option<DateTime>, AlarmError> {
        if !self.enabled {
            return Ok(None);
        }
        let days = if self.repeat == Repeat::Weekly && !self.days.is_empty() {
            Some(&self.days)
        } else {
            None
        };
        resolve::next_occurrence(self.base_instant(now), self.repeat, now, days).map(Some)
    }

    /// When a snoozed ring should fire again.
    pub fn snoozed_until(&self, now: DateTime) -> Result<DateTime, AlarmError> {
        let minutes = if self.snooze.minutes == 0 {
            DEFAULT_SNOOZE_MINUTES
        } else {
            self.snooze.minutes
        };
        now.checked_add(jiff::Span::new().minutes(minutes as i64))
            .map_err(|e| AlarmError::resolve(format!("snooze overflow: {e}")))
    }
}

/// Strip control characters and trim surrounding whitespace.
pub fn sanitize(input: &str) -> String {
    input.chars().filter(|c| !c.is_control()).collect::<String>().trim().to_string()
}

/// Parse a wall-clock time in `HH:MM` form.
pub fn parse_hhmm(s: &str) -> Result<Time, AlarmError> {
    let invalid = || AlarmError::validation("time", format!("'{s}' is not a valid HH:MM time"));
    let (h, m) = s.split_once(':').ok_or_else(invalid)?;
    let hour: i8 = h.parse().map_err(|_| invalid())?;
    let minute: i8 = m.parse().map_err(|_| invalid())?;
    Time::new(hour, minute, 0, 0).map_err(|_| invalid())
}
