use std::fmt;

use crate::model::{Alarm, Repeat, Weekday, WeekdaySet};

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, day) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            f.write_str(day.short())?;
        }
        Ok(())
    }
}

impl fmt::Display for Alarm {
    /// Human-readable summary: `Wake - every day at 07:30`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - ", self.label)?;
        match self.repeat {
            Repeat::Once => match self.date {
                Some(date) => write!(f, "once on {date}")?,
                None => write!(f, "once")?,
            },
            Repeat::Daily => write!(f, "every day")?,
            Repeat::Weekly if !self.days.is_empty() => {
                write!(f, "every week on {}", self.days)?
            }
            Repeat::Weekly => write!(f, "every week")?,
            Repeat::Monthly => write!(f, "every month")?,
            Repeat::Yearly => write!(f, "every year")?,
        }
        write!(
            f,
            " at {:02}:{:02}",
            self.time.hour(),
            self.time.minute()
        )?;
        if !self.enabled {
            write!(f, " (off)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::{Date, Time};

    fn alarm(repeat: Repeat) -> Alarm {
        Alarm::new("Wake", Time::new(7, 30, 0, 0).unwrap(), repeat)
    }

    #[test]
    fn test_display_daily() {
        assert_eq!(alarm(Repeat::Daily).to_string(), "Wake - every day at 07:30");
    }

    #[test]
    fn test_display_weekly_with_days() {
        let a = alarm(Repeat::Weekly)
            .with_days(WeekdaySet::parse_list("mon,wed,fri").unwrap());
        assert_eq!(a.to_string(), "Wake - every week on mon, wed, fri at 07:30");
    }

    #[test]
    fn test_display_once_with_date() {
        let a = alarm(Repeat::Once).with_date(Date::new(2023, 5, 1).unwrap());
        assert_eq!(a.to_string(), "Wake - once on 2023-05-01 at 07:30");
    }

    #[test]
    fn test_display_disabled() {
        let mut a = alarm(Repeat::Daily);
        a.enabled = false;
        assert_eq!(a.to_string(), "Wake - every day at 07:30 (off)");
    }

    #[test]
    fn test_display_weekday_set_ordering() {
        let set = WeekdaySet::parse_list("sat,sun,mon").unwrap();
        assert_eq!(set.to_string(), "sun, mon, sat");
    }
}
