//! Notification planning: turn the alarm store into the set of trigger
//! requests a platform notification layer would schedule.
//!
//! Planning is pure: this module computes values and never talks to an
//! OS notification API.

use jiff::civil::DateTime;

use crate::error::AlarmError;
use crate::store::AlarmStore;

/// Notification channel for ringing alarms.
pub const CHANNEL_ALARM: &str = "alarm_channel";

/// Notification channel for non-ringing reminders.
pub const CHANNEL_REMINDER: &str = "reminder_channel";

/// Default notification body.
const RING_BODY: &str = "Your alarm is ringing";

/// A single notification to be scheduled by the (out-of-scope) platform
/// layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TriggerRequest {
    pub alarm_id: String,
    pub title: String,
    pub body: String,
    pub fire_at: DateTime,
    pub channel: &'static str,
}

/// One trigger per enabled alarm, ordered by fire time then alarm id.
pub fn plan(store: &AlarmStore, now: DateTime) -> Result<Vec<TriggerRequest>, AlarmError> {
    let mut requests = Vec::new();
    for alarm in store.all() {
        let Some(fire_at) = alarm.next_trigger(now)? else {
            continue;
        };
        requests.push(TriggerRequest {
            alarm_id: alarm.id.clone(),
            title: if alarm.label.is_empty() {
                "Alarm".to_string()
            } else {
                alarm.label.clone()
            },
            body: RING_BODY.to_string(),
            fire_at,
            channel: CHANNEL_ALARM,
        });
    }
    requests.sort_by(|a, b| {
        a.fire_at
            .cmp(&b.fire_at)
            .then_with(|| a.alarm_id.cmp(&b.alarm_id))
    });
    Ok(requests)
}

/// The earliest trigger across the store, if any alarm is enabled.
pub fn next_ring(store: &AlarmStore, now: DateTime) -> Result<Option<TriggerRequest>, AlarmError> {
    Ok(plan(store, now)?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alarm, Repeat};
    use jiff::civil::{Date, Time};

    fn now() -> DateTime {
        Date::new(2023, 5, 1)
            .unwrap()
            .to_datetime(Time::new(12, 0, 0, 0).unwrap())
    }

    fn store() -> AlarmStore {
        let mut store = AlarmStore::new();
        store
            .add(
                Alarm::new("Wake", Time::new(7, 0, 0, 0).unwrap(), Repeat::Daily),
                now(),
            )
            .unwrap();
        store
            .add(
                Alarm::new("Lunch", Time::new(12, 30, 0, 0).unwrap(), Repeat::Daily),
                now(),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_plan_orders_by_fire_time() {
        let plan = plan(&store(), now()).unwrap();
        assert_eq!(plan.len(), 2);
        // Lunch is still ahead today; Wake already rang and rolls to tomorrow.
        assert_eq!(plan[0].title, "Lunch");
        assert_eq!(
            plan[0].fire_at,
            Date::new(2023, 5, 1)
                .unwrap()
                .to_datetime(Time::new(12, 30, 0, 0).unwrap())
        );
        assert_eq!(plan[1].title, "Wake");
        assert_eq!(plan[1].fire_at.day(), 2);
    }

    #[test]
    fn test_plan_skips_disabled_alarms() {
        let mut s = store();
        let id = s.all().find(|a| a.label == "Wake").unwrap().id.clone();
        s.toggle(&id, false, now()).unwrap();
        let plan = plan(&s, now()).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].title, "Lunch");
    }

    #[test]
    fn test_next_ring_is_earliest() {
        let ring = next_ring(&store(), now()).unwrap().unwrap();
        assert_eq!(ring.title, "Lunch");
        assert_eq!(ring.channel, CHANNEL_ALARM);
        assert_eq!(ring.body, "Your alarm is ringing");
    }

    #[test]
    fn test_next_ring_empty_store() {
        let empty = AlarmStore::new();
        assert!(next_ring(&empty, now()).unwrap().is_none());
    }
}
