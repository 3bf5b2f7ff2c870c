//! Trigger resolution: which trigger governs the lights right now.
//!
//! A trigger stays in effect from its time of day until the next trigger
//! fires. Before the first trigger of the day, the last trigger of the
//! previous day is still in effect (midnight wraparound).

use chrono::NaiveTime;

use super::Trigger;
use crate::time::minute_of_day;

/// Return the trigger active at `now`, or `None` when `triggers` is empty.
///
/// Picks the latest trigger whose time is at or before `now`; when every
/// trigger lies later in the day, picks the latest trigger overall.
/// Seconds of `now` are ignored. Trigger times are expected to be unique
/// (see [`Program::validate`](super::Program::validate)).
#[must_use]
pub fn resolve(now: NaiveTime, triggers: &[Trigger]) -> Option<&Trigger> {
    let now = minute_of_day(now);

    triggers
        .iter()
        .filter(|trigger| trigger.minute_of_day() <= now)
        .max_by_key(|trigger| trigger.minute_of_day())
        .or_else(|| triggers.iter().max_by_key(|trigger| trigger.minute_of_day()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::MINUTES_PER_DAY;

    fn time(hours: u32, minutes: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hours, minutes, 0).unwrap()
    }

    fn morning_evening() -> Vec<Trigger> {
        vec![
            Trigger::at(8, 0, "EffectA", 80),
            Trigger::at(18, 0, "EffectB", 40),
        ]
    }

    #[test]
    fn should_return_none_for_empty_trigger_set() {
        for minute in 0..u32::from(MINUTES_PER_DAY) {
            assert!(resolve(time(minute / 60, minute % 60), &[]).is_none());
        }
    }

    #[test]
    fn should_pick_morning_trigger_at_noon() {
        let triggers = morning_evening();
        assert_eq!(resolve(time(12, 0), &triggers).unwrap().effect, "EffectA");
    }

    #[test]
    fn should_pick_evening_trigger_at_night() {
        let triggers = morning_evening();
        assert_eq!(resolve(time(20, 0), &triggers).unwrap().effect, "EffectB");
    }

    #[test]
    fn should_wrap_around_to_previous_day_before_first_trigger() {
        let triggers = morning_evening();
        assert_eq!(resolve(time(2, 0), &triggers).unwrap().effect, "EffectB");
    }

    #[test]
    fn should_activate_trigger_exactly_at_its_time() {
        let triggers = morning_evening();
        assert_eq!(resolve(time(8, 0), &triggers).unwrap().effect, "EffectA");
        assert_eq!(resolve(time(7, 59), &triggers).unwrap().effect, "EffectB");
    }

    #[test]
    fn should_ignore_seconds_of_now() {
        let triggers = morning_evening();
        let almost_eight = NaiveTime::from_hms_opt(7, 59, 59).unwrap();
        assert_eq!(resolve(almost_eight, &triggers).unwrap().effect, "EffectB");
    }

    #[test]
    fn should_not_depend_on_trigger_order() {
        let mut triggers = morning_evening();
        triggers.reverse();
        assert_eq!(resolve(time(12, 0), &triggers).unwrap().effect, "EffectA");
        assert_eq!(resolve(time(2, 0), &triggers).unwrap().effect, "EffectB");
    }

    #[test]
    fn should_keep_single_trigger_active_all_day() {
        let triggers = vec![Trigger::at(13, 15, "Only", 50)];
        for minute in 0..u32::from(MINUTES_PER_DAY) {
            let active = resolve(time(minute / 60, minute % 60), &triggers).unwrap();
            assert_eq!(active.effect, "Only");
        }
    }

    #[test]
    fn should_pick_greatest_time_not_after_now_for_every_minute() {
        let triggers = vec![
            Trigger::at(22, 30, "Night", 10),
            Trigger::at(6, 15, "Dawn", 30),
            Trigger::at(12, 0, "Noon", 100),
            Trigger::at(0, 0, "Midnight", 5),
        ];

        for minute in 0..MINUTES_PER_DAY {
            let now = time(u32::from(minute / 60), u32::from(minute % 60));
            let active = resolve(now, &triggers).unwrap();

            let expected = triggers
                .iter()
                .map(Trigger::minute_of_day)
                .filter(|m| *m <= minute)
                .max()
                .unwrap();
            assert_eq!(active.minute_of_day(), expected, "at minute {minute}");
        }
    }

    #[test]
    fn should_wrap_to_latest_trigger_when_all_fire_later() {
        let triggers = vec![
            Trigger::at(9, 0, "Late morning", 30),
            Trigger::at(23, 0, "Late night", 10),
            Trigger::at(15, 0, "Afternoon", 60),
        ];
        for minute in 0..(9 * 60) {
            let active = resolve(time(minute / 60, minute % 60), &triggers).unwrap();
            assert_eq!(active.effect, "Late night");
        }
    }
}
