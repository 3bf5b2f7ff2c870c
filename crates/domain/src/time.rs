//! Local wall-clock helpers.
//!
//! Schedules are expressed in the user's local time, so everything here works
//! with naive (zone-less) local values rather than UTC timestamps.

use chrono::{Local, NaiveDateTime, NaiveTime, Timelike};

/// Number of minutes in a day; valid minute-of-day values are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Return the current local date and time.
#[must_use]
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Minutes elapsed since midnight, ignoring seconds.
#[must_use]
pub fn minute_of_day(time: NaiveTime) -> u16 {
    // hour() < 24 and minute() < 60, so the result always fits.
    #[allow(clippy::cast_possible_truncation)]
    let minutes = (time.hour() * 60 + time.minute()) as u16;
    minutes
}

/// Whether `hours:minutes` names a valid time of day.
#[must_use]
pub fn is_valid_time(hours: u8, minutes: u8) -> bool {
    hours < 24 && minutes < 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_local_time() {
        let before = Local::now().naive_local();
        let ts = now();
        let after = Local::now().naive_local();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_ignore_seconds_in_minute_of_day() {
        let time = NaiveTime::from_hms_opt(13, 45, 59).unwrap();
        assert_eq!(minute_of_day(time), 13 * 60 + 45);
    }

    #[test]
    fn should_map_last_minute_of_day() {
        let time = NaiveTime::from_hms_opt(23, 59, 0).unwrap();
        assert_eq!(minute_of_day(time), MINUTES_PER_DAY - 1);
    }

    #[test]
    fn should_validate_time_bounds() {
        assert!(is_valid_time(0, 0));
        assert!(is_valid_time(23, 59));
        assert!(!is_valid_time(24, 0));
        assert!(!is_valid_time(12, 60));
    }
}
