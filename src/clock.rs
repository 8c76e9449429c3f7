//! Wall-clock formatting, greetings and the birthday countdown.
//!
//! Everything is expressed in the display zone (UTC+05:30) regardless of the
//! host's local zone. Functions take `now` explicitly so they can be tested
//! against fixed instants.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Timelike, Utc};

use crate::constants::{DISPLAY_UTC_OFFSET_SECS, DISPLAY_ZONE_LABEL};

/// Source of wall-clock time.
pub trait WallClock: std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl WallClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn display_zone() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn in_display_zone(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    now.with_timezone(&display_zone())
}

/// `"04:05 PM"`
pub fn format_time(now: DateTime<Utc>) -> String {
    in_display_zone(now).format("%I:%M %p").to_string()
}

/// `"04:05 PM IST"`
pub fn format_time_with_zone(now: DateTime<Utc>) -> String {
    format!("{} {DISPLAY_ZONE_LABEL}", format_time(now))
}

/// `"Friday, October 16, 2026"`
pub fn format_date(now: DateTime<Utc>) -> String {
    in_display_zone(now).format("%A, %B %-d, %Y").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    pub fn for_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 17 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    pub fn salutation(self) -> &'static str {
        match self {
            Self::Morning => "Good morning",
            Self::Afternoon => "Good afternoon",
            Self::Evening => "Good evening",
        }
    }
}

pub fn greeting(now: DateTime<Utc>, name: &str) -> String {
    let part = DayPart::for_hour(in_display_zone(now).hour());
    format!("{}, {name}", part.salutation())
}

/// Time left until the next birthday midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    /// Whole days rounded up, as shown in "N days until your birthday".
    pub total_days: i64,
}

impl Countdown {
    pub fn label(&self) -> String {
        format!("{}d {}h {}m", self.days, self.hours, self.minutes)
    }
}

/// Midnight of `month`/`day` of `year` in the display zone. February 29 rolls
/// over to March 1 in common years.
fn birthday_midnight(year: i32, month: u32, day: u32) -> Option<DateTime<FixedOffset>> {
    let date = match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None if month == 2 && day == 29 => NaiveDate::from_ymd_opt(year, 2, 28)?.succ_opt()?,
        None => return None,
    };
    display_zone()
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .single()
}

/// Countdown to the next occurrence of `month`/`day` (1-based month).
///
/// Once this year's date has passed, next year's is used. An impossible date
/// yields a zero countdown.
pub fn countdown_to(month: u32, day: u32, now: DateTime<Utc>) -> Countdown {
    let local = in_display_zone(now);
    let Some(this_year) = birthday_midnight(local.year(), month, day) else {
        return Countdown::default();
    };
    let target = if local > this_year {
        match birthday_midnight(this_year.year() + 1, month, day) {
            Some(next) => next,
            None => return Countdown::default(),
        }
    } else {
        this_year
    };

    let diff_ms = (target.with_timezone(&Utc) - now).num_milliseconds().max(0);
    let total_mins = diff_ms / 60_000;
    Countdown {
        days: total_mins / (60 * 24),
        hours: (total_mins % (60 * 24)) / 60,
        minutes: total_mins % 60,
        total_days: (diff_ms + 86_400_000 - 1) / 86_400_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ist(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        display_zone()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("valid date")
            .with_timezone(&Utc)
    }

    #[test]
    fn formats_in_display_zone() {
        let now = ist(2026, 10, 16, 16, 5);
        assert_eq!(format_time(now), "04:05 PM");
        assert_eq!(format_time_with_zone(now), "04:05 PM IST");
        assert_eq!(format_date(now), "Friday, October 16, 2026");
    }

    #[test]
    fn greeting_boundaries() {
        assert_eq!(greeting(ist(2026, 1, 1, 11, 59), "Sam"), "Good morning, Sam");
        assert_eq!(greeting(ist(2026, 1, 1, 12, 0), "Sam"), "Good afternoon, Sam");
        assert_eq!(greeting(ist(2026, 1, 1, 16, 59), "Sam"), "Good afternoon, Sam");
        assert_eq!(greeting(ist(2026, 1, 1, 17, 0), "Sam"), "Good evening, Sam");
    }

    #[test]
    fn countdown_within_year() {
        let c = countdown_to(10, 16, ist(2026, 10, 14, 22, 30));
        assert_eq!(
            c,
            Countdown {
                days: 1,
                hours: 1,
                minutes: 30,
                total_days: 2
            }
        );
        assert_eq!(c.label(), "1d 1h 30m");
    }

    #[test]
    fn countdown_rolls_to_next_year_after_midnight() {
        let c = countdown_to(10, 16, ist(2026, 10, 16, 0, 1));
        assert_eq!(c.days, 364);
        assert_eq!(c.total_days, 365);
    }

    #[test]
    fn countdown_at_exact_midnight_is_zero() {
        assert_eq!(
            countdown_to(10, 16, ist(2026, 10, 16, 0, 0)),
            Countdown::default()
        );
    }

    #[test]
    fn impossible_date_is_zero() {
        assert_eq!(countdown_to(2, 30, ist(2026, 1, 1, 0, 0)), Countdown::default());
    }

    #[test]
    fn leap_day_rolls_to_march_first_in_common_years() {
        let c = countdown_to(2, 29, ist(2026, 2, 27, 0, 0));
        assert_eq!((c.days, c.total_days), (2, 2));

        // past this year's Mar 1, so 2027-03-01
        let c = countdown_to(2, 29, ist(2026, 3, 2, 0, 0));
        assert_eq!(c.days, 364);
    }

    #[test]
    fn leap_day_is_kept_in_leap_years() {
        let c = countdown_to(2, 29, ist(2028, 2, 27, 0, 0));
        assert_eq!(c.days, 2);
        let c = countdown_to(2, 29, ist(2028, 3, 1, 0, 0));
        // 2029-03-01
        assert_eq!(c.days, 365);
    }
}
