use chrono::{
    DateTime, Datelike, FixedOffset, Local, LocalResult, NaiveDate, NaiveTime, TimeDelta,
    TimeZone,
};

/// Source of "now" and of the calendar boundaries date-relative rules use.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Local midnight starting the day that contains `now`.
    fn day_start(&self, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        start_of_day(now)
    }

    /// Local midnight starting the month that contains `now`.
    fn month_start(&self, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        start_of_month(now)
    }
}

/// Wall-clock time in the local timezone.
///
/// Boundaries are resolved against the timezone's rules for that date, so a
/// daylight-saving change between midnight and now is accounted for.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn day_start(&self, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let date = now.with_timezone(&Local).date_naive();
        midnight_in(&Local, date).unwrap_or_else(|| start_of_day(now))
    }

    fn month_start(&self, now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let local = now.with_timezone(&Local).date_naive();
        local
            .with_day(1)
            .and_then(|first| midnight_in(&Local, first))
            .unwrap_or_else(|| start_of_month(now))
    }
}

/// A clock stopped at one instant, with calendar boundaries in that
/// instant's fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    pub const fn new(now: DateTime<FixedOffset>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Midnight at the start of `now`'s day, in `now`'s offset.
pub fn start_of_day(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    now - now.time().signed_duration_since(NaiveTime::MIN)
}

/// Midnight on the first day of `now`'s month, in `now`'s offset.
pub fn start_of_month(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    start_of_day(now) - TimeDelta::days(i64::from(now.day0()))
}

/// First instant of `date` in `tz`.
///
/// When midnight falls in a daylight-saving gap the day starts at the first
/// valid local time after it.
fn midnight_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<FixedOffset>> {
    let midnight = date.and_time(NaiveTime::MIN);
    let first = match tz.from_local_datetime(&midnight) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => t,
        LocalResult::None => (1..=4)
            .map(|h| tz.from_local_datetime(&(midnight + TimeDelta::hours(h))))
            .find_map(LocalResult::earliest)?,
    };
    Some(first.fixed_offset())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    /// Runs `f` with `TZ` set to a POSIX rule string (no tzdata needed).
    fn in_tz<T>(tz: &str, f: impl FnOnce() -> T) -> T {
        let original = std::env::var("TZ").ok();
        unsafe { std::env::set_var("TZ", tz) };
        let result = f();
        match original {
            Some(v) => unsafe { std::env::set_var("TZ", v) },
            None => unsafe { std::env::remove_var("TZ") },
        }
        result
    }

    const PARIS: &str = "CET-1CEST,M3.5.0,M10.5.0/3";

    #[test]
    fn test_start_of_day_keeps_offset() {
        let now = at("2025-09-15T18:42:07.250+02:00");
        assert_eq!(start_of_day(now), at("2025-09-15T00:00:00+02:00"));
    }

    #[test]
    fn test_start_of_day_at_midnight_is_identity() {
        let now = at("2025-09-15T00:00:00-05:00");
        assert_eq!(start_of_day(now), now);
    }

    #[test]
    fn test_start_of_month() {
        assert_eq!(
            start_of_month(at("2025-09-15T18:00:00+00:00")),
            at("2025-09-01T00:00:00+00:00")
        );
        assert_eq!(
            start_of_month(at("2025-03-01T06:00:00+01:00")),
            at("2025-03-01T00:00:00+01:00")
        );
    }

    #[test]
    fn test_fixed_clock_uses_its_offset() {
        let clock = FixedClock::new(at("2025-09-15T18:30:00+02:00"));
        assert_eq!(clock.day_start(clock.now()), at("2025-09-15T00:00:00+02:00"));
        assert_eq!(clock.month_start(clock.now()), at("2025-09-01T00:00:00+02:00"));
    }

    #[test]
    fn test_midnight_in_fixed_offset() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        assert_eq!(midnight_in(&tz, date), Some(at("2025-03-30T00:00:00+01:00")));
    }

    #[test]
    #[serial]
    fn test_system_day_start_across_spring_forward() {
        // Clocks go from +01:00 to +02:00 at 02:00 on 2025-03-30.
        let start = in_tz(PARIS, || {
            SystemClock.day_start(at("2025-03-30T12:00:00+02:00"))
        });
        assert_eq!(start, at("2025-03-30T00:00:00+01:00"));
    }

    #[test]
    #[serial]
    fn test_system_month_start_after_fall_back() {
        // October started in summer time even though now is winter time.
        let start = in_tz(PARIS, || {
            SystemClock.month_start(at("2025-10-28T12:00:00+01:00"))
        });
        assert_eq!(start, at("2025-10-01T00:00:00+02:00"));
    }

    #[test]
    #[serial]
    fn test_system_day_start_on_ordinary_day() {
        let start = in_tz(PARIS, || {
            SystemClock.day_start(at("2025-09-15T18:30:00+02:00"))
        });
        assert_eq!(start, at("2025-09-15T00:00:00+02:00"));
    }
}
