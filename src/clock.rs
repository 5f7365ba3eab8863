//! Time source for the gamification engine
//!
//! Streaks and quest cycles work on calendar days, badge unlocks and battles
//! on wall-clock timestamps. Both come from a [`Clock`] so tests can pin them.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Source of "now" and "today"
pub trait Clock {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day
    fn today(&self) -> NaiveDate;
}

/// Wall clock; calendar days follow the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock. Clones share the same instant, so a test can keep
/// one handle and move time while the engine owns another.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Clock set to noon UTC of the given day
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(noon_utc(date))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.now.set(noon_utc(date));
    }

    pub fn advance_days(&self, days: u64) {
        let current = self.now.get();
        self.now
            .set(current.checked_add_days(Days::new(days)).unwrap_or(current));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn today(&self) -> NaiveDate {
        self.now.get().date_naive()
    }
}

fn noon_utc(date: NaiveDate) -> DateTime<Utc> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&date.and_time(noon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_shared_between_clones() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let clock = FixedClock::at_date(date);
        let handle = clock.clone();

        handle.advance_days(1);

        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 11).unwrap());
        assert_eq!(handle.today(), clock.today());
        assert_eq!(clock.now(), handle.now());
    }

    #[test]
    fn test_advance_crosses_month_boundary() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        clock.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }
}
