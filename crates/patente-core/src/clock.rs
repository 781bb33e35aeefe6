//! Clock abstraction for the date pivot and record timestamps.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Zone the patrol works in; timestamps and shift days are Rome wall-clock time.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Rome;

/// Source of the current date and time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current local date and time.
    fn now(&self) -> NaiveDateTime;

    /// Current local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Last two digits of the current year.
    fn pivot_year(&self) -> u32 {
        self.today().year().rem_euclid(100) as u32
    }
}

/// Reads the host clock and converts it to wall-clock time in a fixed
/// zone, whatever zone the host runs in.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Wall-clock time of `instant` in this clock's zone.
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        self.local_time(Utc::now())
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Frozen at midnight of the given day.
    ///
    /// Returns `None` for an invalid calendar date.
    pub fn on(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
