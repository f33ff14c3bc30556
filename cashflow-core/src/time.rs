//! Time utilities: an injectable "today" and timezone-aware epoch conversion.

use chrono::{Duration, Local, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{CollateError, Result};

/// Source of the current calendar date.
///
/// Relative period anchors are resolved against this exactly once per report,
/// so tests can pin it with [`FixedClock`].
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock date in the machine's local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock that always reports the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CollateError::InvalidTimezone(name.to_string()))
}

/// Seconds since the Unix epoch of local midnight at the start of `date` in `tz`.
///
/// When midnight does not exist (a DST gap at 00:00), the first instant after the
/// gap is used; when it is ambiguous the earlier instant wins.
pub fn epoch_seconds(date: NaiveDate, tz: Tz) -> Result<i64> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.timestamp())
        .ok_or(CollateError::UnrepresentableDate(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_epoch_seconds_utc() {
        let tz = parse_timezone("UTC").unwrap();
        assert_eq!(epoch_seconds(ymd(2023, 1, 1), tz).unwrap(), 1_672_531_200);
    }

    #[test]
    fn test_epoch_seconds_chicago() {
        // January is CST (UTC-6)
        let tz = parse_timezone("America/Chicago").unwrap();
        assert_eq!(
            epoch_seconds(ymd(2023, 1, 1), tz).unwrap(),
            1_672_531_200 + 6 * 3600
        );
    }

    #[test]
    fn test_invalid_timezone() {
        let err = parse_timezone("Mars/Olympus").unwrap_err();
        assert_eq!(err, CollateError::InvalidTimezone("Mars/Olympus".into()));
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(ymd(2024, 2, 29));
        assert_eq!(clock.today(), ymd(2024, 2, 29));
    }
}
