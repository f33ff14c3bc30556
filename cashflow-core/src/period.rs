//! Period descriptors: turn a start/end anchor pair and a period size into the
//! ordered list of bucket boundaries a report is collated into.
//!
//! Boundaries are always computed from the first boundary (`b_0 + i * interval`)
//! rather than by stepping from the previous one, so month arithmetic never
//! drifts across short months.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CollateError, Result};
use crate::time::Clock;

/// Unit of time a period is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Day,
    Week,
    Month,
}

impl FromStr for Frequency {
    type Err = CollateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(Frequency::Day),
            "week" | "weeks" => Ok(Frequency::Week),
            "month" | "months" => Ok(Frequency::Month),
            other => Err(CollateError::UnknownFrequency(other.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Day => "day",
            Frequency::Week => "week",
            Frequency::Month => "month",
        };
        f.write_str(s)
    }
}

/// Width of one bucket: `interval` units of `frequency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodSizeRepr", into = "PeriodSizeRepr")]
pub struct PeriodSize {
    frequency: Frequency,
    interval: u32,
}

/// Config form: either a preset name (`"two_week"`) or an explicit table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PeriodSizeRepr {
    Named(String),
    Explicit { frequency: Frequency, interval: u32 },
}

impl TryFrom<PeriodSizeRepr> for PeriodSize {
    type Error = CollateError;

    fn try_from(repr: PeriodSizeRepr) -> Result<Self> {
        match repr {
            PeriodSizeRepr::Named(name) => name.parse(),
            PeriodSizeRepr::Explicit { frequency, interval } => PeriodSize::new(frequency, interval),
        }
    }
}

impl From<PeriodSize> for PeriodSizeRepr {
    fn from(size: PeriodSize) -> Self {
        PeriodSizeRepr::Explicit {
            frequency: size.frequency,
            interval: size.interval,
        }
    }
}

impl PeriodSize {
    pub const DAY: PeriodSize = PeriodSize { frequency: Frequency::Day, interval: 1 };
    pub const WEEK: PeriodSize = PeriodSize { frequency: Frequency::Week, interval: 1 };
    pub const TWO_WEEK: PeriodSize = PeriodSize { frequency: Frequency::Week, interval: 2 };
    pub const MONTH: PeriodSize = PeriodSize { frequency: Frequency::Month, interval: 1 };
    pub const QUARTER: PeriodSize = PeriodSize { frequency: Frequency::Month, interval: 3 };
    pub const YEAR: PeriodSize = PeriodSize { frequency: Frequency::Month, interval: 12 };

    pub fn new(frequency: Frequency, interval: u32) -> Result<Self> {
        if interval < 1 {
            return Err(CollateError::InvalidInterval(interval));
        }
        Ok(Self { frequency, interval })
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Truncate `date` to the natural origin of this size's frequency:
    /// the day itself, the Monday of its ISO week, or the 1st of its month.
    pub fn truncate(&self, date: NaiveDate) -> NaiveDate {
        match self.frequency {
            Frequency::Day => date,
            Frequency::Week => {
                let back = date.weekday().num_days_from_monday() as u64;
                date - Days::new(back)
            }
            Frequency::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// The `n`-th boundary after `origin` (`origin` itself for `n == 0`).
    pub fn nth_after(&self, origin: NaiveDate, n: u32) -> Result<NaiveDate> {
        let steps = n
            .checked_mul(self.interval)
            .ok_or(CollateError::UnrepresentableDate(origin))?;
        let shifted = match self.frequency {
            Frequency::Day => origin.checked_add_days(Days::new(steps as u64)),
            Frequency::Week => origin.checked_add_days(Days::new(steps as u64 * 7)),
            Frequency::Month => origin.checked_add_months(Months::new(steps)),
        };
        shifted.ok_or(CollateError::UnrepresentableDate(origin))
    }

    /// Advance a boundary by exactly one period.
    pub fn advance(&self, date: NaiveDate) -> Result<NaiveDate> {
        self.nth_after(date, 1)
    }
}

impl FromStr for PeriodSize {
    type Err = CollateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(PeriodSize::DAY),
            "week" => Ok(PeriodSize::WEEK),
            "two_week" => Ok(PeriodSize::TWO_WEEK),
            "month" => Ok(PeriodSize::MONTH),
            "quarter" => Ok(PeriodSize::QUARTER),
            "year" => Ok(PeriodSize::YEAR),
            other => Err(CollateError::UnknownFrequency(other.to_string())),
        }
    }
}

impl Default for PeriodSize {
    fn default() -> Self {
        PeriodSize::MONTH
    }
}

impl fmt::Display for PeriodSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.interval, self.frequency)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn last_of_month(date: NaiveDate) -> Result<NaiveDate> {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or(CollateError::UnrepresentableDate(date))
}

fn parse_absolute(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Where a report period starts. Relative variants are resolved against a [`Clock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PeriodStart {
    Today,
    ThisMonth,
    ThisMonthYearAgo,
    StartOfYear,
    StartOfLastYear,
    LastMonth,
    Date(NaiveDate),
}

impl PeriodStart {
    pub fn resolve(&self, today: NaiveDate) -> Result<NaiveDate> {
        let overflow = CollateError::UnrepresentableDate(today);
        match self {
            PeriodStart::Today => Ok(today),
            PeriodStart::ThisMonth => Ok(first_of_month(today)),
            PeriodStart::ThisMonthYearAgo => first_of_month(today)
                .checked_sub_months(Months::new(12))
                .ok_or(overflow),
            PeriodStart::StartOfYear => NaiveDate::from_ymd_opt(today.year(), 1, 1).ok_or(overflow),
            PeriodStart::StartOfLastYear => {
                NaiveDate::from_ymd_opt(today.year() - 1, 1, 1).ok_or(overflow)
            }
            PeriodStart::LastMonth => first_of_month(today)
                .checked_sub_months(Months::new(1))
                .ok_or(overflow),
            PeriodStart::Date(date) => Ok(*date),
        }
    }
}

impl Default for PeriodStart {
    fn default() -> Self {
        PeriodStart::ThisMonthYearAgo
    }
}

impl FromStr for PeriodStart {
    type Err = CollateError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "today" => Ok(PeriodStart::Today),
            "this_month" => Ok(PeriodStart::ThisMonth),
            "this_month_year_ago" => Ok(PeriodStart::ThisMonthYearAgo),
            "start_of_year" => Ok(PeriodStart::StartOfYear),
            "start_of_last_year" => Ok(PeriodStart::StartOfLastYear),
            "last_month" => Ok(PeriodStart::LastMonth),
            other => parse_absolute(other)
                .map(PeriodStart::Date)
                .ok_or_else(|| CollateError::UnknownAnchor(other.to_string())),
        }
    }
}

impl TryFrom<String> for PeriodStart {
    type Error = CollateError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<PeriodStart> for String {
    fn from(start: PeriodStart) -> Self {
        start.to_string()
    }
}

impl fmt::Display for PeriodStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodStart::Today => f.write_str("today"),
            PeriodStart::ThisMonth => f.write_str("this_month"),
            PeriodStart::ThisMonthYearAgo => f.write_str("this_month_year_ago"),
            PeriodStart::StartOfYear => f.write_str("start_of_year"),
            PeriodStart::StartOfLastYear => f.write_str("start_of_last_year"),
            PeriodStart::LastMonth => f.write_str("last_month"),
            PeriodStart::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Where a report period ends (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PeriodEnd {
    Today,
    ThisMonth,
    LastMonth,
    EndOfYear,
    EndOfLastYear,
    Date(NaiveDate),
}

impl PeriodEnd {
    pub fn resolve(&self, today: NaiveDate) -> Result<NaiveDate> {
        let overflow = CollateError::UnrepresentableDate(today);
        match self {
            PeriodEnd::Today => Ok(today),
            PeriodEnd::ThisMonth => last_of_month(today),
            PeriodEnd::LastMonth => first_of_month(today).pred_opt().ok_or(overflow),
            PeriodEnd::EndOfYear => NaiveDate::from_ymd_opt(today.year(), 12, 31).ok_or(overflow),
            PeriodEnd::EndOfLastYear => {
                NaiveDate::from_ymd_opt(today.year() - 1, 12, 31).ok_or(overflow)
            }
            PeriodEnd::Date(date) => Ok(*date),
        }
    }
}

impl Default for PeriodEnd {
    fn default() -> Self {
        PeriodEnd::ThisMonth
    }
}

impl FromStr for PeriodEnd {
    type Err = CollateError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "today" => Ok(PeriodEnd::Today),
            "this_month" => Ok(PeriodEnd::ThisMonth),
            "last_month" => Ok(PeriodEnd::LastMonth),
            "end_of_year" => Ok(PeriodEnd::EndOfYear),
            "end_of_last_year" => Ok(PeriodEnd::EndOfLastYear),
            other => parse_absolute(other)
                .map(PeriodEnd::Date)
                .ok_or_else(|| CollateError::UnknownAnchor(other.to_string())),
        }
    }
}

impl TryFrom<String> for PeriodEnd {
    type Error = CollateError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<PeriodEnd> for String {
    fn from(end: PeriodEnd) -> Self {
        end.to_string()
    }
}

impl fmt::Display for PeriodEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodEnd::Today => f.write_str("today"),
            PeriodEnd::ThisMonth => f.write_str("this_month"),
            PeriodEnd::LastMonth => f.write_str("last_month"),
            PeriodEnd::EndOfYear => f.write_str("end_of_year"),
            PeriodEnd::EndOfLastYear => f.write_str("end_of_last_year"),
            PeriodEnd::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Concrete, inclusive date window. `start > end` is allowed and means "no periods".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A resolved range plus the ordered bucket boundaries covering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodDescriptor {
    range: PeriodRange,
    size: PeriodSize,
    boundaries: Vec<NaiveDate>,
}

impl PeriodDescriptor {
    pub fn new(range: PeriodRange, size: PeriodSize) -> Result<Self> {
        let mut boundaries = Vec::new();
        if !range.is_empty() {
            let origin = size.truncate(range.start);
            let mut n = 0;
            loop {
                let boundary = size.nth_after(origin, n)?;
                if boundary > range.end {
                    break;
                }
                boundaries.push(boundary);
                n += 1;
            }
        }

        debug!(
            start = %range.start,
            end = %range.end,
            size = %size,
            periods = boundaries.len(),
            "resolved period descriptor"
        );

        Ok(Self { range, size, boundaries })
    }

    /// Resolve relative anchors against `clock` once and build the descriptor.
    pub fn resolve(
        start: PeriodStart,
        end: PeriodEnd,
        size: PeriodSize,
        clock: &dyn Clock,
    ) -> Result<Self> {
        let today = clock.today();
        let range = PeriodRange::new(start.resolve(today)?, end.resolve(today)?);
        Self::new(range, size)
    }

    pub fn range(&self) -> PeriodRange {
        self.range
    }

    pub fn size(&self) -> PeriodSize {
        self.size
    }

    pub fn boundaries(&self) -> &[NaiveDate] {
        &self.boundaries
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Inclusive last day of the period starting at `key`.
    pub fn period_end(&self, key: NaiveDate) -> Result<NaiveDate> {
        self.size
            .advance(key)?
            .pred_opt()
            .ok_or(CollateError::UnrepresentableDate(key))
    }
}
