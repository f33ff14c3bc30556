//! Series extraction: bucket contents → chart-ready time series.

use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::BucketValue;
use crate::time::epoch_seconds;

/// One collated period of a cash flow report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFlow {
    pub period_start: NaiveDate,
    pub credit: Decimal,
    pub debit: Decimal,
    /// `credit + debit`
    pub net: Decimal,
}

impl PeriodFlow {
    pub fn new(period_start: NaiveDate, value: &BucketValue) -> Self {
        Self {
            period_start,
            credit: value.credit,
            debit: value.debit,
            net: value.net(),
        }
    }
}

/// A chart point: epoch seconds of the period start and its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

/// Convert `(period_start, value)` pairs into points sorted ascending by date.
pub fn time_series<I>(points: I, tz: Tz) -> Result<Vec<TimePoint>>
where
    I: IntoIterator<Item = (NaiveDate, Decimal)>,
{
    let mut out = points
        .into_iter()
        .map(|(date, value)| {
            Ok(TimePoint {
                date: epoch_seconds(date, tz)?,
                value,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    out.sort_by_key(|p| p.date);
    Ok(out)
}

/// Credits, debits and net flow as three parallel, date-sorted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSeries {
    pub credits: Vec<TimePoint>,
    pub debits: Vec<TimePoint>,
    pub net: Vec<TimePoint>,
}

impl CashFlowSeries {
    pub fn from_flows(flows: &[PeriodFlow], tz: Tz) -> Result<Self> {
        Ok(Self {
            credits: time_series(flows.iter().map(|f| (f.period_start, f.credit)), tz)?,
            debits: time_series(flows.iter().map(|f| (f.period_start, f.debit)), tz)?,
            net: time_series(flows.iter().map(|f| (f.period_start, f.net)), tz)?,
        })
    }
}
