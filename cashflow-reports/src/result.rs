//! Serializable report results, the shape written to page JSON files.

use cashflow_core::{CashFlowSeries, TimePoint};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResult {
    pub name: String,
    #[serde(rename = "type")]
    pub report_type: String,
    pub data: ReportData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportData {
    CashFlow(CashFlowData),
    Totals(TotalsData),
}

/// Chart data for a cash flow report. `gross` mirrors `net` for older chart pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowData {
    pub credits: Vec<TimePoint>,
    pub debits: Vec<TimePoint>,
    pub net: Vec<TimePoint>,
    pub gross: Vec<TimePoint>,
}

impl From<CashFlowSeries> for CashFlowData {
    fn from(series: CashFlowSeries) -> Self {
        Self {
            credits: series.credits,
            debits: series.debits,
            gross: series.net.clone(),
            net: series.net,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsData {
    pub totals: Vec<TimePoint>,
}
