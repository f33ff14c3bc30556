//! Cash flow chart for a set of accounts and their children: per-period
//! credits (inflow), debits (outflow, negative) and net flow.

use anyhow::Result;
use cashflow_core::{CashFlowSeries, Collator};

use crate::definition::CashFlowChart;
use crate::result::{CashFlowData, ReportData, ReportResult};
use crate::runner::ReportContext;

impl CashFlowChart {
    pub fn run(&self, ctx: &ReportContext) -> Result<ReportResult> {
        let mut collator = Collator::cash_flow(ctx.descriptor(&self.period)?)?;
        ctx.collate(&self.name, &self.accounts, &mut collator)?;

        let flows = collator.extract_series();
        let series = CashFlowSeries::from_flows(&flows, ctx.timezone)?;

        Ok(ReportResult {
            name: self.name.clone(),
            report_type: "cash_flow_chart".to_string(),
            data: ReportData::CashFlow(CashFlowData::from(series)),
        })
    }
}
