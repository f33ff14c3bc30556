//! Signed activity totals per period for a set of accounts.

use anyhow::Result;
use cashflow_core::{Collator, time_series};

use crate::definition::PeriodTotals;
use crate::result::{ReportData, ReportResult, TotalsData};
use crate::runner::ReportContext;

impl PeriodTotals {
    pub fn run(&self, ctx: &ReportContext) -> Result<ReportResult> {
        let mut collator = Collator::totals(ctx.descriptor(&self.period)?)?;
        ctx.collate(&self.name, &self.accounts, &mut collator)?;

        let totals = time_series(collator.into_buckets().into_vec(), ctx.timezone)?;

        Ok(ReportResult {
            name: self.name.clone(),
            report_type: "period_totals".to_string(),
            data: ReportData::Totals(TotalsData { totals }),
        })
    }
}
