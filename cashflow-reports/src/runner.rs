//! Report runner: resolves accounts and periods, pulls entries, and dispatches
//! each definition to its report kind.

use std::sync::Arc;

use anyhow::{Context, Result};
use cashflow_core::{
    AccountResolver, Classifier, Clock, Collator, LedgerSource, Merger, PeriodDescriptor,
};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::definition::{PeriodSpec, ReportDefinition};
use crate::result::ReportResult;

/// A ledger that can both resolve account patterns and serve entries.
pub trait LedgerBackend: LedgerSource + AccountResolver {}

impl<T: LedgerSource + AccountResolver> LedgerBackend for T {}

/// Everything a report needs from the outside world. Cheap to clone and share
/// across threads; each report still builds its own collator.
#[derive(Clone)]
pub struct ReportContext {
    pub ledger: Arc<dyn LedgerBackend>,
    pub clock: Arc<dyn Clock>,
    pub timezone: Tz,
}

impl ReportContext {
    pub fn new(ledger: Arc<dyn LedgerBackend>, clock: Arc<dyn Clock>, timezone: Tz) -> Self {
        Self { ledger, clock, timezone }
    }

    /// Resolve `period` against the clock, once.
    pub fn descriptor(&self, period: &PeriodSpec) -> Result<PeriodDescriptor> {
        Ok(PeriodDescriptor::resolve(
            period.period_start,
            period.period_end,
            period.period_size,
            self.clock.as_ref(),
        )?)
    }

    /// Stream every split of `accounts` inside the collator's window into it.
    pub fn collate<C, M>(&self, report: &str, accounts: &[String], collator: &mut Collator<C, M>) -> Result<()>
    where
        C: Classifier,
        M: Merger,
    {
        let range = collator.descriptor().range();
        if range.is_empty() {
            warn!(report, start = %range.start, end = %range.end, "report window is empty");
            return Ok(());
        }

        let ids = self
            .ledger
            .resolve_accounts(accounts)
            .with_context(|| format!("resolving accounts for '{report}'"))?;
        let entries = self.ledger.get_entries(&ids, range.start, range.end)?;
        collator.store_all(&entries)?;

        info!(
            report,
            accounts = ids.len(),
            stored = collator.stored(),
            dropped = collator.dropped(),
            periods = collator.descriptor().len(),
            "report collated"
        );
        Ok(())
    }
}

pub fn run_report(definition: &ReportDefinition, ctx: &ReportContext) -> Result<ReportResult> {
    let result = match definition {
        ReportDefinition::CashFlowChart(report) => report.run(ctx),
        ReportDefinition::PeriodTotals(report) => report.run(ctx),
    };
    result.with_context(|| format!("running {} '{}'", definition.kind(), definition.name()))
}
