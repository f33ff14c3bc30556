//! Collator: streams ledger entries into pre-populated period buckets.
//!
//! Lifecycle:
//! - `Building`: `store_value` accepted.
//! - `Sealed`: entered on the first read (`buckets`, `extract_series`) or an
//!   explicit `seal`. Any later `store_value` fails with `CollateError::Sealed`.
//!
//! Entries whose date lies outside the resolved window are dropped and counted,
//! never reported as errors. Upstream sources may hand over boundary stragglers.

use tracing::{debug, trace};

use crate::bucket::BucketContainer;
use crate::error::{CollateError, Result};
use crate::ledger::LedgerEntry;
use crate::period::PeriodDescriptor;
use crate::policy::{Classifier, CreditDebitStore, DebitCreditSplit, Merger, SummationStore, TotalAmount};
use crate::series::PeriodFlow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollatorState {
    Building,
    Sealed,
}

#[derive(Debug)]
pub struct Collator<C, M: Merger> {
    descriptor: PeriodDescriptor,
    container: BucketContainer<M::Value>,
    classifier: C,
    merger: M,
    state: CollatorState,
    stored: usize,
    dropped: usize,
}

impl Collator<DebitCreditSplit, CreditDebitStore> {
    /// Inflow/outflow collation used by cash flow charts.
    pub fn cash_flow(descriptor: PeriodDescriptor) -> Result<Self> {
        Self::new(descriptor, DebitCreditSplit, CreditDebitStore)
    }
}

impl Collator<TotalAmount, SummationStore> {
    /// Signed total per period.
    pub fn totals(descriptor: PeriodDescriptor) -> Result<Self> {
        Self::new(descriptor, TotalAmount, SummationStore)
    }
}

impl<C: Classifier, M: Merger> Collator<C, M> {
    pub fn new(descriptor: PeriodDescriptor, classifier: C, merger: M) -> Result<Self> {
        let container = BucketContainer::from_descriptor(&descriptor)?;
        debug!(buckets = container.len(), "collator ready");
        Ok(Self {
            descriptor,
            container,
            classifier,
            merger,
            state: CollatorState::Building,
            stored: 0,
            dropped: 0,
        })
    }

    /// Classify `entry` and merge it into its bucket.
    ///
    /// Returns `Ok(false)` when the entry falls outside the report window.
    pub fn store_value(&mut self, entry: &LedgerEntry) -> Result<bool> {
        if self.state == CollatorState::Sealed {
            return Err(CollateError::Sealed);
        }

        let date = entry.posted_date;
        let key = match self.container.bucket_for(date) {
            Ok(key) if self.descriptor.range().contains(date) => key,
            Ok(_) | Err(CollateError::OutOfRange(_)) => {
                trace!(account = %entry.account_id, %date, "entry outside report window");
                self.dropped += 1;
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        // classify fully before touching the container
        let contributions = self.classifier.classify(entry);
        self.container.merge(&self.merger, key, &contributions)?;
        self.stored += 1;
        Ok(true)
    }

    pub fn store_all<'a, I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        for entry in entries {
            self.store_value(entry)?;
        }
        Ok(())
    }

    pub fn seal(&mut self) {
        if self.state == CollatorState::Building {
            debug!(
                stored = self.stored,
                dropped = self.dropped,
                buckets = self.container.len(),
                "collator sealed"
            );
            self.state = CollatorState::Sealed;
        }
    }

    pub fn state(&self) -> CollatorState {
        self.state
    }

    pub fn descriptor(&self) -> &PeriodDescriptor {
        &self.descriptor
    }

    /// Entries merged so far.
    pub fn stored(&self) -> usize {
        self.stored
    }

    /// Entries skipped because they fell outside the report window.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Read the aggregated buckets. Seals the collator.
    pub fn buckets(&mut self) -> &BucketContainer<M::Value> {
        self.seal();
        &self.container
    }

    pub fn into_buckets(mut self) -> BucketContainer<M::Value> {
        self.seal();
        self.container
    }
}

impl<C: Classifier> Collator<C, CreditDebitStore> {
    /// Ascending `{period_start, credit, debit, net}` rows. Seals the collator.
    pub fn extract_series(&mut self) -> Vec<PeriodFlow> {
        self.buckets()
            .iter()
            .map(|(period_start, value)| PeriodFlow::new(period_start, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{PeriodRange, PeriodSize};
    use crate::policy::BucketValue;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn q1() -> PeriodDescriptor {
        PeriodDescriptor::new(PeriodRange::new(ymd(2023, 1, 1), ymd(2023, 3, 31)), PeriodSize::MONTH)
            .unwrap()
    }

    fn entry(date: NaiveDate, amount: Decimal) -> LedgerEntry {
        LedgerEntry::new("Assets.Checking", date, amount)
    }

    #[test]
    fn test_february_credit() {
        let mut c = Collator::cash_flow(q1()).unwrap();
        assert!(c.store_value(&entry(ymd(2023, 2, 15), dec!(100))).unwrap());

        let series = c.extract_series();
        let keys: Vec<_> = series.iter().map(|f| f.period_start).collect();
        assert_eq!(keys, vec![ymd(2023, 1, 1), ymd(2023, 2, 1), ymd(2023, 3, 1)]);
        assert_eq!(series[1].credit, dec!(100));
        assert_eq!(series[1].debit, Decimal::ZERO);
        assert_eq!(series[1].net, dec!(100));
    }

    #[test]
    fn test_zero_activity_buckets_present() {
        let mut c = Collator::cash_flow(q1()).unwrap();
        c.store_value(&entry(ymd(2023, 3, 9), dec!(-20))).unwrap();

        let series = c.extract_series();
        assert_eq!(series.len(), 3);
        for flow in &series[..2] {
            assert_eq!((flow.credit, flow.debit, flow.net), (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        }
        assert_eq!(series[2].debit, dec!(-20));
        assert_eq!(series[2].net, dec!(-20));
    }

    #[test]
    fn test_out_of_window_entries_dropped() {
        let mut c = Collator::cash_flow(q1()).unwrap();
        assert!(!c.store_value(&entry(ymd(2022, 12, 31), dec!(5))).unwrap());
        assert!(!c.store_value(&entry(ymd(2023, 4, 1), dec!(5))).unwrap());
        assert!(c.store_value(&entry(ymd(2023, 3, 31), dec!(5))).unwrap());
        assert_eq!(c.dropped(), 2);
        assert_eq!(c.stored(), 1);

        let total: Decimal = c.extract_series().iter().map(|f| f.net).sum();
        assert_eq!(total, dec!(5));
    }

    #[test]
    fn test_mid_period_bounds_are_respected() {
        // buckets start on the 1st, but the window starts on the 15th
        let d = PeriodDescriptor::new(
            PeriodRange::new(ymd(2023, 1, 15), ymd(2023, 2, 10)),
            PeriodSize::MONTH,
        )
        .unwrap();
        let mut c = Collator::cash_flow(d).unwrap();
        assert!(!c.store_value(&entry(ymd(2023, 1, 3), dec!(1))).unwrap());
        assert!(!c.store_value(&entry(ymd(2023, 2, 20), dec!(1))).unwrap());
        assert!(c.store_value(&entry(ymd(2023, 1, 20), dec!(1))).unwrap());
        assert_eq!(c.dropped(), 2);
    }

    #[test]
    fn test_order_does_not_matter() {
        let entries = vec![
            entry(ymd(2023, 1, 5), dec!(12.34)),
            entry(ymd(2023, 3, 2), dec!(-7.10)),
            entry(ymd(2023, 1, 31), dec!(-0.04)),
            entry(ymd(2023, 2, 28), dec!(99.99)),
            entry(ymd(2023, 2, 1), dec!(-50)),
        ];

        let mut forward = Collator::cash_flow(q1()).unwrap();
        forward.store_all(&entries).unwrap();

        let mut backward = Collator::cash_flow(q1()).unwrap();
        backward.store_all(entries.iter().rev()).unwrap();

        let mut rotated = Collator::cash_flow(q1()).unwrap();
        rotated.store_all(entries[2..].iter().chain(&entries[..2])).unwrap();

        let expected = forward.extract_series();
        assert_eq!(backward.extract_series(), expected);
        assert_eq!(rotated.extract_series(), expected);
        assert_eq!(expected[0].credit, dec!(12.34));
        assert_eq!(expected[0].debit, dec!(-0.04));
    }

    #[test]
    fn test_sealed_rejects_store() {
        let mut c = Collator::cash_flow(q1()).unwrap();
        c.store_value(&entry(ymd(2023, 1, 2), dec!(3))).unwrap();
        let before = c.extract_series();
        assert_eq!(c.state(), CollatorState::Sealed);

        let err = c.store_value(&entry(ymd(2023, 1, 2), dec!(3))).unwrap_err();
        assert_eq!(err, CollateError::Sealed);
        assert_eq!(c.extract_series(), before);
    }

    #[test]
    fn test_empty_range() {
        let d = PeriodDescriptor::new(PeriodRange::new(ymd(2023, 4, 1), ymd(2023, 3, 1)), PeriodSize::MONTH)
            .unwrap();
        let mut c = Collator::cash_flow(d).unwrap();
        assert!(!c.store_value(&entry(ymd(2023, 3, 15), dec!(1))).unwrap());
        assert!(c.extract_series().is_empty());
    }

    #[test]
    fn test_totals_collator() {
        let mut c = Collator::totals(q1()).unwrap();
        c.store_value(&entry(ymd(2023, 2, 3), dec!(40))).unwrap();
        c.store_value(&entry(ymd(2023, 2, 4), dec!(-15.5))).unwrap();
        let buckets = c.into_buckets();
        assert_eq!(buckets.get(ymd(2023, 2, 1)), Some(&dec!(24.5)));
        assert_eq!(buckets.get(ymd(2023, 1, 1)), Some(&Decimal::ZERO));
    }

    #[test]
    fn test_mismatched_policy_is_fatal_and_atomic() {
        let mut c = Collator::new(q1(), TotalAmount, CreditDebitStore).unwrap();
        let err = c.store_value(&entry(ymd(2023, 1, 9), dec!(1))).unwrap_err();
        assert!(matches!(err, CollateError::UnknownRole { .. }));
        assert_eq!(c.stored(), 0);
        assert_eq!(c.buckets().get(ymd(2023, 1, 1)), Some(&BucketValue::default()));
    }
}
