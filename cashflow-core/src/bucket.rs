//! BucketContainer: ordered, pre-populated storage of per-period accumulators.
//!
//! Design:
//! - Keys are bucket start dates kept in a sorted `Vec`, so iteration order is
//!   always chronological and lookup is a binary search.
//! - Every key is created up front with a zero value; merging never creates
//!   buckets, which keeps empty periods visible in the output.
//! - The container covers `[first key, period end of last key]`.

use chrono::NaiveDate;

use crate::error::{CollateError, Result};
use crate::period::{PeriodDescriptor, PeriodSize};
use crate::policy::{Contribution, Merger};

#[derive(Debug, Clone, PartialEq)]
pub struct BucketContainer<V> {
    buckets: Vec<(NaiveDate, V)>,
    // inclusive last day covered by the final bucket
    coverage_end: Option<NaiveDate>,
}

impl<V: Default + Clone> BucketContainer<V> {
    /// Create one zero-valued bucket per key. Keys are sorted and deduplicated.
    pub fn create(keys: impl IntoIterator<Item = NaiveDate>, size: PeriodSize) -> Result<Self> {
        let mut keys: Vec<NaiveDate> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();

        let coverage_end = match keys.last() {
            Some(&last) => Some(
                size.advance(last)?
                    .pred_opt()
                    .ok_or(CollateError::UnrepresentableDate(last))?,
            ),
            None => None,
        };

        Ok(Self {
            buckets: keys.into_iter().map(|k| (k, V::default())).collect(),
            coverage_end,
        })
    }

    pub fn from_descriptor(descriptor: &PeriodDescriptor) -> Result<Self> {
        Self::create(descriptor.boundaries().iter().copied(), descriptor.size())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Key of the bucket whose period contains `date`.
    pub fn bucket_for(&self, date: NaiveDate) -> Result<NaiveDate> {
        let idx = self.buckets.partition_point(|(key, _)| *key <= date);
        if idx == 0 {
            return Err(CollateError::OutOfRange(date));
        }
        match self.coverage_end {
            Some(end) if date <= end => Ok(self.buckets[idx - 1].0),
            _ => Err(CollateError::OutOfRange(date)),
        }
    }

    pub fn get(&self, key: NaiveDate) -> Option<&V> {
        self.position(key).map(|i| &self.buckets[i].1)
    }

    /// Fold every contribution into the bucket at `key`.
    ///
    /// All-or-nothing: contributions are applied to a copy that replaces the
    /// stored value only if every merge succeeds.
    pub fn merge<M>(&mut self, merger: &M, key: NaiveDate, contributions: &[Contribution]) -> Result<()>
    where
        M: Merger<Value = V>,
    {
        let idx = self.position(key).ok_or(CollateError::UnknownBucket(key))?;
        let mut staged = self.buckets[idx].1.clone();
        for contribution in contributions {
            merger.merge(&mut staged, contribution)?;
        }
        self.buckets[idx].1 = staged;
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.iter().map(|(key, _)| *key)
    }

    /// Buckets in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &V)> + '_ {
        self.buckets.iter().map(|(key, value)| (*key, value))
    }

    pub fn into_vec(self) -> Vec<(NaiveDate, V)> {
        self.buckets
    }

    fn position(&self, key: NaiveDate) -> Option<usize> {
        self.buckets.binary_search_by_key(&key, |(k, _)| *k).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{BucketValue, CreditDebitStore, Role};
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly() -> BucketContainer<BucketValue> {
        BucketContainer::create(
            [ymd(2023, 3, 1), ymd(2023, 1, 1), ymd(2023, 2, 1)],
            PeriodSize::MONTH,
        )
        .unwrap()
    }

    #[test]
    fn test_create_orders_keys_and_zeroes() {
        let c = monthly();
        let keys: Vec<_> = c.keys().collect();
        assert_eq!(keys, vec![ymd(2023, 1, 1), ymd(2023, 2, 1), ymd(2023, 3, 1)]);
        assert!(c.iter().all(|(_, v)| *v == BucketValue::default()));
    }

    #[test]
    fn test_bucket_for_picks_largest_key_not_after() {
        let c = monthly();
        assert_eq!(c.bucket_for(ymd(2023, 2, 15)).unwrap(), ymd(2023, 2, 1));
        assert_eq!(c.bucket_for(ymd(2023, 1, 1)).unwrap(), ymd(2023, 1, 1));
        assert_eq!(c.bucket_for(ymd(2023, 2, 28)).unwrap(), ymd(2023, 2, 1));
        assert_eq!(c.bucket_for(ymd(2023, 3, 31)).unwrap(), ymd(2023, 3, 1));
    }

    #[test]
    fn test_bucket_for_outside_coverage() {
        let c = monthly();
        assert_eq!(
            c.bucket_for(ymd(2022, 12, 31)).unwrap_err(),
            CollateError::OutOfRange(ymd(2022, 12, 31))
        );
        assert_eq!(
            c.bucket_for(ymd(2023, 4, 1)).unwrap_err(),
            CollateError::OutOfRange(ymd(2023, 4, 1))
        );
    }

    #[test]
    fn test_empty_container_rejects_everything() {
        let c: BucketContainer<BucketValue> = BucketContainer::create(Vec::new(), PeriodSize::MONTH).unwrap();
        assert!(c.is_empty());
        assert!(c.bucket_for(ymd(2023, 1, 1)).is_err());
    }

    #[test]
    fn test_merge_unknown_bucket() {
        let mut c = monthly();
        let err = c
            .merge(&CreditDebitStore, ymd(2023, 2, 2), &[Contribution::new(Role::Credit, dec!(1))])
            .unwrap_err();
        assert_eq!(err, CollateError::UnknownBucket(ymd(2023, 2, 2)));
    }

    #[test]
    fn test_merge_is_all_or_nothing() {
        let mut c = monthly();
        let key = ymd(2023, 2, 1);
        let contributions = [
            Contribution::new(Role::Credit, dec!(10)),
            Contribution::new(Role::Total, dec!(5)),
        ];
        assert!(c.merge(&CreditDebitStore, key, &contributions).is_err());
        assert_eq!(c.get(key), Some(&BucketValue::default()));

        c.merge(&CreditDebitStore, key, &contributions[..1]).unwrap();
        assert_eq!(c.get(key).unwrap().credit, dec!(10));
    }
}
