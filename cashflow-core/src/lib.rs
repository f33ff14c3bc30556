//! cashflow-core: period collation engine for ledger splits
//!
//! Splits are bucketed into calendar-aligned periods (day / week / month times an
//! interval) and folded into per-period accumulators by a pluggable
//! classifier/merger pair. Amounts are exact decimals throughout.

pub mod bucket;
pub mod collate;
pub mod error;
pub mod ledger;
pub mod period;
pub mod policy;
pub mod series;
pub mod time;

pub use bucket::BucketContainer;
pub use collate::{Collator, CollatorState};
pub use error::CollateError;
pub use ledger::{AccountId, AccountResolver, LedgerEntry, LedgerSource};
pub use period::{Frequency, PeriodDescriptor, PeriodEnd, PeriodRange, PeriodSize, PeriodStart};
pub use policy::{
    BucketValue, Classifier, Contribution, CreditDebitStore, DebitCreditSplit, Merger, Role,
    SummationStore, TotalAmount,
};
pub use series::{CashFlowSeries, PeriodFlow, TimePoint, time_series};
pub use time::{Clock, FixedClock, SystemClock, epoch_seconds, parse_timezone};
