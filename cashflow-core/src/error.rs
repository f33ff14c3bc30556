//! Error taxonomy for the collation engine.

use chrono::NaiveDate;
use thiserror::Error;

use crate::policy::Role;

/// Failures raised by period resolution, bucket lookup and merging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollateError {
    /// Period interval must be at least 1.
    #[error("invalid period interval {0}: must be >= 1")]
    InvalidInterval(u32),

    #[error("unknown period frequency: {0}")]
    UnknownFrequency(String),

    /// A relative anchor or period size name that is not recognized.
    #[error("unknown period anchor: {0}")]
    UnknownAnchor(String),

    /// The date does not fall inside any populated bucket.
    #[error("date {0} is outside the collated periods")]
    OutOfRange(NaiveDate),

    #[error("no bucket keyed {0}")]
    UnknownBucket(NaiveDate),

    #[error("store `{store}` does not accept role `{role}`")]
    UnknownRole { role: Role, store: &'static str },

    #[error("collator is sealed; no further values may be stored")]
    Sealed,

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Calendar arithmetic left chrono's supported date range.
    #[error("date out of supported range near {0}")]
    UnrepresentableDate(NaiveDate),
}

pub type Result<T> = std::result::Result<T, CollateError>;
