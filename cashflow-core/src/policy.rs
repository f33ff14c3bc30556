//! Classification and merge policies.
//!
//! A [`Classifier`] turns one entry into zero or more [`Contribution`]s without
//! looking at bucket state. A [`Merger`] folds a contribution into a bucket's
//! accumulator. Report kinds pick one of the pairs defined here:
//!
//! - [`DebitCreditSplit`] + [`CreditDebitStore`]: inflow and outflow kept apart
//! - [`TotalAmount`] + [`SummationStore`]: signed total per bucket

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CollateError, Result};
use crate::ledger::LedgerEntry;

/// Accumulator slot a contribution is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Credit,
    Debit,
    Total,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Credit => "credit",
            Role::Debit => "debit",
            Role::Total => "total",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub role: Role,
    pub amount: Decimal,
}

impl Contribution {
    pub fn new(role: Role, amount: Decimal) -> Self {
        Self { role, amount }
    }
}

pub trait Classifier {
    fn classify(&self, entry: &LedgerEntry) -> Vec<Contribution>;
}

pub trait Merger {
    type Value: Default + Clone + fmt::Debug;

    /// Add `contribution` into `value`. Must be commutative across calls.
    fn merge(&self, value: &mut Self::Value, contribution: &Contribution) -> Result<()>;
}

/// Non-negative amounts are credits, negative amounts are debits (sign kept).
#[derive(Debug, Default, Clone, Copy)]
pub struct DebitCreditSplit;

impl Classifier for DebitCreditSplit {
    fn classify(&self, entry: &LedgerEntry) -> Vec<Contribution> {
        let role = if entry.amount >= Decimal::ZERO {
            Role::Credit
        } else {
            Role::Debit
        };
        vec![Contribution::new(role, entry.amount)]
    }
}

/// Every amount goes to the `total` role unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TotalAmount;

impl Classifier for TotalAmount {
    fn classify(&self, entry: &LedgerEntry) -> Vec<Contribution> {
        vec![Contribution::new(Role::Total, entry.amount)]
    }
}

/// Per-bucket inflow/outflow totals. `debit` carries negative values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketValue {
    pub credit: Decimal,
    pub debit: Decimal,
}

impl BucketValue {
    pub fn net(&self) -> Decimal {
        self.credit + self.debit
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CreditDebitStore;

impl Merger for CreditDebitStore {
    type Value = BucketValue;

    fn merge(&self, value: &mut BucketValue, contribution: &Contribution) -> Result<()> {
        match contribution.role {
            Role::Credit => value.credit += contribution.amount,
            Role::Debit => value.debit += contribution.amount,
            role => {
                return Err(CollateError::UnknownRole {
                    role,
                    store: "credit_debit",
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SummationStore;

impl Merger for SummationStore {
    type Value = Decimal;

    fn merge(&self, value: &mut Decimal, contribution: &Contribution) -> Result<()> {
        if contribution.role != Role::Total {
            return Err(CollateError::UnknownRole {
                role: contribution.role,
                store: "summation",
            });
        }
        *value += contribution.amount;
        Ok(())
    }
}
