//! Ledger entry types and the collaborator contracts reports pull them through.

use std::collections::BTreeSet;
use std::fmt;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Full hierarchical account name, e.g. `Assets.Seaside View Rental`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub const SEPARATOR: char = '.';

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parent account, or `None` for a top-level account.
    pub fn parent(&self) -> Option<AccountId> {
        self.0
            .rsplit_once(Self::SEPARATOR)
            .map(|(parent, _)| AccountId::new(parent))
    }

    /// True if `self` is `other` or sits anywhere below it in the tree.
    pub fn is_within(&self, other: &AccountId) -> bool {
        self.0 == other.0
            || (self.0.starts_with(&other.0)
                && self.0[other.0.len()..].starts_with(Self::SEPARATOR))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId::new(s)
    }
}

/// One split: a single leg of a transaction posted against one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub account_id: AccountId,
    pub posted_date: NaiveDate,
    /// Positive = inflow (credit), negative = outflow (debit)
    pub amount: Decimal,
}

impl LedgerEntry {
    pub fn new(account_id: impl Into<AccountId>, posted_date: NaiveDate, amount: Decimal) -> Self {
        Self {
            account_id: account_id.into(),
            posted_date,
            amount,
        }
    }

    pub fn is_inflow(&self) -> bool {
        self.amount >= Decimal::ZERO
    }
}

/// Anything that can hand out splits for a set of accounts over a date window.
///
/// Implementations should return entries dated inside `[start, end]`, but callers
/// must not rely on ordering or on the absence of boundary stragglers.
pub trait LedgerSource: Send + Sync {
    fn get_entries(
        &self,
        accounts: &BTreeSet<AccountId>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LedgerEntry>>;
}

/// Expands account name patterns into concrete accounts, descendants included.
pub trait AccountResolver: Send + Sync {
    fn resolve_accounts(&self, patterns: &[String]) -> Result<BTreeSet<AccountId>>;
}
