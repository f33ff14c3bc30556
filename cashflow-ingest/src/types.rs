use cashflow_core::{AccountId, LedgerEntry};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw CSV row as it appears in a splits export.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SplitRow {
    pub account: String,
    pub date: String,
    pub amount: String,
    #[serde(default)]
    pub description: String,
}

/// Normalized split (bank-agnostic)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub account: AccountId,
    pub date: NaiveDate,
    /// Positive means money into the account; negative means money out.
    pub amount: Decimal,
    pub description: String,
}

impl Split {
    pub fn to_entry(&self) -> LedgerEntry {
        LedgerEntry::new(self.account.clone(), self.date, self.amount)
    }
}
