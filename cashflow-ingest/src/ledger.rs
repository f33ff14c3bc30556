//! Load a splits CSV export into an in-memory ledger.
//!
//! Expected header (description optional):
//! account,date,amount,description
//!
//! Dates are `YYYY-MM-DD` (US `MM/DD/YYYY` is accepted too). Amounts are exact
//! decimals; thousands separators are ignored.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use cashflow_core::{AccountId, AccountResolver, LedgerEntry, LedgerSource};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::accounts::AccountTree;
use crate::types::{Split, SplitRow};

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
}

fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.trim().replace(',', "")).ok()
}

/// All splits of a ledger plus the account tree they imply.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    accounts: AccountTree,
    splits: Vec<Split>,
}

impl Ledger {
    pub fn from_splits(splits: Vec<Split>) -> Self {
        let mut accounts = AccountTree::new();
        for split in &splits {
            accounts.insert(&split.account);
        }
        Self { accounts, splits }
    }

    /// Parse a splits CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;
        let ledger = Self::from_csv(rdr).with_context(|| format!("parsing {}", path.display()))?;
        info!(
            path = %path.display(),
            splits = ledger.splits.len(),
            accounts = ledger.accounts.len(),
            "ledger loaded"
        );
        Ok(ledger)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        Self::from_csv(rdr)
    }

    fn from_csv<R: io::Read>(mut rdr: csv::Reader<R>) -> Result<Self> {
        let headers = rdr.headers()?.clone();
        let mut splits = Vec::new();

        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let row: SplitRow = record
                .deserialize(Some(&headers))
                .with_context(|| format!("line {line}"))?;
            if row.account.is_empty() && row.date.is_empty() {
                continue; // blank trailing rows
            }
            if row.account.is_empty() {
                bail!("line {line}: missing account");
            }
            let date = parse_date(&row.date)
                .ok_or_else(|| anyhow!("line {line}: invalid date '{}'", row.date))?;
            let amount = parse_amount(&row.amount)
                .ok_or_else(|| anyhow!("line {line}: invalid amount '{}'", row.amount))?;

            splits.push(Split {
                account: AccountId::new(row.account),
                date,
                amount,
                description: row.description,
            });
        }

        Ok(Self::from_splits(splits))
    }

    pub fn accounts(&self) -> &AccountTree {
        &self.accounts
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }
}

impl LedgerSource for Ledger {
    fn get_entries(
        &self,
        accounts: &BTreeSet<AccountId>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LedgerEntry>> {
        let entries: Vec<LedgerEntry> = self
            .splits
            .iter()
            .filter(|s| s.date >= start && s.date <= end && accounts.contains(&s.account))
            .map(Split::to_entry)
            .collect();
        debug!(accounts = accounts.len(), %start, %end, entries = entries.len(), "entries selected");
        Ok(entries)
    }
}

impl AccountResolver for Ledger {
    fn resolve_accounts(&self, patterns: &[String]) -> Result<BTreeSet<AccountId>> {
        self.accounts.resolve(patterns)
    }
}
