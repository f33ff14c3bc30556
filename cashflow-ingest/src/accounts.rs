//! Account tree built from the full account names seen in a ledger, and
//! pattern resolution over it.
//!
//! Names are `.`-separated paths (`Expenses.Utilities.Power`). Every prefix of a
//! known name is an account too. A pattern selects the accounts it matches plus
//! all of their descendants; `*` matches any run of characters within a single
//! path segment (`Expenses.*.Power`).

use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use cashflow_core::AccountId;
use regex::Regex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountTree {
    accounts: BTreeSet<AccountId>,
}

impl AccountTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `account` and all of its ancestors.
    pub fn insert(&mut self, account: &AccountId) {
        let mut current = Some(account.clone());
        while let Some(id) = current {
            current = id.parent();
            if !self.accounts.insert(id) {
                // ancestors already registered
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn contains(&self, account: &AccountId) -> bool {
        self.accounts.contains(account)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountId> {
        self.accounts.iter()
    }

    /// `account` and everything below it.
    pub fn descendants<'a>(&'a self, account: &'a AccountId) -> impl Iterator<Item = &'a AccountId> + 'a {
        self.accounts
            .range(account.clone()..)
            .take_while(move |id| id.as_str().starts_with(account.as_str()))
            .filter(move |id| id.is_within(account))
    }

    /// Expand patterns into concrete accounts, descendants included.
    ///
    /// A pattern that matches no account is an error.
    pub fn resolve(&self, patterns: &[String]) -> Result<BTreeSet<AccountId>> {
        let mut out = BTreeSet::new();
        for pattern in patterns {
            let re = pattern_regex(pattern)?;
            let roots: Vec<&AccountId> = self
                .accounts
                .iter()
                .filter(|id| re.is_match(id.as_str()))
                .collect();
            if roots.is_empty() {
                bail!("no account matches pattern '{pattern}'");
            }
            for root in roots {
                out.extend(self.descendants(root).cloned());
            }
        }
        Ok(out)
    }
}

fn pattern_regex(pattern: &str) -> Result<Regex> {
    let body = pattern
        .trim()
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[^.]*");
    Regex::new(&format!("^{body}$")).with_context(|| format!("invalid account pattern '{pattern}'"))
}
