//! cashflow-ingest: splits CSV loading and account tree resolution.

pub mod accounts;
pub mod ledger;
pub mod types;

pub use accounts::AccountTree;
pub use ledger::Ledger;
pub use types::Split;
