//! cashflow-reports: report definitions, report kinds, runner and JSON output

pub mod cash_flow;
pub mod definition;
pub mod output;
pub mod period_totals;
pub mod result;
pub mod runner;

pub use definition::{CashFlowChart, PeriodSpec, PeriodTotals, ReportDefinition, ReportPage, discover_pages};
pub use output::{INDEX_FILE, IndexEntry, PageOutput, ReportIndex, page_file_name, write_index, write_page};
pub use result::{CashFlowData, ReportData, ReportResult, TotalsData};
pub use runner::{LedgerBackend, ReportContext, run_report};
