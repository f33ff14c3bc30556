//! Report page definitions, read from TOML.
//!
//! ```toml
//! page_name = "Rental"
//!
//! [[definitions]]
//! type = "cash_flow_chart"
//! name = "seaside"
//! accounts = ["Assets.Seaside View Rental"]
//! period_size = "two_week"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cashflow_core::{PeriodEnd, PeriodSize, PeriodStart};
use serde::{Deserialize, Serialize};

/// Period fields shared by every report kind. All default to the trailing year by month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodSpec {
    #[serde(default)]
    pub period_start: PeriodStart,
    #[serde(default)]
    pub period_end: PeriodEnd,
    #[serde(default)]
    pub period_size: PeriodSize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowChart {
    pub name: String,
    pub accounts: Vec<String>,
    #[serde(flatten)]
    pub period: PeriodSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub name: String,
    pub accounts: Vec<String>,
    #[serde(flatten)]
    pub period: PeriodSpec,
}

/// One report on a page. The closed set of report kinds this tool knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportDefinition {
    CashFlowChart(CashFlowChart),
    PeriodTotals(PeriodTotals),
}

impl ReportDefinition {
    pub fn name(&self) -> &str {
        match self {
            ReportDefinition::CashFlowChart(r) => &r.name,
            ReportDefinition::PeriodTotals(r) => &r.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReportDefinition::CashFlowChart(_) => "cash_flow_chart",
            ReportDefinition::PeriodTotals(_) => "period_totals",
        }
    }
}

fn default_page_name() -> String {
    "Unnamed Page".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPage {
    #[serde(default = "default_page_name")]
    pub page_name: String,
    #[serde(default)]
    pub definitions: Vec<ReportDefinition>,
}

impl ReportPage {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("parse {}", path.display()))
    }

    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

/// Page definition files (`*.toml`) in `dir`, sorted by file name.
pub fn discover_pages(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut pages = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            pages.push(path);
        }
    }
    pages.sort();
    Ok(pages)
}
