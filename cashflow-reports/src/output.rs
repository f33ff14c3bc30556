//! JSON persistence for report pages and the index listing them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::result::ReportResult;

pub const INDEX_FILE: &str = "__reports.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageOutput {
    pub name: String,
    pub reports: Vec<ReportResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportIndex {
    pub modification_time: String,
    pub last_updated: String,
    pub reports: Vec<IndexEntry>,
}

impl ReportIndex {
    pub fn new(reports: Vec<IndexEntry>, now: DateTime<Local>) -> Self {
        let stamp = now.format("%c").to_string();
        Self {
            modification_time: stamp.clone(),
            last_updated: stamp,
            reports,
        }
    }
}

/// Output file name for a page definition file: `cash.toml` -> `cash.toml.json`.
pub fn page_file_name(definition_path: &Path) -> String {
    let base = definition_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());
    format!("{base}.json")
}

/// Write `page` into `dir/file_name`, returning the index entry for it.
pub fn write_page(dir: &Path, file_name: &str, page: &PageOutput) -> Result<IndexEntry> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(page).context("serialize page")?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    info!(page = %page.name, reports = page.reports.len(), path = %path.display(), "page written");
    Ok(IndexEntry {
        name: page.name.clone(),
        file: file_name.to_string(),
    })
}

pub fn write_index(dir: &Path, index: &ReportIndex) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(INDEX_FILE);
    let json = serde_json::to_string_pretty(index).context("serialize index")?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{ReportData, TotalsData};
    use cashflow_core::TimePoint;
    use rust_decimal_macros::dec;

    #[test]
    fn test_page_file_name() {
        assert_eq!(page_file_name(Path::new("reports/cash.toml")), "cash.toml.json");
    }

    #[test]
    fn test_write_page_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("output");

        let page = PageOutput {
            name: "Overview".into(),
            reports: vec![ReportResult {
                name: "food".into(),
                report_type: "period_totals".into(),
                data: ReportData::Totals(TotalsData {
                    totals: vec![TimePoint { date: 0, value: dec!(-1.5) }],
                }),
            }],
        };
        let entry = write_page(&out, "overview.toml.json", &page).unwrap();
        assert_eq!(entry, IndexEntry { name: "Overview".into(), file: "overview.toml.json".into() });

        let written: PageOutput =
            serde_json::from_str(&fs::read_to_string(out.join("overview.toml.json")).unwrap()).unwrap();
        assert_eq!(written, page);

        let index = ReportIndex::new(vec![entry], Local::now());
        let path = write_index(&out, &index).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["reports"][0]["file"], "overview.toml.json");
        assert!(json["modification_time"].is_string());
    }
}
