use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "core.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Splits CSV the reports read from.
    pub ledger_file: PathBuf,
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    /// Directory scanned for `*.toml` report pages.
    #[serde(default = "default_report_definitions")]
    pub report_definitions: PathBuf,
    #[serde(default)]
    pub global: GlobalSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSection {
    /// IANA zone used when converting period starts to epoch seconds.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("output")
}

fn default_report_definitions() -> PathBuf {
    PathBuf::from("reports")
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for GlobalSection {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_file: PathBuf::from("splits.csv"),
            output_directory: default_output_directory(),
            report_definitions: default_report_definitions(),
            global: GlobalSection::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        bail!(
            "config not found: {} (run `cashflow init` to create one)",
            path.display()
        );
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
