use anyhow::{Context, Result};
use cashflow_core::{
    AccountResolver, Collator, LedgerSource, PeriodDescriptor, PeriodEnd, PeriodSize, PeriodStart,
    SystemClock, parse_timezone,
};
use cashflow_ingest::Ledger;
use cashflow_reports::{
    PageOutput, ReportContext, ReportIndex, ReportPage, ReportResult, discover_pages,
    page_file_name, run_report, write_index, write_page,
};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

mod config;
mod logging;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CASHFLOW_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "cashflow",
    version,
    long_version = LONG_VERSION,
    about = "Collate ledger splits into periodic cash flow reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every report page and write JSON plus the __reports.json index
    Run {
        /// Core config file
        #[arg(short, long, default_value = config::DEFAULT_CONFIG)]
        config: PathBuf,

        /// Run a single page definition instead of the whole report directory
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Print a per-period cash flow table for some accounts
    Show {
        /// Splits CSV
        #[arg(long)]
        ledger: PathBuf,

        /// Account name or glob pattern (repeatable); children are included
        #[arg(long = "account", required = true)]
        accounts: Vec<String>,

        #[arg(long, default_value = "this_month_year_ago")]
        start: PeriodStart,

        #[arg(long, default_value = "this_month")]
        end: PeriodEnd,

        /// day | week | two_week | month | quarter | year
        #[arg(long, default_value = "month")]
        size: PeriodSize,
    },

    /// Write a default core config
    Init {
        #[arg(short, long, default_value = config::DEFAULT_CONFIG)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Run { config, report } => {
            run_pages(&config, report).await?;
        }

        Command::Show {
            ledger,
            accounts,
            start,
            end,
            size,
        } => {
            show(&ledger, &accounts, start, end, size)?;
        }

        Command::Init { config } => {
            config::init_config(&config)?;
        }
    }

    Ok(())
}

async fn run_pages(config_path: &Path, report: Option<PathBuf>) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let timezone = parse_timezone(&cfg.global.timezone)?;
    let ledger = Ledger::from_path(&cfg.ledger_file)?;
    let ctx = ReportContext::new(Arc::new(ledger), Arc::new(SystemClock), timezone);

    let pages = match report {
        Some(path) => vec![path],
        None => discover_pages(&cfg.report_definitions)?,
    };

    let mut entries = Vec::with_capacity(pages.len());
    for path in &pages {
        let page = ReportPage::from_path(path)?;
        info!(page = %page.page_name, definitions = page.definitions.len(), "processing page");

        let reports = run_page(&page, &ctx).await?;
        let output = PageOutput {
            name: page.page_name,
            reports,
        };
        entries.push(write_page(&cfg.output_directory, &page_file_name(path), &output)?);
    }

    let index = write_index(&cfg.output_directory, &ReportIndex::new(entries, Local::now()))?;
    println!("Wrote {} page(s); index at {}", pages.len(), index.display());
    Ok(())
}

/// Definitions on a page are independent; run them side by side and keep page order.
async fn run_page(page: &ReportPage, ctx: &ReportContext) -> Result<Vec<ReportResult>> {
    let handles: Vec<_> = page
        .definitions
        .iter()
        .cloned()
        .map(|definition| {
            let ctx = ctx.clone();
            tokio::task::spawn_blocking(move || run_report(&definition, &ctx))
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.context("report task failed")??);
    }
    Ok(results)
}

fn show(
    ledger_path: &Path,
    accounts: &[String],
    start: PeriodStart,
    end: PeriodEnd,
    size: PeriodSize,
) -> Result<()> {
    let ledger = Ledger::from_path(ledger_path)?;
    let descriptor = PeriodDescriptor::resolve(start, end, size, &SystemClock)?;
    let range = descriptor.range();

    let ids = ledger.resolve_accounts(accounts)?;
    let entries = ledger.get_entries(&ids, range.start, range.end)?;

    let mut collator = Collator::cash_flow(descriptor)?;
    collator.store_all(&entries)?;
    let flows = collator.extract_series();

    println!(
        "{} .. {} by {} ({} account(s))\n",
        range.start,
        range.end,
        size,
        ids.len()
    );
    println!("{:<12} {:>14} {:>14} {:>14}", "period", "credit", "debit", "net");
    for flow in &flows {
        println!(
            "{:<12} {:>14} {:>14} {:>14}",
            flow.period_start.to_string(),
            format!("{:.2}", flow.credit),
            format!("{:.2}", flow.debit),
            format!("{:.2}", flow.net)
        );
    }
    println!(
        "\nStored {} split(s); dropped {} outside the window",
        collator.stored(),
        collator.dropped()
    );
    Ok(())
}
