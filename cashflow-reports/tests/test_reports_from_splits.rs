use cashflow_core::{FixedClock, TimePoint};
use cashflow_ingest::Ledger;
use cashflow_reports::{
    PageOutput, ReportContext, ReportData, ReportPage, page_file_name, run_report, write_page,
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn splits_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("testdata")
        .join("splits.csv")
}

fn context(ledger: Ledger) -> ReportContext {
    ReportContext::new(
        Arc::new(ledger),
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2023, 4, 10).unwrap())),
        Tz::UTC,
    )
}

fn values(points: &[TimePoint]) -> Vec<Decimal> {
    points.iter().map(|p| p.value).collect()
}

const PAGE: &str = r#"
page_name = "Seaside View"

[[definitions]]
type = "cash_flow_chart"
name = "monthly"
accounts = ["Assets.Seaside View Rental"]
period_start = "2023-01-01"
period_end = "2023-03-31"
period_size = "month"

[[definitions]]
type = "cash_flow_chart"
name = "biweekly"
accounts = ["Assets.Seaside View Rental"]
period_start = "2023-01-02"
period_end = "2023-03-31"
period_size = "two_week"

[[definitions]]
type = "period_totals"
name = "spending"
accounts = ["Expenses"]
period_start = "start_of_year"
period_end = "last_month"
"#;

/// Real-data regression: monthly cash flow of the rental property, deposits included.
#[test]
fn test_monthly_rental_cash_flow() {
    let ctx = context(Ledger::from_path(splits_path()).unwrap());
    let page = ReportPage::parse(PAGE).unwrap();

    let result = run_report(&page.definitions[0], &ctx).unwrap();
    let ReportData::CashFlow(data) = result.data else {
        panic!("expected cash flow data");
    };

    assert_eq!(values(&data.credits), vec![dec!(2300.00), dec!(1800.00), dec!(1800.00)]);
    assert_eq!(values(&data.debits), vec![dec!(-307.40), dec!(-1345.00), dec!(-143.99)]);
    assert_eq!(values(&data.net), vec![dec!(1992.60), dec!(455.00), dec!(1656.01)]);
    assert!(data.credits.windows(2).all(|w| w[0].date < w[1].date));
}

/// Bi-weekly buckets are exactly 14 days apart and quiet fortnights still show up.
#[test]
fn test_biweekly_rental_cash_flow() {
    let ctx = context(Ledger::from_path(splits_path()).unwrap());
    let page = ReportPage::parse(PAGE).unwrap();

    let result = run_report(&page.definitions[1], &ctx).unwrap();
    let ReportData::CashFlow(data) = result.data else {
        panic!("expected cash flow data");
    };

    assert_eq!(data.net.len(), 7);
    for w in data.net.windows(2) {
        assert_eq!(w[1].date - w[0].date, 14 * 86_400);
    }
    assert_eq!(data.net[1].value, Decimal::ZERO);
    assert_eq!(data.credits[0].value, dec!(2300.00));
    assert_eq!(data.debits[3].value, dec!(-1250.00));

    let total: Decimal = data.net.iter().map(|p| p.value).sum();
    assert_eq!(total, dec!(4103.61));
}

/// Feeding the same splits in reverse order yields identical results.
#[test]
fn test_split_order_is_irrelevant() {
    let ledger = Ledger::from_path(splits_path()).unwrap();
    let mut reversed = ledger.splits().to_vec();
    reversed.reverse();

    let page = ReportPage::parse(PAGE).unwrap();
    let forward = context(ledger);
    let backward = context(Ledger::from_splits(reversed));

    for definition in &page.definitions {
        assert_eq!(
            run_report(definition, &forward).unwrap(),
            run_report(definition, &backward).unwrap(),
            "{}",
            definition.name()
        );
    }
}

/// Relative anchors resolve against the injected clock (2023-04-10).
#[test]
fn test_period_totals_relative_window() {
    let ctx = context(Ledger::from_path(splits_path()).unwrap());
    let page = ReportPage::parse(PAGE).unwrap();

    let result = run_report(&page.definitions[2], &ctx).unwrap();
    let ReportData::Totals(data) = result.data else {
        panic!("expected totals");
    };
    // January..March 2023
    assert_eq!(
        values(&data.totals),
        vec![dec!(-150.42), dec!(-183.20), dec!(0)]
    );
}

/// The written page carries credits/debits/net/gross arrays per report.
#[test]
fn test_page_json_shape() {
    let ctx = context(Ledger::from_path(splits_path()).unwrap());
    let page = ReportPage::parse(PAGE).unwrap();
    let reports = page
        .definitions
        .iter()
        .map(|d| run_report(d, &ctx))
        .collect::<anyhow::Result<Vec<_>>>()
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let file = page_file_name(Path::new("reports/seaside.toml"));
    let output = PageOutput { name: page.page_name.clone(), reports };
    write_page(dir.path(), &file, &output).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(&file)).unwrap()).unwrap();
    assert_eq!(json["name"], "Seaside View");
    let monthly = &json["reports"][0];
    assert_eq!(monthly["type"], "cash_flow_chart");
    for key in ["credits", "debits", "net", "gross"] {
        assert_eq!(monthly["data"][key].as_array().unwrap().len(), 3, "{key}");
    }
    assert_eq!(monthly["data"]["credits"][0]["date"], 1_672_531_200);
    assert_eq!(json["reports"][2]["data"]["totals"].as_array().unwrap().len(), 3);
}
