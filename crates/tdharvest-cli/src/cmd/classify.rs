//! Classify subcommand - run the title classifier over one title or the
//! stored corpus, with the validation pass.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use tdharvest_classify::{classify, validate, Quarter, ValidationInput};
use tdharvest_store::DisclosureDb;

use crate::config::Config;

use super::{parse_date, print_summary};

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Classify a single title and exit
    #[arg(long)]
    pub title: Option<String>,

    /// Restrict the store pass to one publication date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Store database path (overrides config)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn run(args: ClassifyArgs, config: &Config) -> Result<()> {
    if let Some(title) = args.title {
        return classify_one(&title);
    }

    let db_path = args.db.unwrap_or_else(|| config.store.db_path.clone());
    let db = DisclosureDb::open_read_only(&db_path)?;
    let titles = db.titles(args.date)?;
    log::info!("classifying {} stored title(s)", titles.len());

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_quarter: BTreeMap<String, usize> = BTreeMap::new();
    let mut with_period = 0usize;
    let mut inputs = Vec::with_capacity(titles.len());

    for title in &titles {
        let c = classify(title);
        if let Some(t) = c.report_type {
            *by_type.entry(t.to_string()).or_default() += 1;
        }
        if let Some(q) = c.quarter {
            *by_quarter.entry(q.label().to_string()).or_default() += 1;
        }
        if c.period.is_some() {
            with_period += 1;
        }
        inputs.push(ValidationInput {
            title: title.clone(),
            quarter: c.quarter,
            period_end: c.period.map(|p| p.month_end()),
        });
    }

    let report = validate(&inputs);

    let mut rows: Vec<(&str, String)> = vec![
        ("Titles", format!("{}", titles.len())),
        ("With fiscal period", format!("{with_period}")),
    ];
    let type_tally = by_type
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ");
    let quarter_tally = by_quarter
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ");
    rows.push(("Report types", if type_tally.is_empty() { "-".into() } else { type_tally }));
    rows.push(("Quarters", if quarter_tally.is_empty() { "-".into() } else { quarter_tally }));
    rows.push(("Validation anomalies", format!("{}", report.anomalies())));
    print_summary("Classification", &rows);

    if !report.is_clean() {
        log::warn!(
            "validation: {} quarter-marker conflict(s), {} 通期 mismatch(es), {} non-month-end date(s)",
            report.quarter_marker_conflicts,
            report.full_year_mismatches,
            report.non_month_end_dates,
        );
    }

    Ok(())
}

fn classify_one(title: &str) -> Result<()> {
    let c = classify(title);
    print_summary(
        "Title",
        &[
            (
                "Report type",
                c.report_type
                    .map_or_else(|| "-".to_string(), |t| t.to_string()),
            ),
            (
                "Fiscal period",
                c.period.map_or_else(
                    || "-".to_string(),
                    |p| format!("{}年{}月期 (end {})", p.year, p.month, p.month_end()),
                ),
            ),
            (
                "Quarter",
                c.quarter
                    .map_or_else(|| "-".to_string(), |q: Quarter| q.label().to_string()),
            ),
        ],
    );
    Ok(())
}
