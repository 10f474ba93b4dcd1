//! Catchup subcommand - scan from the last stored date through today
//! and export the reconciled delta.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;

use tdharvest_core::ProgressContext;
use tdharvest_scrape::scan_range;
use tdharvest_store::{reconcile, write_delta, DisclosureDb};

use crate::config::Config;

use super::{parse_date, print_summary};

#[derive(Args, Debug)]
pub struct CatchupArgs {
    /// Start date (YYYY-MM-DD); defaults to the store's max-sequence date
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Store database path (overrides config)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Output directory for the delta file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel day-scan workers
    #[arg(short, long)]
    pub workers: Option<usize>,
}

pub fn run(args: CatchupArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let db_path = args.db.unwrap_or_else(|| config.store.db_path.clone());
    let output_dir = args.output.unwrap_or_else(|| config.output.dir.clone());

    // The store must answer before anything else runs: sequence numbers
    // are assigned against its max, and an unverifiable max means no
    // export at all.
    let db = DisclosureDb::open_read_only(&db_path)?;
    let max_sequence = db.max_sequence()?;
    let boundary = match args.from.or(db.max_sequence_date()?) {
        Some(date) => date,
        None => anyhow::bail!("store is empty; pass --from to pick a start date"),
    };

    let today = Local::now().date_naive();
    log::info!("catch-up from {boundary} (max sequence {max_sequence}) through {today}");

    let scrape_config = config.scrape_config(args.workers);
    let scan = scan_range(&scrape_config, boundary, today, progress)
        .context("range scan failed")?;

    if scan.interrupted {
        anyhow::bail!(
            "scan interrupted after {} day(s); no delta written — re-run to resume",
            scan.days.len()
        );
    }

    let total_scraped = scan.total_records();
    let ceiling_days = scan.ceiling_days();
    let exhausted_days = scan.exhausted_days();
    let skipped_rows: usize = scan.days.iter().map(|d| d.skipped_rows).sum();
    let days_scanned = scan.days.len();

    let existing = db.existing_keys(boundary)?;
    let boundary_scraped = scan
        .days
        .iter()
        .filter(|d| d.date == boundary)
        .map(|d| d.records.len())
        .sum::<usize>();
    let boundary_stored = db.count_for_date(boundary)?;

    let recon = reconcile(scan.into_records(), boundary, &existing, max_sequence);

    let delta_path = if recon.new_records.is_empty() {
        log::info!("no new disclosures — store is current");
        None
    } else {
        let columns = db.columns()?;
        let path = write_delta(
            &output_dir,
            &columns,
            &recon.new_records,
            boundary,
            Local::now().naive_local(),
        )?;
        Some(path)
    };

    let sequence_range = match recon.sequence_range() {
        Some((lo, hi)) => format!("{lo}–{hi}"),
        None => "-".to_string(),
    };
    print_summary(
        "Catch-up",
        &[
            ("Days scanned", format!("{days_scanned}")),
            ("Records scraped", format!("{total_scraped}")),
            ("Already known", format!("{}", recon.duplicates)),
            ("Newly assigned", format!("{}", recon.new_records.len())),
            ("Sequence range", sequence_range),
            (
                "Boundary day",
                format!("{boundary_stored} stored / {boundary_scraped} scraped"),
            ),
            ("Malformed rows", format!("{skipped_rows}")),
            (
                "Delta file",
                delta_path
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |p| p.display().to_string()),
            ),
        ],
    );

    if exhausted_days > 0 {
        log::warn!("{exhausted_days} day(s) ended on exhausted retries; re-run to fill gaps");
    }
    if ceiling_days > 0 {
        anyhow::bail!("page ceiling hit on {ceiling_days} day(s) — investigate the source");
    }

    Ok(())
}
