//! Scan subcommand - scrape one day without touching the store.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

use tdharvest_core::ProgressContext;
use tdharvest_scrape::{scan_day, DayTerminus};
use tdharvest_store::write_day_snapshot;

use crate::config::Config;

use super::{parse_date, print_summary};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Date to scrape (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: NaiveDate,

    /// Write the raw rows to a CSV snapshot
    #[arg(long)]
    pub export: bool,

    /// Output directory for the snapshot
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ScanArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let scrape_config = config.scrape_config(None);

    let pb = progress.day_line(&args.date.to_string());
    let scan = scan_day(&scrape_config, args.date, &pb);
    pb.finish_and_clear();

    let snapshot = if args.export && !scan.records.is_empty() {
        let dir = args.output.unwrap_or_else(|| config.output.dir.clone());
        Some(write_day_snapshot(
            &dir,
            &scan.records,
            args.date,
            Local::now().naive_local(),
        )?)
    } else {
        None
    };

    let terminus = match scan.terminus {
        DayTerminus::EndOfListing => "end of listing".to_string(),
        DayTerminus::FetchExhausted => "fetch retries exhausted".to_string(),
        DayTerminus::PageCeiling => "page ceiling".to_string(),
    };
    print_summary(
        &format!("Scan {}", args.date),
        &[
            ("Records", format!("{}", scan.records.len())),
            ("Pages", format!("{}", scan.pages)),
            ("Malformed rows", format!("{}", scan.skipped_rows)),
            ("Stopped on", terminus),
            (
                "Snapshot",
                snapshot.map_or_else(|| "-".to_string(), |p| p.display().to_string()),
            ),
        ],
    );

    match scan.terminus {
        DayTerminus::PageCeiling => {
            anyhow::bail!("page ceiling hit on {} — investigate the source", args.date)
        }
        DayTerminus::FetchExhausted => {
            // Indistinguishable from a day with fewer pages; not an error,
            // but worth a trail in the logs
            log::warn!("{}: scan ended on exhausted retries", args.date);
            Ok(())
        }
        DayTerminus::EndOfListing => Ok(()),
    }
}
