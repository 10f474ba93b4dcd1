//! Day and range scanners driving the fetcher and parser.

use std::time::Instant;

use chrono::NaiveDate;
use indicatif::ProgressBar;
use rayon::prelude::*;
use tdharvest_core::{is_shutdown_requested, Disclosure, ProgressContext};

use crate::config::ScrapeConfig;
use crate::fetch::{fetch_page, PageFetch};
use crate::parse::parse_rows;

/// Pagination ceiling per day. A real day tops out well under this; only
/// a misbehaving source keeps serving pages, and that must surface as a
/// distinct condition rather than quiet truncation.
pub const MAX_PAGES_PER_DAY: u32 = 50;

/// Range ceiling per invocation.
pub const MAX_RANGE_DAYS: i64 = 365;

/// Why a day scan stopped requesting pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTerminus {
    /// A 404 or an empty listing page — the normal end
    EndOfListing,
    /// A page fetch spent its whole retry budget; the tail of the day
    /// may be missing and a re-run from this date will recover it
    FetchExhausted,
    /// The page ceiling was hit with the listing still going
    PageCeiling,
}

/// All records of one date's paginated listing.
#[derive(Debug)]
pub struct DayScan {
    pub date: NaiveDate,
    /// Page-ordered concatenation of all parsed rows
    pub records: Vec<Disclosure>,
    /// Pages that yielded records
    pub pages: u32,
    /// Malformed rows dropped by the parser
    pub skipped_rows: usize,
    pub terminus: DayTerminus,
}

/// Scan one day: pages 1, 2, ... until the listing ends.
pub fn scan_day(config: &ScrapeConfig, date: NaiveDate, pb: &ProgressBar) -> DayScan {
    run_day_scan(date, &config.base_url, pb, |page| {
        fetch_page(config, date, page)
    })
}

/// Day-scan loop over an injectable page source (tests feed canned pages).
fn run_day_scan(
    date: NaiveDate,
    base_url: &str,
    pb: &ProgressBar,
    mut fetch: impl FnMut(u32) -> PageFetch,
) -> DayScan {
    let mut records = Vec::new();
    let mut skipped_rows = 0;
    let mut pages = 0;
    let mut page = 1;

    let terminus = loop {
        pb.set_message(format!("page {page}"));
        match fetch(page) {
            PageFetch::Found(html) => {
                let parsed = parse_rows(&html, date, base_url);
                if parsed.records.is_empty() {
                    break DayTerminus::EndOfListing;
                }
                pages += 1;
                skipped_rows += parsed.skipped_rows;
                records.extend(parsed.records);
                if page >= MAX_PAGES_PER_DAY {
                    break DayTerminus::PageCeiling;
                }
                page += 1;
            }
            PageFetch::NotFound => break DayTerminus::EndOfListing,
            PageFetch::Exhausted => break DayTerminus::FetchExhausted,
        }
    };

    DayScan {
        date,
        records,
        pages,
        skipped_rows,
        terminus,
    }
}

/// Result of scanning a date range.
#[derive(Debug)]
pub struct RangeScan {
    /// Completed day scans in date order
    pub days: Vec<DayScan>,
    /// True when a shutdown request skipped remaining days
    pub interrupted: bool,
}

impl RangeScan {
    pub fn total_records(&self) -> usize {
        self.days.iter().map(|d| d.records.len()).sum()
    }

    pub fn into_records(self) -> Vec<Disclosure> {
        self.days.into_iter().flat_map(|d| d.records).collect()
    }

    /// Days that stopped on the page ceiling.
    pub fn ceiling_days(&self) -> usize {
        self.days
            .iter()
            .filter(|d| d.terminus == DayTerminus::PageCeiling)
            .count()
    }

    /// Days whose scan ended on an exhausted fetch.
    pub fn exhausted_days(&self) -> usize {
        self.days
            .iter()
            .filter(|d| d.terminus == DayTerminus::FetchExhausted)
            .count()
    }
}

/// Error from a range scan.
#[derive(Debug)]
pub enum ScanError {
    /// The requested span exceeds [`MAX_RANGE_DAYS`]; nothing was fetched
    RangeTooLong { days: i64 },
    Pool(rayon::ThreadPoolBuildError),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RangeTooLong { days } => write!(
                f,
                "refusing to scan {days} days in one run (limit {MAX_RANGE_DAYS})"
            ),
            Self::Pool(e) => write!(f, "worker pool: {e}"),
        }
    }
}

impl std::error::Error for ScanError {}

impl From<rayon::ThreadPoolBuildError> for ScanError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::Pool(e)
    }
}

/// Scan every day from `from` through `to` inclusive.
///
/// Days run on a bounded worker pool; pages within a day stay sequential
/// because pagination only ends when an empty page is seen. A day that
/// yields nothing is not an error. Results come back in date order
/// regardless of completion order.
pub fn scan_range(
    config: &ScrapeConfig,
    from: NaiveDate,
    to: NaiveDate,
    progress: &ProgressContext,
) -> Result<RangeScan, ScanError> {
    let span = (to - from).num_days() + 1;
    if span <= 0 {
        return Ok(RangeScan {
            days: Vec::new(),
            interrupted: false,
        });
    }
    if span > MAX_RANGE_DAYS {
        return Err(ScanError::RangeTooLong { days: span });
    }

    let dates: Vec<NaiveDate> = (0..span).map(|i| from + chrono::Duration::days(i)).collect();
    log::info!("scanning {} day(s): {from} .. {to}", dates.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;

    let scans: Vec<Option<DayScan>> = pool.install(|| {
        dates
            .par_iter()
            .map(|&date| {
                if is_shutdown_requested() {
                    return None;
                }
                let pb = progress.day_line(&date.to_string());
                let start = Instant::now();
                let scan = scan_day(config, date, &pb);
                pb.finish_and_clear();

                match scan.terminus {
                    DayTerminus::EndOfListing if scan.records.is_empty() => {
                        log::info!("{date}: no disclosures");
                    }
                    DayTerminus::EndOfListing => {
                        log::info!(
                            "{date}: {} records across {} page(s) [{:.1}s]",
                            scan.records.len(),
                            scan.pages,
                            start.elapsed().as_secs_f64()
                        );
                    }
                    DayTerminus::FetchExhausted => {
                        log::warn!(
                            "{date}: fetch retries exhausted after {} page(s), {} records kept",
                            scan.pages,
                            scan.records.len()
                        );
                    }
                    DayTerminus::PageCeiling => {
                        log::error!(
                            "{date}: page ceiling ({MAX_PAGES_PER_DAY}) hit, source misbehaving"
                        );
                    }
                }
                Some(scan)
            })
            .collect()
    });

    let interrupted = scans.iter().any(Option::is_none);
    Ok(RangeScan {
        days: scans.into_iter().flatten().collect(),
        interrupted,
    })
}
