//! tdharvest scrape - Disclosure listing scraper
//!
//! Walks the paginated daily listing of a disclosure site: one fetcher
//! for a single (date, page), a parser for the listing table markup, a
//! day scanner that follows pagination to its end, and a range scanner
//! that covers a date span on a bounded worker pool.

pub mod config;
pub mod fetch;
pub mod parse;
pub mod scan;

// Re-exports
pub use config::ScrapeConfig;
pub use fetch::{fetch_page, page_resource, PageFetch};
pub use parse::{parse_rows, ParsedPage, LISTING_MARKER};
pub use scan::{scan_day, scan_range, DayScan, DayTerminus, RangeScan, ScanError};
