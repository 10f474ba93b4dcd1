//! Diagnostic validation pass over a batch of classified titles.
//!
//! Flags contradictions between what a title literally says and what the
//! classifier resolved. Anomalies are counted and reported, never
//! corrected — a non-zero count means a classification bug or a title
//! the rules do not cover yet.

use chrono::{Datelike, NaiveDate};

use crate::normalize::normalize;
use crate::quarter::{explicit_dai_marker, Quarter};

/// One classified record as seen by the validation pass.
#[derive(Debug, Clone)]
pub struct ValidationInput {
    pub title: String,
    /// Resolved quarter, after the caller's full-year default
    pub quarter: Option<Quarter>,
    /// Resolved fiscal period end, when a period was extracted
    pub period_end: Option<NaiveDate>,
}

/// Anomaly counts from one validation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ValidationReport {
    pub checked: usize,
    /// Title carries 第N四半期 with N≠4 but resolved to 4Q
    pub quarter_marker_conflicts: usize,
    /// Title says 通期 but did not resolve to 4Q
    pub full_year_mismatches: usize,
    /// Resolved period end is not the last day of its month
    pub non_month_end_dates: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.quarter_marker_conflicts == 0
            && self.full_year_mismatches == 0
            && self.non_month_end_dates == 0
    }

    pub fn anomalies(&self) -> usize {
        self.quarter_marker_conflicts + self.full_year_mismatches + self.non_month_end_dates
    }
}

fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

/// How many anomalies to spell out in the log before going quiet.
const LOG_DETAIL_LIMIT: usize = 5;

/// Validate a batch of classified titles.
pub fn validate(items: &[ValidationInput]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut logged = 0usize;

    for item in items {
        report.checked += 1;

        // An explicit quarter marker must win over the full-year default
        if let Some(n) = explicit_dai_marker(&item.title) {
            if n != 4 && item.quarter == Some(Quarter::Q4) {
                report.quarter_marker_conflicts += 1;
                if logged < LOG_DETAIL_LIMIT {
                    log::warn!("第{n}四半期 title resolved as 4Q: {}", item.title);
                    logged += 1;
                }
            }
        }

        if normalize(&item.title).contains("通期") && item.quarter != Some(Quarter::Q4) {
            report.full_year_mismatches += 1;
            if logged < LOG_DETAIL_LIMIT {
                log::warn!(
                    "通期 title resolved as {:?}: {}",
                    item.quarter.map(Quarter::label),
                    item.title
                );
                logged += 1;
            }
        }

        if let Some(end) = item.period_end {
            if !is_month_end(end) {
                report.non_month_end_dates += 1;
                if logged < LOG_DETAIL_LIMIT {
                    log::warn!("period end {end} is not a month end: {}", item.title);
                    logged += 1;
                }
            }
        }
    }

    report
}
