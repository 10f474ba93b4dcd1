//! Fiscal period extraction from titles.
//!
//! Two notations appear in the wild: a western year ("2025年3月期") and
//! an era year ("令和7年3月期"). The western pattern is tried first; era
//! years are converted with a fixed per-era base offset, with the token
//! 元 ("first year") reading as 1.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::normalize::normalize;

/// Fiscal year + closing month as written in a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalPeriod {
    pub year: i32,
    /// Closing month, 1-12 (enforced by the extraction patterns)
    pub month: u32,
}

impl FiscalPeriod {
    /// Last calendar day of the closing month (leap-year aware).
    pub fn month_end(&self) -> NaiveDate {
        let (next_y, next_m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_y, next_m, 1)
            .expect("month validated at extraction")
            .pred_opt()
            .expect("first of month always has a predecessor")
    }
}

/// Western notation: YYYY年M月 with an optional 期 suffix.
static WESTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})年(1[0-2]|[1-9])月期?").expect("static pattern")
});

/// Era notation: era name + era year (元 = 1) + month.
static ERA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(令和|平成|昭和|大正|明治)(元|\d{1,2})年(1[0-2]|[1-9])月期?").expect("static pattern")
});

/// Base year per era; western year = base + era year.
fn era_base(era: &str) -> Option<i32> {
    match era {
        "令和" => Some(2018),
        "平成" => Some(1988),
        "昭和" => Some(1925),
        "大正" => Some(1911),
        "明治" => Some(1867),
        _ => None,
    }
}

fn era_year(token: &str) -> Option<i32> {
    if token == "元" {
        Some(1)
    } else {
        token.parse().ok()
    }
}

/// Extract the fiscal period from a title, or `None` when neither
/// notation matches. Never fails on arbitrary input.
pub fn extract_fiscal_period(title: &str) -> Option<FiscalPeriod> {
    let normalized = normalize(title);

    if let Some(caps) = WESTERN.captures(&normalized) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        return Some(FiscalPeriod { year, month });
    }

    if let Some(caps) = ERA.captures(&normalized) {
        let base = era_base(&caps[1])?;
        let year = base + era_year(&caps[2])?;
        let month = caps[3].parse().ok()?;
        return Some(FiscalPeriod { year, month });
    }

    None
}
