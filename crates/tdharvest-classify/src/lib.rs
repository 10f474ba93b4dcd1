//! tdharvest classify - Disclosure title classification
//!
//! Pure, stateless classification of announcement titles into report
//! type, fiscal period, and quarter. The source titles mix western and
//! era-based calendars and several quarter notations; everything here
//! works on NFKC-normalized text and never touches external state, so
//! classifying the same title twice always yields the same result.

pub mod fiscal;
pub mod normalize;
pub mod quarter;
pub mod report_type;
pub mod validate;

pub use fiscal::{extract_fiscal_period, FiscalPeriod};
pub use normalize::normalize;
pub use quarter::{extract_quarter, Quarter};
pub use report_type::{extract_report_type, ReportType};
pub use validate::{validate, ValidationInput, ValidationReport};

/// Full classification of one title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub report_type: Option<ReportType>,
    pub period: Option<FiscalPeriod>,
    pub quarter: Option<Quarter>,
}

/// Classify a title: report type, fiscal period, quarter.
///
/// Applies the full-year default here rather than in the extractor: a
/// title that names a fiscal period but carries no quarter marker at all
/// is a full-year filing, so the quarter resolves to 4Q. Titles with no
/// fiscal period keep `quarter: None`.
pub fn classify(title: &str) -> Classification {
    let report_type = extract_report_type(title);
    let period = extract_fiscal_period(title);
    let quarter = match extract_quarter(title) {
        Some(q) => Some(q),
        None if period.is_some() => Some(Quarter::Q4),
        None => None,
    };
    Classification {
        report_type,
        period,
        quarter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn earnings_summary_full_year() {
        let c = classify("2025年3月期決算短信");
        assert_eq!(c.report_type, Some(ReportType::EarningsSummary));
        let period = c.period.unwrap();
        assert_eq!((period.year, period.month), (2025, 3));
        assert_eq!(
            period.month_end(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
        );
        // No explicit marker: defaults to the full-year quarter
        assert_eq!(c.quarter, Some(Quarter::Q4));
    }

    #[test]
    fn era_year_first_quarter() {
        let c = classify("令和7年3月期 第1四半期決算短信");
        let period = c.period.unwrap();
        assert_eq!((period.year, period.month), (2025, 3));
        assert_eq!(c.quarter, Some(Quarter::Q1));
    }

    #[test]
    fn interim_briefing_resolves_second_quarter() {
        let c = classify("2025年9月期 中間決算説明会資料");
        assert_eq!(c.report_type, Some(ReportType::EarningsBriefing));
        assert_eq!(c.quarter, Some(Quarter::Q2));
    }

    #[test]
    fn forecast_revision_wins_over_later_keywords() {
        let c = classify("2025年3月期 通期業績予想の修正");
        assert_eq!(c.report_type, Some(ReportType::ForecastRevision));
        assert_eq!(c.quarter, Some(Quarter::Q4));
    }

    #[test]
    fn no_period_no_quarter_default() {
        let c = classify("代表取締役の異動に関するお知らせ");
        assert_eq!(c.report_type, None);
        assert_eq!(c.period, None);
        assert_eq!(c.quarter, None);
    }

    #[test]
    fn classification_is_deterministic() {
        let title = "令和元年12月期 第3四半期決算短信〔日本基準〕（連結）";
        assert_eq!(classify(title), classify(title));
    }
}
