//! Report-type classification by priority-ordered keyword scan.

use crate::normalize::normalize;

/// Disclosure report category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    /// 業績予想 — earnings forecast revision
    ForecastRevision,
    /// 事業計画 — business plan
    BusinessPlan,
    /// 中期経営 — mid-term management plan
    MidTermPlan,
    /// 決算説明 — earnings briefing material
    EarningsBriefing,
    /// 決算短信 — earnings summary (kessan tanshin)
    EarningsSummary,
}

impl ReportType {
    /// Priority order of the keyword scan. A title containing several
    /// keywords classifies as the first one in this list, regardless of
    /// where each appears in the text — reordering changes results.
    pub const IN_PRIORITY_ORDER: [ReportType; 5] = [
        ReportType::ForecastRevision,
        ReportType::BusinessPlan,
        ReportType::MidTermPlan,
        ReportType::EarningsBriefing,
        ReportType::EarningsSummary,
    ];

    /// The keyword this category is recognized by, as it appears in titles.
    pub fn keyword(self) -> &'static str {
        match self {
            ReportType::ForecastRevision => "業績予想",
            ReportType::BusinessPlan => "事業計画",
            ReportType::MidTermPlan => "中期経営",
            ReportType::EarningsBriefing => "決算説明",
            ReportType::EarningsSummary => "決算短信",
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Classify a title's report type, or `None` when no keyword matches.
pub fn extract_report_type(title: &str) -> Option<ReportType> {
    let normalized = normalize(title);
    ReportType::IN_PRIORITY_ORDER
        .into_iter()
        .find(|t| normalized.contains(t.keyword()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_keyword() {
        assert_eq!(
            extract_report_type("2025年3月期決算短信"),
            Some(ReportType::EarningsSummary)
        );
    }

    #[test]
    fn priority_beats_text_position() {
        // 決算短信 appears first in the text, 業績予想 wins by priority
        assert_eq!(
            extract_report_type("決算短信及び業績予想の修正に関するお知らせ"),
            Some(ReportType::ForecastRevision)
        );
    }

    #[test]
    fn briefing_before_summary() {
        assert_eq!(
            extract_report_type("決算説明会資料"),
            Some(ReportType::EarningsBriefing)
        );
    }

    #[test]
    fn no_keyword_is_none() {
        assert_eq!(extract_report_type("自己株式の取得状況に関するお知らせ"), None);
    }

    #[test]
    fn full_width_text_matches_after_normalization() {
        // NFKC folds nothing in the keyword itself, but surrounding
        // full-width noise must not break the substring scan
        assert_eq!(
            extract_report_type("［訂正］　業績予想の修正"),
            Some(ReportType::ForecastRevision)
        );
    }

    #[test]
    fn display_is_keyword() {
        assert_eq!(ReportType::EarningsSummary.to_string(), "決算短信");
    }
}
