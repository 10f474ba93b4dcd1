//! Quarter extraction from titles.
//!
//! Explicit markers are tried first, in a fixed order; synonym phrases
//! (half-year, interim, full-year wording) come last. A title with no
//! signal at all returns `None` — the full-year default for
//! period-bearing titles is the caller's decision, not this module's.

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::normalize;

/// Fiscal quarter label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub fn label(self) -> &'static str {
        match self {
            Quarter::Q1 => "1Q",
            Quarter::Q2 => "2Q",
            Quarter::Q3 => "3Q",
            Quarter::Q4 => "4Q",
        }
    }

    pub fn from_digit(d: u32) -> Option<Quarter> {
        match d {
            1 => Some(Quarter::Q1),
            2 => Some(Quarter::Q2),
            3 => Some(Quarter::Q3),
            4 => Some(Quarter::Q4),
            _ => None,
        }
    }
}

impl std::fmt::Display for Quarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// "1Q".."4Q" or "Q1".."Q4", case-insensitive, spaces tolerated.
static EXPLICIT_Q: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([1-4])\s*Q|Q\s*([1-4])").expect("static pattern"));

/// 第N四半期 with a CJK or Arabic digit. Full-width digits are already
/// folded to ASCII by normalization.
static DAI_N: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第\s*([一二三四1-4])\s*四\s*半\s*期").expect("static pattern"));

/// "Quarter 1".."Quarter 4".
static QUARTER_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Quarter\s*([1-4])").expect("static pattern"));

/// 第Ⅰ..Ⅳ四半期. NFKC folds the CJK Roman numerals to ASCII letter runs,
/// so the pattern accepts both the folded and (unreachable post-fold but
/// harmless) raw forms.
static DAI_ROMAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"第\s*(IV|I{1,3}|[ⅠⅡⅢⅣ])\s*四\s*半\s*期").expect("static pattern")
});

fn cjk_digit(token: &str) -> Option<u32> {
    match token {
        "一" | "1" => Some(1),
        "二" | "2" => Some(2),
        "三" | "3" => Some(3),
        "四" | "4" => Some(4),
        _ => None,
    }
}

fn roman_digit(token: &str) -> Option<u32> {
    match token {
        "I" | "Ⅰ" => Some(1),
        "II" | "Ⅱ" => Some(2),
        "III" | "Ⅲ" => Some(3),
        "IV" | "Ⅳ" => Some(4),
        _ => None,
    }
}

/// The digit of an explicit 第N四半期 marker in the title, in either CJK
/// or Roman notation. Used by the validation pass to cross-check the
/// resolved quarter against what the title literally says.
pub fn explicit_dai_marker(title: &str) -> Option<u32> {
    let normalized = normalize(title);
    if let Some(caps) = DAI_N.captures(&normalized) {
        return cjk_digit(&caps[1]);
    }
    if let Some(caps) = DAI_ROMAN.captures(&normalized) {
        return roman_digit(&caps[1]);
    }
    None
}

/// Extract an explicit quarter signal from a title, or `None`.
pub fn extract_quarter(title: &str) -> Option<Quarter> {
    let normalized = normalize(title);

    if let Some(caps) = EXPLICIT_Q.captures(&normalized) {
        let digit = caps.get(1).or_else(|| caps.get(2))?;
        let d: u32 = digit.as_str().parse().ok()?;
        return Quarter::from_digit(d);
    }

    if let Some(caps) = DAI_N.captures(&normalized) {
        return Quarter::from_digit(cjk_digit(&caps[1])?);
    }

    if let Some(caps) = QUARTER_WORD.captures(&normalized) {
        let d: u32 = caps[1].parse().ok()?;
        return Quarter::from_digit(d);
    }

    if let Some(caps) = DAI_ROMAN.captures(&normalized) {
        return Quarter::from_digit(roman_digit(&caps[1])?);
    }

    // Synonym phrases, checked only after every explicit form missed
    if ["上半期", "上期", "中間期", "中間"]
        .iter()
        .any(|w| normalized.contains(w))
    {
        return Some(Quarter::Q2);
    }
    if ["下半期", "下期", "通期"]
        .iter()
        .any(|w| normalized.contains(w))
    {
        return Some(Quarter::Q4);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_forms() {
        assert_eq!(extract_quarter("2025年3月期 1Q決算"), Some(Quarter::Q1));
        assert_eq!(extract_quarter("FY2025 Q3 Results"), Some(Quarter::Q3));
        assert_eq!(extract_quarter("q2 presentation"), Some(Quarter::Q2));
    }

    #[test]
    fn dai_n_kanji() {
        assert_eq!(extract_quarter("第1四半期決算短信"), Some(Quarter::Q1));
        assert_eq!(extract_quarter("第三四半期報告書"), Some(Quarter::Q3));
    }

    #[test]
    fn dai_n_full_width_digit() {
        // １ folds to 1 under NFKC before the pattern runs
        assert_eq!(extract_quarter("第２四半期決算短信"), Some(Quarter::Q2));
    }

    #[test]
    fn quarter_word() {
        assert_eq!(extract_quarter("Results for Quarter 4"), Some(Quarter::Q4));
    }

    #[test]
    fn dai_roman() {
        assert_eq!(extract_quarter("第Ⅰ四半期決算短信"), Some(Quarter::Q1));
        assert_eq!(extract_quarter("第Ⅳ四半期"), Some(Quarter::Q4));
        assert_eq!(extract_quarter("第Ⅲ四半期"), Some(Quarter::Q3));
    }

    #[test]
    fn interim_synonyms_map_to_q2() {
        for title in ["中間決算説明会資料", "上期業績のお知らせ", "上半期報告"] {
            assert_eq!(extract_quarter(title), Some(Quarter::Q2), "{title}");
        }
    }

    #[test]
    fn full_year_synonyms_map_to_q4() {
        for title in ["通期業績予想の修正", "下期の見通し", "下半期計画"] {
            assert_eq!(extract_quarter(title), Some(Quarter::Q4), "{title}");
        }
    }

    #[test]
    fn explicit_marker_beats_synonym() {
        // 第1四半期 present alongside 通期: the explicit marker wins
        assert_eq!(
            extract_quarter("第1四半期実績及び通期業績予想"),
            Some(Quarter::Q1)
        );
    }

    #[test]
    fn no_signal_is_none() {
        assert_eq!(extract_quarter("2025年3月期決算短信"), None);
        assert_eq!(extract_quarter("役員人事のお知らせ"), None);
    }

    #[test]
    fn explicit_dai_marker_reports_digit() {
        assert_eq!(explicit_dai_marker("第3四半期決算短信"), Some(3));
        assert_eq!(explicit_dai_marker("第Ⅱ四半期"), Some(2));
        assert_eq!(explicit_dai_marker("通期業績予想"), None);
    }
}
