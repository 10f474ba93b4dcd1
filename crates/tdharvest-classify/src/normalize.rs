//! Title text normalization.

use unicode_normalization::UnicodeNormalization;

/// NFKC-fold a title and collapse whitespace runs to single spaces.
///
/// NFKC turns full-width digits and Latin into their half-width forms
/// (and CJK Roman numerals like Ⅳ into plain ASCII sequences), which is
/// what lets the downstream patterns stay in one notation. No other
/// rewriting happens here — in particular CJK numerals (一二三四) are
/// left alone and handled pattern-locally by the quarter extractor.
pub fn normalize(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_digits_folded() {
        assert_eq!(normalize("２０２５年３月期"), "2025年3月期");
    }

    #[test]
    fn whitespace_collapsed_and_trimmed() {
        assert_eq!(normalize("  決算短信 \u{3000} 補足資料  "), "決算短信 補足資料");
    }

    #[test]
    fn roman_numerals_folded_to_ascii() {
        assert_eq!(normalize("第Ⅳ四半期"), "第IV四半期");
    }

    #[test]
    fn kanji_numerals_untouched() {
        assert_eq!(normalize("第一四半期"), "第一四半期");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize(""), "");
    }
}
