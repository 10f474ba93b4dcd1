//! Listing table parser.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use scraper::{ElementRef, Html, Selector};
use tdharvest_core::Disclosure;

/// Identifying attribute of the listing table; its presence is also the
/// fetcher's "this is a real listing page" marker.
pub const LISTING_MARKER: &str = "main-list-table";

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#main-list-table").expect("static selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("static selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("static selector"));
static A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("static selector"));

/// Result of parsing one page.
#[derive(Debug, Default)]
pub struct ParsedPage {
    /// Records in page row order
    pub records: Vec<Disclosure>,
    /// Rows dropped as decorative or malformed
    pub skipped_rows: usize,
}

/// Text content of a cell, per-fragment trimmed (markup line breaks and
/// indentation inside cells must not leak into field values).
fn cell_text(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("")
}

/// First link target inside a cell, resolved against the site base path.
fn cell_link(el: ElementRef, base_url: &str) -> Option<String> {
    let href = el
        .select(&A)
        .next()
        .and_then(|a| a.value().attr("href"))?;
    Some(format!(
        "{base_url}{}",
        href.trim_start_matches(['.', '/'])
    ))
}

/// Parse one page of listing markup into disclosure records.
///
/// A page without the listing table parses to zero records — that is the
/// empty-page pagination terminus, not an error. Rows with fewer than 7
/// cells are decorative (headers, separators) and are skipped.
///
/// The row only carries a time of day; it is combined with the page's
/// date. Announcements published around midnight can therefore be
/// stamped with the wrong day — the source gives no way to tell, and the
/// behavior is kept as-is.
pub fn parse_rows(html: &str, date: NaiveDate, base_url: &str) -> ParsedPage {
    let doc = Html::parse_document(html);
    let mut page = ParsedPage::default();

    let Some(table) = doc.select(&TABLE).next() else {
        return page;
    };

    for tr in table.select(&TR) {
        let cells: Vec<ElementRef> = tr.select(&TD).collect();
        if cells.len() < 7 {
            page.skipped_rows += 1;
            continue;
        }

        let time_text = cell_text(cells[0]);
        let Ok(time) = NaiveTime::parse_from_str(&time_text, "%H:%M") else {
            page.skipped_rows += 1;
            continue;
        };

        let title_url = cell_link(cells[3], base_url);
        let xbrl_url = cell_link(cells[4], base_url);

        page.records.push(Disclosure {
            published_at: date.and_time(time),
            code: cell_text(cells[1]),
            name: cell_text(cells[2]),
            title: cell_text(cells[3]),
            title_url,
            has_xbrl: xbrl_url.is_some(),
            xbrl_url,
            exchanges: cell_text(cells[5]),
            history: cell_text(cells[6]),
            date,
        });
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.release.tdnet.info/inbs/";

    fn page_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn listing(rows: &str) -> String {
        format!(
            r#"<html><body><table id="main-list-table"><tbody>{rows}</tbody></table></body></html>"#
        )
    }

    fn row(time: &str, code: &str, name: &str, title_cell: &str, xbrl_cell: &str) -> String {
        format!(
            "<tr><td>{time}</td><td>{code}</td><td>{name}</td><td>{title_cell}</td>\
             <td>{xbrl_cell}</td><td>東</td><td></td></tr>"
        )
    }

    #[test]
    fn parses_basic_row() {
        let html = listing(&row(
            "18:30",
            "72030",
            "トヨタ自動車",
            r#"<a href="./140120250610512345.pdf">2026年3月期 第1四半期決算短信</a>"#,
            r#"<a href="./081220250610512345.zip">XBRL</a>"#,
        ));
        let page = parse_rows(&html, page_date(), BASE);

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.skipped_rows, 0);

        let r = &page.records[0];
        assert_eq!(r.published_at.to_string(), "2025-06-10 18:30:00");
        assert_eq!(r.code, "72030");
        assert_eq!(r.name, "トヨタ自動車");
        assert_eq!(r.title, "2026年3月期 第1四半期決算短信");
        assert_eq!(
            r.title_url.as_deref(),
            Some("https://www.release.tdnet.info/inbs/140120250610512345.pdf")
        );
        assert!(r.has_xbrl);
        assert_eq!(
            r.xbrl_url.as_deref(),
            Some("https://www.release.tdnet.info/inbs/081220250610512345.zip")
        );
        assert_eq!(r.exchanges, "東");
        assert_eq!(r.date, page_date());
    }

    #[test]
    fn row_without_links() {
        let html = listing(&row("09:00", "13010", "極洋", "人事異動のお知らせ", ""));
        let page = parse_rows(&html, page_date(), BASE);

        let r = &page.records[0];
        assert_eq!(r.title_url, None);
        assert!(!r.has_xbrl);
        assert_eq!(r.xbrl_url, None);
    }

    #[test]
    fn missing_table_yields_empty() {
        let page = parse_rows("<html><body>maintenance</body></html>", page_date(), BASE);
        assert!(page.records.is_empty());
        assert_eq!(page.skipped_rows, 0);
    }

    #[test]
    fn short_rows_skipped_and_counted() {
        let html = listing(&format!(
            "<tr><td>header</td></tr>{}",
            row("10:00", "13320", "ニッスイ", "業績予想の修正", "")
        ));
        let page = parse_rows(&html, page_date(), BASE);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.skipped_rows, 1);
    }

    #[test]
    fn unparseable_time_skipped() {
        let html = listing(&row("-", "13010", "極洋", "t", ""));
        let page = parse_rows(&html, page_date(), BASE);
        assert!(page.records.is_empty());
        assert_eq!(page.skipped_rows, 1);
    }

    #[test]
    fn row_order_preserved() {
        let html = listing(&format!(
            "{}{}{}",
            row("09:00", "1", "a", "first", ""),
            row("08:00", "2", "b", "second", ""),
            row("10:00", "3", "c", "third", ""),
        ));
        let page = parse_rows(&html, page_date(), BASE);
        // No reordering at this stage, even though times are unsorted
        let titles: Vec<&str> = page.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[test]
    fn cell_text_drops_markup_whitespace() {
        let html = listing(&row(
            "12:00",
            "99840",
            "ソフトバンクグループ",
            "<a href=\"x.pdf\">\n  2025年3月期\n  決算短信\n</a>",
            "",
        ));
        let page = parse_rows(&html, page_date(), BASE);
        assert_eq!(page.records[0].title, "2025年3月期決算短信");
    }
}
