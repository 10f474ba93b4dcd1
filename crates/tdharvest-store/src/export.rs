//! Delta export in the store's exact column layout.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use tdharvest_core::record::{DATE_FMT, TIMESTAMP_FMT};
use tdharvest_core::Disclosure;

use crate::csv;
use crate::diff::SequencedDisclosure;

/// Value of one store column for a sequenced record. Columns the scrape
/// does not populate come back empty — the store may carry enrichment
/// columns this pipeline knows nothing about.
fn field_for(column: &str, seq: u64, r: &Disclosure) -> String {
    match column {
        "連番" => seq.to_string(),
        "時刻" => r.published_at.format(TIMESTAMP_FMT).to_string(),
        "コード" => r.code.clone(),
        "会社名" => r.name.clone(),
        "表題" => r.title.clone(),
        "表題_URL" => r.title_url.clone().unwrap_or_default(),
        "XBRL" => {
            if r.has_xbrl {
                "XBRL".to_string()
            } else {
                String::new()
            }
        }
        "XBRL_URL" => r.xbrl_url.clone().unwrap_or_default(),
        "上場取引所" => r.exchanges.clone(),
        "更新履歴" => r.history.clone(),
        "公開日" => r.date.format(DATE_FMT).to_string(),
        _ => String::new(),
    }
}

/// Write the reconciled delta as CSV: header row straight from the store
/// schema, one row per new record, in assignment order.
///
/// The filename embeds the boundary date and a generation stamp so
/// successive runs never overwrite each other.
pub fn write_delta(
    dir: &Path,
    columns: &[String],
    records: &[SequencedDisclosure],
    boundary: NaiveDate,
    generated_at: NaiveDateTime,
) -> Result<PathBuf> {
    let filename = format!(
        "tdnet_delta_{}_{}.csv",
        boundary.format(DATE_FMT),
        generated_at.format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(filename);

    let file = File::create(&path)
        .with_context(|| format!("failed to create delta file: {}", path.display()))?;
    let mut w = BufWriter::new(file);

    w.write_all(csv::BOM.as_bytes()).context("delta write")?;
    csv::write_row(&mut w, columns).context("delta header")?;
    for sd in records {
        let row: Vec<String> = columns
            .iter()
            .map(|col| field_for(col, sd.sequence, &sd.record))
            .collect();
        csv::write_row(&mut w, &row).context("delta row")?;
    }
    w.flush().context("delta flush")?;

    log::info!("wrote {} row(s) to {}", records.len(), path.display());
    Ok(path)
}

/// Columns of the raw one-day snapshot, scrape-side names.
const SNAPSHOT_COLUMNS: [&str; 10] = [
    "時刻",
    "コード",
    "会社名",
    "表題",
    "表題URL",
    "XBRL",
    "XBRLURL",
    "上場取引所",
    "更新履歴",
    "公開日",
];

/// Write the raw scraped rows of one day, without sequence numbers or
/// store layout — an operator inspection aid, not an import file.
pub fn write_day_snapshot(
    dir: &Path,
    records: &[Disclosure],
    date: NaiveDate,
    generated_at: NaiveDateTime,
) -> Result<PathBuf> {
    let filename = format!(
        "tdnet_rows_{}_{}.csv",
        date.format(DATE_FMT),
        generated_at.format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(filename);

    let file = File::create(&path)
        .with_context(|| format!("failed to create snapshot file: {}", path.display()))?;
    let mut w = BufWriter::new(file);

    w.write_all(csv::BOM.as_bytes()).context("snapshot write")?;
    let header: Vec<String> = SNAPSHOT_COLUMNS.iter().map(|s| s.to_string()).collect();
    csv::write_row(&mut w, &header).context("snapshot header")?;
    for r in records {
        let row = vec![
            r.published_at.format(TIMESTAMP_FMT).to_string(),
            r.code.clone(),
            r.name.clone(),
            r.title.clone(),
            r.title_url.clone().unwrap_or_default(),
            if r.has_xbrl { "XBRL".to_string() } else { String::new() },
            r.xbrl_url.clone().unwrap_or_default(),
            r.exchanges.clone(),
            r.history.clone(),
            r.date.format(DATE_FMT).to_string(),
        ];
        csv::write_row(&mut w, &row).context("snapshot row")?;
    }
    w.flush().context("snapshot flush")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn record(seq: u64) -> SequencedDisclosure {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        SequencedDisclosure {
            sequence: seq,
            record: Disclosure {
                published_at: date.and_time(NaiveTime::from_hms_opt(18, 30, 0).unwrap()),
                code: "72030".to_string(),
                name: "トヨタ自動車".to_string(),
                title: "2026年3月期 第1四半期決算短信".to_string(),
                title_url: Some("https://example.invalid/a.pdf".to_string()),
                has_xbrl: true,
                xbrl_url: Some("https://example.invalid/a.zip".to_string()),
                exchanges: "東".to_string(),
                history: String::new(),
                date,
            },
        }
    }

    #[test]
    fn maps_known_columns() {
        let sd = record(1001);
        assert_eq!(field_for("連番", sd.sequence, &sd.record), "1001");
        assert_eq!(
            field_for("時刻", sd.sequence, &sd.record),
            "2025-06-10 18:30:00"
        );
        assert_eq!(field_for("XBRL", sd.sequence, &sd.record), "XBRL");
        assert_eq!(field_for("公開日", sd.sequence, &sd.record), "2025-06-10");
    }

    #[test]
    fn unknown_columns_empty() {
        let sd = record(1);
        assert_eq!(field_for("種別", sd.sequence, &sd.record), "");
        assert_eq!(field_for("pdfDL", sd.sequence, &sd.record), "");
    }

    #[test]
    fn xbrl_flag_empty_when_absent() {
        let mut sd = record(1);
        sd.record.has_xbrl = false;
        sd.record.xbrl_url = None;
        assert_eq!(field_for("XBRL", sd.sequence, &sd.record), "");
        assert_eq!(field_for("XBRL_URL", sd.sequence, &sd.record), "");
    }
}
