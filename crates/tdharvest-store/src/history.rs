//! Read-only queries against the historical disclosure store.
//!
//! The store is an append-only DuckDB table maintained outside this
//! pipeline; ingestion only ever reads it. The single append happens
//! later, through the exported delta file, so no lock discipline beyond
//! "export is the last step" is needed here.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use duckdb::{params, AccessMode, Config, Connection};
use rustc_hash::FxHashSet;
use tdharvest_core::RecordKey;

/// Store table holding one row per disclosure.
pub const TABLE: &str = "disclosure_info";

/// Handle to the historical store.
pub struct DisclosureDb {
    conn: Connection,
}

impl DisclosureDb {
    /// Open the store read-only. Fails fast when the file is missing or
    /// locked — nothing downstream may run against an unverifiable store.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        anyhow::ensure!(path.exists(), "store not found: {}", path.display());
        let config = Config::default()
            .access_mode(AccessMode::ReadOnly)
            .context("store config")?;
        let conn = Connection::open_with_flags(path, config)
            .with_context(|| format!("failed to open store: {}", path.display()))?;
        log::debug!("opened store read-only: {}", path.display());
        Ok(Self { conn })
    }

    /// Wrap an existing connection (tests build their own in-memory store).
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Highest assigned sequence number, 0 when the store is empty.
    pub fn max_sequence(&self) -> Result<u64> {
        let max: Option<i64> = self
            .conn
            .query_row(&format!(r#"SELECT MAX("連番") FROM {TABLE}"#), [], |row| {
                row.get(0)
            })
            .context("max sequence query")?;
        Ok(max.unwrap_or(0).max(0) as u64)
    }

    /// Publication date of the max-sequence row — the catch-up boundary.
    /// `None` when the store is empty.
    pub fn max_sequence_date(&self) -> Result<Option<NaiveDate>> {
        let sql = format!(
            r#"SELECT strftime("公開日", '%Y-%m-%d') FROM {TABLE}
               WHERE "連番" = (SELECT MAX("連番") FROM {TABLE})"#
        );
        match self.conn.query_row(&sql, [], |row| row.get::<_, String>(0)) {
            Ok(s) => {
                let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                    .with_context(|| format!("unparseable 公開日 in store: {s}"))?;
                Ok(Some(date))
            }
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).context("max sequence date query"),
        }
    }

    /// Identity keys of every stored record for one publication date.
    ///
    /// A day may be partially re-scraped before its history is final, so
    /// same-day reconciliation needs the exact set of what is already in.
    pub fn existing_keys(&self, date: NaiveDate) -> Result<FxHashSet<RecordKey>> {
        let sql = format!(
            r#"SELECT coalesce(strftime("時刻", '%Y-%m-%d %H:%M:%S'), ''),
                      coalesce("コード", ''),
                      coalesce("会社名", ''),
                      coalesce("表題", ''),
                      coalesce("表題_URL", ''),
                      coalesce(strftime("公開日", '%Y-%m-%d'), '')
               FROM {TABLE} WHERE "公開日" = ?"#
        );
        let mut stmt = self.conn.prepare(&sql).context("existing keys query")?;
        let rows = stmt
            .query_map(params![date.to_string()], |row| {
                Ok(RecordKey {
                    timestamp: row.get(0)?,
                    code: row.get(1)?,
                    name: row.get(2)?,
                    title: row.get(3)?,
                    title_url: row.get(4)?,
                    date: row.get(5)?,
                })
            })
            .context("existing keys query")?;

        let mut keys = FxHashSet::default();
        for key in rows {
            keys.insert(key.context("existing keys row")?);
        }
        Ok(keys)
    }

    /// Stored row count for one publication date.
    pub fn count_for_date(&self, date: NaiveDate) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(
                &format!(r#"SELECT COUNT(*) FROM {TABLE} WHERE "公開日" = ?"#),
                params![date.to_string()],
                |row| row.get(0),
            )
            .context("count query")?;
        Ok(count.max(0) as u64)
    }

    /// Ordered column names of the store table. The delta export must
    /// match this layout exactly, including columns ingestion never
    /// populates.
    pub fn columns(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info('{TABLE}')"))
            .context("column schema query")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .context("column schema query")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("column schema rows")?;
        anyhow::ensure!(!names.is_empty(), "store table {TABLE} has no columns");
        Ok(names)
    }

    /// Stored titles, optionally restricted to one publication date.
    /// Feeds the classification enrichment pass.
    pub fn titles(&self, date: Option<NaiveDate>) -> Result<Vec<String>> {
        let rows = match date {
            Some(d) => {
                let sql = format!(
                    r#"SELECT coalesce("表題", '') FROM {TABLE} WHERE "公開日" = ? ORDER BY "連番""#
                );
                let mut stmt = self.conn.prepare(&sql).context("titles query")?;
                stmt.query_map(params![d.to_string()], |row| row.get::<_, String>(0))
                    .context("titles query")?
                    .collect::<std::result::Result<Vec<_>, _>>()
            }
            None => {
                let sql = format!(r#"SELECT coalesce("表題", '') FROM {TABLE} ORDER BY "連番""#);
                let mut stmt = self.conn.prepare(&sql).context("titles query")?;
                stmt.query_map([], |row| row.get::<_, String>(0))
                    .context("titles query")?
                    .collect::<std::result::Result<Vec<_>, _>>()
            }
        };
        rows.context("titles rows")
    }
}
