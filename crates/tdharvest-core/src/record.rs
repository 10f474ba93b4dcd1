//! Disclosure record types shared across the pipeline.

use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp format used in the store and in identity keys.
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format used in the store and in identity keys.
pub const DATE_FMT: &str = "%Y-%m-%d";

/// One regulatory disclosure announcement, as scraped from the listing.
///
/// `date` duplicates the date part of `published_at`; the store partitions
/// by it and the same-day reconciliation queries it, so it is kept as a
/// first-class field rather than re-derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disclosure {
    /// Page date combined with the row's HH:MM time
    pub published_at: NaiveDateTime,
    /// Issuer (security) code
    pub code: String,
    /// Issuer name
    pub name: String,
    /// Announcement title, free text
    pub title: String,
    /// Link to the title document, when the row carries one
    pub title_url: Option<String>,
    /// Whether an XBRL attachment is present
    pub has_xbrl: bool,
    /// Link to the XBRL archive, when present
    pub xbrl_url: Option<String>,
    /// Listing venue text
    pub exchanges: String,
    /// Update-history text
    pub history: String,
    /// Publication date (partition key)
    pub date: NaiveDate,
}

/// Identity tuple used for duplicate detection.
///
/// String-typed on purpose: keys read back from the store and keys built
/// from freshly scraped rows must compare exactly, and the store side only
/// has formatted text. The sequence number is deliberately absent — it is
/// assigned after a record is confirmed new, never part of identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub timestamp: String,
    pub code: String,
    pub name: String,
    pub title: String,
    pub title_url: String,
    pub date: String,
}

impl Disclosure {
    /// Identity key for duplicate detection against the store.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            timestamp: self.published_at.format(TIMESTAMP_FMT).to_string(),
            code: self.code.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            title_url: self.title_url.clone().unwrap_or_default(),
            date: self.date.format(DATE_FMT).to_string(),
        }
    }

    /// Sort key for deterministic sequence assignment.
    ///
    /// Sequence numbers are derived from sort position, so this exact
    /// field order is load-bearing: (date, timestamp, code, name, title,
    /// title URL), ascending, missing URL sorting as empty.
    pub fn sort_key(&self) -> (NaiveDate, NaiveDateTime, &str, &str, &str, &str) {
        (
            self.date,
            self.published_at,
            &self.code,
            &self.name,
            &self.title,
            self.title_url.as_deref().unwrap_or(""),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn record(date: &str, time: &str, code: &str, title: &str) -> Disclosure {
        let date = NaiveDate::parse_from_str(date, DATE_FMT).unwrap();
        let time = NaiveTime::parse_from_str(time, "%H:%M").unwrap();
        Disclosure {
            published_at: date.and_time(time),
            code: code.to_string(),
            name: "Example Co.".to_string(),
            title: title.to_string(),
            title_url: None,
            has_xbrl: false,
            xbrl_url: None,
            exchanges: "東".to_string(),
            history: String::new(),
            date,
        }
    }

    #[test]
    fn key_formats_timestamp_with_seconds() {
        let r = record("2025-06-10", "18:30", "7203", "適時開示");
        let key = r.key();
        assert_eq!(key.timestamp, "2025-06-10 18:30:00");
        assert_eq!(key.date, "2025-06-10");
    }

    #[test]
    fn key_missing_url_is_empty_string() {
        let r = record("2025-06-10", "09:00", "7203", "t");
        assert_eq!(r.key().title_url, "");
    }

    #[test]
    fn key_ignores_sequence_irrelevant_fields() {
        let mut a = record("2025-06-10", "09:00", "7203", "t");
        let mut b = a.clone();
        a.has_xbrl = true;
        b.history = "訂正".to_string();
        // XBRL flag and history are not identity
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn sort_key_orders_by_date_then_time_then_code() {
        let early = record("2025-06-10", "09:00", "1301", "a");
        let later_time = record("2025-06-10", "10:00", "1301", "a");
        let later_date = record("2025-06-11", "08:00", "1301", "a");
        let later_code = record("2025-06-10", "09:00", "1305", "a");

        assert!(early.sort_key() < later_time.sort_key());
        assert!(later_time.sort_key() < later_date.sort_key());
        assert!(early.sort_key() < later_code.sort_key());
    }
}
