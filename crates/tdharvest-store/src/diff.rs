//! Reconciliation of scraped records against the store, with sequence
//! assignment.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use tdharvest_core::{Disclosure, RecordKey};

/// A confirmed-new record with its assigned sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencedDisclosure {
    pub sequence: u64,
    pub record: Disclosure,
}

/// Outcome of one reconciliation.
#[derive(Debug)]
pub struct Reconciliation {
    /// New records in assignment order (sorted, contiguous sequences)
    pub new_records: Vec<SequencedDisclosure>,
    /// Scraped records discarded as already stored
    pub duplicates: usize,
}

impl Reconciliation {
    /// Assigned sequence range, when anything was assigned.
    pub fn sequence_range(&self) -> Option<(u64, u64)> {
        match (self.new_records.first(), self.new_records.last()) {
            (Some(first), Some(last)) => Some((first.sequence, last.sequence)),
            _ => None,
        }
    }
}

/// Decide which scraped records are genuinely new and stamp them with
/// contiguous sequence numbers starting at `max_sequence + 1`.
///
/// Records dated strictly after `known_max_date` are new by the store
/// invariant — nothing beyond the max-sequence date can already be
/// stored. Records at or before it are kept only when their identity key
/// is absent from `existing` (the store's keys for the boundary date).
///
/// Pure function of its inputs: same batch, same max sequence, same key
/// set — same assignment, bit for bit. The sort that the sequence order
/// derives from lives in [`Disclosure::sort_key`].
pub fn reconcile(
    batch: Vec<Disclosure>,
    known_max_date: NaiveDate,
    existing: &FxHashSet<RecordKey>,
    max_sequence: u64,
) -> Reconciliation {
    let mut fresh = Vec::with_capacity(batch.len());
    let mut duplicates = 0;

    for record in batch {
        if record.date > known_max_date || !existing.contains(&record.key()) {
            fresh.push(record);
        } else {
            duplicates += 1;
        }
    }

    fresh.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let new_records = fresh
        .into_iter()
        .enumerate()
        .map(|(i, record)| SequencedDisclosure {
            sequence: max_sequence + 1 + i as u64,
            record,
        })
        .collect();

    Reconciliation {
        new_records,
        duplicates,
    }
}
