//! tdharvest store - Historical store access, reconciliation, export
//!
//! Read-only queries against the append-only disclosure store, the diff
//! that decides which scraped records are genuinely new, sequence-number
//! assignment, and the CSV delta writer whose output re-imports as a
//! faithful append.

pub mod csv;
pub mod diff;
pub mod export;
pub mod history;

// Re-exports
pub use diff::{reconcile, Reconciliation, SequencedDisclosure};
pub use export::{write_day_snapshot, write_delta};
pub use history::DisclosureDb;
