//! tdharvest core - Common infrastructure for the disclosure pipeline
//!
//! This crate provides the shared pieces the scraping, store, and CLI
//! crates build on: the HTTP client, retry backoff, logging, progress
//! reporting, the shutdown flag, and the disclosure record types.

pub mod http;
pub mod logging;
pub mod progress;
pub mod record;
pub mod retry;
pub mod shutdown;

// Re-exports for convenience
pub use http::{http_get, HttpError, HttpResponse, SHARED_RUNTIME};
pub use logging::{init_logging, IndicatifLogger};
pub use progress::ProgressContext;
pub use record::{Disclosure, RecordKey};
pub use retry::backoff_duration;
pub use shutdown::{is_shutdown_requested, request_shutdown, shutdown_flag};
