//! Graceful shutdown support via atomic flag.
//!
//! Set by the CLI's SIGINT/SIGTERM handlers; the scan loops check it
//! between pages and between days so an interrupt stops new network
//! work without tearing down mid-request.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global shutdown flag — set by the signal handler
pub fn shutdown_flag() -> &'static AtomicBool {
    static FLAG: AtomicBool = AtomicBool::new(false);
    &FLAG
}

/// Check if shutdown was requested
pub fn is_shutdown_requested() -> bool {
    shutdown_flag().load(Ordering::Relaxed)
}

/// Request shutdown (for signal handlers)
pub fn request_shutdown() {
    shutdown_flag().store(true, Ordering::Relaxed);
}
