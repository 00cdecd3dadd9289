//! Tracing/logging setup shared by binaries and test harnesses.

/// Tracing configuration (filters, output format).
pub mod tracing;

/// Initialize process-wide observability (tracing/logging).
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init() {
    tracing::init();
}
