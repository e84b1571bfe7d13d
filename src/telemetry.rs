//! Logging setup
//!
//! Rejected events, skipped rows, policy fallbacks and member notifications
//! are reported as `tracing` events. They go to stderr so that stdout carries
//! nothing but the CSV report.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// Set `RUST_LOG` to control verbosity:
/// - `RUST_LOG=warn` - Only rejected events and skipped rows
/// - `RUST_LOG=info` - Also notifications and run summaries (default)
/// - `RUST_LOG=library_tracker=debug` - Every applied event
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
