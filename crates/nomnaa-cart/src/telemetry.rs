//! Tracing setup for the cart binaries.

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies
/// (see [`ShopConfig::log_filter`](crate::ShopConfig)). Logs go to stderr so
/// command output on stdout stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=nomnaa_cart=trace` - Trace the service only
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
