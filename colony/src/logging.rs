//! Diagnostics for watching creeps decide.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: idle creeps, fallbacks and task selection via
//!   `RUST_LOG`, output to stderr. Not persisted.
//!
//! - **Tick reports (`io/tick_log`)**: Product artifacts in `.colony/ticks/`.
//!   Controlled by `write_tick_logs`, unaffected by `RUST_LOG`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the filter is `warn`, or `colony=debug`
/// when `verbose` is set. Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=colony=debug colony run --ticks 10
/// ```
pub fn init(verbose: bool) {
    let fallback = if verbose { "colony=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
