//! Tracing setup for binaries built on sugarbridge.
//!
//! The library crates only emit events; installing a subscriber is the
//! application's call. This helper installs the usual `fmt` subscriber
//! filtered by `RUST_LOG`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a global `fmt` subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `default_directive` (e.g. `"info"` or `"sugarbridge_session=debug"`).
/// Returns `false` if a global subscriber was already installed, which
/// leaves the existing one in place.
pub fn init(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}
