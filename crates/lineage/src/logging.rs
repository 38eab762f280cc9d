//! Tracing setup for hosts that want to see class construction.
//!
//! The builder emits `debug` events for every class built and every
//! `onClassExtended` call, and `trace` events for mixin flattening and
//! mixin cache lookups.
//!
//! ```bash
//! LINEAGE_LOG=lineage=debug cargo test
//! LINEAGE_LOG="lineage::mixin=trace" my-host
//! ```
//!
//! The subscriber is only installed when `LINEAGE_LOG` (or `RUST_LOG`) is
//! set.

use tracing_subscriber::EnvFilter;

use crate::defaults::LOG_ENV_VAR;

/// Build an `EnvFilter` from `LINEAGE_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_ENV_VAR) {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install a global fmt subscriber writing to stderr.
///
/// Does nothing when neither variable is set, or when another subscriber is
/// already installed.
pub fn init_tracing() {
    let has_lineage_log = std::env::var(LOG_ENV_VAR).is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_lineage_log && !has_rust_log {
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
