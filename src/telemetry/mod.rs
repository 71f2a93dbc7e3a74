//! Tracing subscriber setup.
//!
//! The crate emits all diagnostics through `tracing`; embedding applications
//! usually install their own subscriber. These helpers cover binaries and
//! examples that just want readable output controlled by `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Installs a formatted stderr subscriber filtered by `RUST_LOG`
/// (default `info`).
///
/// Idempotent: if a global subscriber is already set, this is a no-op, so
/// test binaries can call it freely.
pub fn init() {
    init_with_default_filter("info");
}

/// Like [`init`], with an explicit fallback filter used when `RUST_LOG`
/// is unset.
pub fn init_with_default_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
